// src/pixel.rs
use std::fmt;

use gdal::raster::{GdalDataType, GdalType};

use crate::error::{Result, TilerError};

/// Element types the pipeline knows how to tile and transform.
///
/// A run picks one variant from the input raster up front and stays
/// monomorphised on the matching Rust type for every tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    U8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl DataType {
    /// Size of one element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            DataType::U8 => 1,
            DataType::U16 | DataType::I16 => 2,
            DataType::U32 | DataType::I32 | DataType::F32 => 4,
            DataType::F64 => 8,
        }
    }

    pub fn from_gdal(dt: GdalDataType) -> Result<Self> {
        match dt {
            GdalDataType::UInt8 => Ok(DataType::U8),
            GdalDataType::UInt16 => Ok(DataType::U16),
            GdalDataType::Int16 => Ok(DataType::I16),
            GdalDataType::UInt32 => Ok(DataType::U32),
            GdalDataType::Int32 => Ok(DataType::I32),
            GdalDataType::Float32 => Ok(DataType::F32),
            GdalDataType::Float64 => Ok(DataType::F64),
            other => Err(TilerError::UnsupportedDataType(format!("{other:?}"))),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::U8 => "Byte",
            DataType::U16 => "UInt16",
            DataType::I16 => "Int16",
            DataType::U32 => "UInt32",
            DataType::I32 => "Int32",
            DataType::F32 => "Float32",
            DataType::F64 => "Float64",
        };
        f.write_str(name)
    }
}

/// A raster element: readable and writable through GDAL and convertible to `f32`
/// for index arithmetic.
pub trait Pixel: GdalType + Copy + Default + PartialEq + fmt::Debug + 'static {
    const DATA_TYPE: DataType;

    fn to_f32(self) -> f32;
}

macro_rules! impl_pixel {
    ($($t:ty => $dt:ident),* $(,)?) => {
        $(
            impl Pixel for $t {
                const DATA_TYPE: DataType = DataType::$dt;

                #[inline]
                fn to_f32(self) -> f32 {
                    self as f32
                }
            }
        )*
    };
}

impl_pixel!(
    u8 => U8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    f32 => F32,
    f64 => F64,
);
