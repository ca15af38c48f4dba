// src/buffer.rs
use crate::dims::RasterDims;
use crate::error::{Result, TilerError};

/// A fixed-size multi-band pixel array tied to a [`RasterDims`] window.
///
/// Bands are stored one after another, so band `b` is the contiguous range
/// `[b * width * height, (b + 1) * width * height)` and each band is row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedBuffer<T> {
    data: Vec<T>,
    dims: RasterDims,
    nbands: usize,
}

impl<T: Copy + Default> TypedBuffer<T> {
    /// Allocates a zero-filled (`T::default()`) buffer.
    pub fn new(dims: RasterDims, nbands: usize) -> Self {
        Self::filled(dims, nbands, T::default())
    }
}

impl<T: Copy> TypedBuffer<T> {
    pub fn filled(dims: RasterDims, nbands: usize, value: T) -> Self {
        Self {
            data: vec![value; dims.len() * nbands],
            dims,
            nbands,
        }
    }

    /// Wraps existing data; its length must be exactly `dims.len() * nbands`.
    pub fn from_vec(dims: RasterDims, nbands: usize, data: Vec<T>) -> Result<Self> {
        let expected = dims.len() * nbands;
        if data.len() != expected {
            return Err(TilerError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { data, dims, nbands })
    }

    pub fn dims(&self) -> &RasterDims {
        &self.dims
    }

    pub fn nbands(&self) -> usize {
        self.nbands
    }

    pub fn width(&self) -> usize {
        self.dims.width()
    }

    pub fn height(&self) -> usize {
        self.dims.height()
    }

    /// Elements in a single band.
    pub fn band_len(&self) -> usize {
        self.dims.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        let len = self.data.len();
        self.data
            .get(index)
            .ok_or(TilerError::IndexOutOfBounds { index, len })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.data.len();
        self.data
            .get_mut(index)
            .ok_or(TilerError::IndexOutOfBounds { index, len })
    }

    /// Flat index of `(band, row, col)`, with row and col local to this buffer's window.
    pub fn index_of(&self, band: usize, row: usize, col: usize) -> Result<usize> {
        self.check_band(band)?;
        let (width, height) = (self.width(), self.height());
        if row >= height || col >= width {
            return Err(TilerError::PixelOutOfRange {
                row,
                col,
                width,
                height,
            });
        }
        Ok(band * self.band_len() + row * width + col)
    }

    pub fn at(&self, band: usize, row: usize, col: usize) -> Result<T> {
        let index = self.index_of(band, row, col)?;
        Ok(self.data[index])
    }

    pub fn at_mut(&mut self, band: usize, row: usize, col: usize) -> Result<&mut T> {
        let index = self.index_of(band, row, col)?;
        Ok(&mut self.data[index])
    }

    pub fn band(&self, band: usize) -> Result<&[T]> {
        self.check_band(band)?;
        let len = self.band_len();
        Ok(&self.data[band * len..(band + 1) * len])
    }

    pub fn band_mut(&mut self, band: usize) -> Result<&mut [T]> {
        self.check_band(band)?;
        let len = self.band_len();
        Ok(&mut self.data[band * len..(band + 1) * len])
    }

    /// One line of one band.
    pub fn row(&self, band: usize, row: usize) -> Result<&[T]> {
        let start = self.index_of(band, row, 0)?;
        Ok(&self.data[start..start + self.width()])
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    fn check_band(&self, band: usize) -> Result<()> {
        if band >= self.nbands {
            return Err(TilerError::BandOutOfRange {
                band,
                nbands: self.nbands,
            });
        }
        Ok(())
    }
}
