// src/error.rs
use thiserror::Error;

use crate::dims::RasterDims;

#[derive(Error, Debug)]
pub enum TilerError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "Requested overlap of {overlap} lines is too large: a memory budget of {memory_budget} bytes \
         only allows for {lines_per_tile} lines per tile. Increase the budget or decrease the overlap"
    )]
    OverlapTooLarge {
        overlap: usize,
        memory_budget: usize,
        lines_per_tile: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Raster has no data to tile: {samples} samples x {lines} lines")]
    EmptyRaster { samples: usize, lines: usize },

    #[error("Data type not supported: {0}")]
    UnsupportedDataType(String),

    #[error("Input has {available} bands but {required} are required")]
    NotEnoughBands { required: usize, available: usize },

    #[error("Driver {0} does not support file creation")]
    UnsupportedDriver(String),

    #[error("Index {index} out of bounds for buffer of {len} elements")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Band {band} exceeds band count {nbands}")]
    BandOutOfRange { band: usize, nbands: usize },

    #[error("Pixel (row {row}, col {col}) outside {width}x{height} band")]
    PixelOutOfRange {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("Tile {tile} requested but only {count} tiles exist")]
    TileOutOfRange { tile: usize, count: usize },

    #[error("Output window {output} is not contained in buffer window {buffer}")]
    WindowNotContained {
        output: RasterDims,
        buffer: RasterDims,
    },

    #[error("Window {window} falls outside the {samples}x{lines} raster")]
    WindowOutOfRaster {
        window: RasterDims,
        samples: usize,
        lines: usize,
    },

    #[error("Source holds {actual} elements but window needs {expected}")]
    SourceTooSmall { expected: usize, actual: usize },

    #[error("Data length {actual} does not match expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, TilerError>;
