// src/lib.rs
pub mod batch;
pub mod buffer;
pub mod cli;
pub mod config;
pub mod dims;
pub mod error;
pub mod io;
pub mod pixel;
pub mod processing;
pub mod subrect;
pub mod tiling;

pub use buffer::TypedBuffer;
pub use dims::RasterDims;
pub use error::{Result, TilerError};
pub use pixel::{DataType, Pixel};
pub use subrect::{extract_subrect, write_subrect};
pub use tiling::{TileScheduler, TileWindows, TilingMode};

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
