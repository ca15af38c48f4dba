// src/io/mod.rs
pub mod raster;
pub mod store;

pub use raster::{Access, CreateOptions, GdalRaster};
pub use store::{read_band_into, RasterStore};
