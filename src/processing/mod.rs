// src/processing/mod.rs
pub mod indices;
pub mod tiled;

// Re-export main components
pub use tiled::{IndexCalculator, TiledProcessor};
