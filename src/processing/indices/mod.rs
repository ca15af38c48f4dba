// src/processing/indices/mod.rs
pub mod ndvi;

// Re-export indices
pub use ndvi::NDVI;
