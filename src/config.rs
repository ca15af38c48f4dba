// src/config.rs
use serde::{Deserialize, Serialize};

use crate::tiling::TilingMode;

/// Largest strip, in bytes, the pipeline reads at once unless told otherwise.
pub const DEFAULT_MEMORY_BUDGET: usize = (0.1 * 1024.0 * 1024.0) as usize;

pub const DEFAULT_FORMAT: &str = "GTiff";

/// Tiling parameters for one processing run.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilingConfig {
    #[serde(default = "default_memory_budget")]
    pub memory_budget: usize,
    #[serde(default)]
    pub overlap: usize,
    #[serde(default)]
    pub mode: TilingMode,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            memory_budget: DEFAULT_MEMORY_BUDGET,
            overlap: 0,
            mode: TilingMode::SingleBand,
        }
    }
}

pub(crate) fn default_memory_budget() -> usize {
    DEFAULT_MEMORY_BUDGET
}

pub(crate) fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
