// src/batch.rs
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::{default_format, default_memory_budget, TilingConfig};
use crate::io::CreateOptions;
use crate::processing::indices::NDVI;
use crate::processing::TiledProcessor;
use crate::tiling::TilingMode;

#[derive(Deserialize, Serialize, Debug)]
pub struct BatchConfig {
    #[serde(default)]
    pub global: GlobalParams,
    pub operations: Vec<Operation>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct GlobalParams {
    #[serde(default = "default_memory_budget")]
    pub memory_budget: usize,
    #[serde(default)]
    pub overlap: usize,
    #[serde(default)]
    pub mode: TilingMode,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_compress")]
    pub compress: String,
    #[serde(default = "default_compress_level")]
    pub compress_level: u8,
    #[serde(default)]
    pub tiled: bool,
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            memory_budget: default_memory_budget(),
            overlap: 0,
            mode: TilingMode::default(),
            format: default_format(),
            compress: default_compress(),
            compress_level: default_compress_level(),
            tiled: false,
        }
    }
}

fn default_compress() -> String {
    "NONE".to_string()
}

fn default_compress_level() -> u8 {
    6
}

#[derive(Deserialize, Serialize, Debug)]
pub struct Operation {
    #[serde(rename = "type")]
    pub op_type: String,
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub params: OperationParams,
    pub memory_budget: Option<usize>,
    pub overlap: Option<usize>,
    pub mode: Option<TilingMode>,
    pub format: Option<String>,
    pub compress: Option<String>,
    pub compress_level: Option<u8>,
    pub tiled: Option<bool>,
}

/// 1-based band numbers, as GDAL counts them.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct OperationParams {
    pub red: Option<usize>,
    pub nir: Option<usize>,
}

impl Operation {
    fn tiling(&self, global: &GlobalParams) -> TilingConfig {
        TilingConfig {
            memory_budget: self.memory_budget.unwrap_or(global.memory_budget),
            overlap: self.overlap.unwrap_or(global.overlap),
            mode: self.mode.unwrap_or(global.mode),
        }
    }

    fn create_options(&self, global: &GlobalParams) -> CreateOptions {
        CreateOptions {
            compress: self.compress.clone().unwrap_or_else(|| global.compress.clone()),
            compress_level: self.compress_level.unwrap_or(global.compress_level),
            tiled: self.tiled.unwrap_or(global.tiled),
        }
    }
}

/// Converts a 1-based band number into a 0-based buffer index.
pub fn band_index(band: usize) -> Result<usize> {
    band.checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Band numbers start at 1, got {}", band))
}

pub fn load_batch(config_path: &Path) -> Result<BatchConfig> {
    let config_content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read batch file {}", config_path.display()))?;
    let config: BatchConfig = serde_json::from_str(&config_content)
        .with_context(|| format!("Failed to parse batch file {}", config_path.display()))?;
    Ok(config)
}

pub fn process_batch(config_path: &Path) -> Result<()> {
    let config = load_batch(config_path)?;

    info!("Starting batch processing with {} operations...", config.operations.len());

    // Operations run one after another; the first failure stops the batch
    for (i, op) in config.operations.iter().enumerate() {
        info!(
            "[{}/{}] Processing {} {} -> {}",
            i + 1,
            config.operations.len(),
            op.op_type,
            op.input.display(),
            op.output.display()
        );

        let processor = TiledProcessor::new(op.tiling(&config.global));
        let format = op.format.as_deref().unwrap_or(&config.global.format);
        let options = op.create_options(&config.global);

        match op.op_type.to_lowercase().as_str() {
            "ndvi" => {
                let red = band_index(op.params.red.unwrap_or(3))?;
                let nir = band_index(op.params.nir.unwrap_or(4))?;
                let ndvi = NDVI::new(red, nir, None);
                processor
                    .process(&ndvi, &op.input, &op.output, format, &options)
                    .with_context(|| format!("NDVI failed for {}", op.input.display()))?;
            }
            _ => return Err(anyhow::anyhow!("Unknown operation type: {}", op.op_type)),
        }
    }

    info!("Batch processing complete!");
    Ok(())
}
