use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{TilingConfig, DEFAULT_FORMAT, DEFAULT_MEMORY_BUDGET};
use crate::io::CreateOptions;
use crate::tiling::TilingMode;

#[derive(Parser)]
#[command(name = "raster-tiler")]
#[command(about = "Memory-bounded strip processing for multi-band rasters")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct TilingArgs {
    /// Largest strip to hold in memory, in bytes
    #[arg(long, default_value_t = DEFAULT_MEMORY_BUDGET)]
    pub memory_budget: usize,

    /// Context lines read above and below each strip
    #[arg(long, default_value_t = 0)]
    pub overlap: usize,

    /// Whether the budget covers one band or all bands of a strip
    #[arg(long, value_enum, default_value_t = TilingMode::SingleBand)]
    pub mode: TilingMode,
}

impl From<&TilingArgs> for TilingConfig {
    fn from(args: &TilingArgs) -> Self {
        TilingConfig {
            memory_budget: args.memory_budget,
            overlap: args.overlap,
            mode: args.mode,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// GDAL driver for the output file
    #[arg(long, default_value = DEFAULT_FORMAT)]
    pub format: String,

    /// Compression (NONE, DEFLATE, ZSTD, LZW, ...)
    #[arg(long, default_value = "NONE")]
    pub compress: String,

    /// Compression level for DEFLATE / ZSTD
    #[arg(long, default_value = "6")]
    pub compress_level: u8,

    /// Write a tiled GeoTIFF
    #[arg(long)]
    pub tiled: bool,
}

impl From<&OutputArgs> for CreateOptions {
    fn from(args: &OutputArgs) -> Self {
        CreateOptions {
            compress: args.compress.clone(),
            compress_level: args.compress_level,
            tiled: args.tiled,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalized Difference Vegetation Index: (NIR-RED)/(NIR+RED)
    Ndvi {
        /// Multispectral input raster
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = "ndvi.tif")]
        output: PathBuf,

        /// Red band number (1-based)
        #[arg(long, default_value = "3")]
        red: usize,

        /// NIR band number (1-based)
        #[arg(long, default_value = "4")]
        nir: usize,

        #[command(flatten)]
        tiling: TilingArgs,

        #[command(flatten)]
        output_args: OutputArgs,
    },

    /// Print the tile windows for a raster without processing it
    Plan {
        /// Input raster
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        tiling: TilingArgs,
    },

    /// Run every operation listed in a JSON batch file
    Batch {
        /// Batch configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}
