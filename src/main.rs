// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use raster_tiler::batch::{band_index, process_batch};
use raster_tiler::cli::{Cli, Commands};
use raster_tiler::config::TilingConfig;
use raster_tiler::io::{Access, CreateOptions, GdalRaster};
use raster_tiler::processing::{indices::NDVI, TiledProcessor};
use raster_tiler::tiling::TileScheduler;
use raster_tiler::VERSION;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();
    debug!("raster-tiler {}", VERSION);

    match &cli.command {
        Commands::Ndvi {
            input,
            output,
            red,
            nir,
            tiling,
            output_args,
        } => {
            let ndvi = NDVI::new(band_index(*red)?, band_index(*nir)?, None);
            let processor = TiledProcessor::new(TilingConfig::from(tiling));

            processor
                .process(
                    &ndvi,
                    input,
                    output,
                    &output_args.format,
                    &CreateOptions::from(output_args),
                )
                .with_context(|| format!("NDVI failed for {}", input.display()))?;

            info!("Processing complete: {}", output.display());
        }
        Commands::Plan { input, tiling } => {
            let raster = GdalRaster::open(input, Access::ReadOnly)
                .with_context(|| format!("Unable to open {}", input.display()))?;
            let config = TilingConfig::from(tiling);
            let scheduler =
                TileScheduler::from_store(&raster, config.memory_budget, config.overlap, config.mode)?;

            let ((ulx, uly), (lrx, lry)) = raster.bounds();
            println!(
                "{}: {}x{} pixels, {} bands, bounds ({}, {}) - ({}, {})",
                input.display(),
                raster.nsamples(),
                raster.nlines(),
                raster.nbands(),
                ulx,
                uly,
                lrx,
                lry
            );
            println!(
                "{} tiles, strip height {}, overlap {} ({})",
                scheduler.tile_count(),
                scheduler.strip_height(),
                scheduler.overlap(),
                scheduler.mode()
            );
            for (tile, windows) in scheduler.tiles() {
                println!("tile {:>4}: read {}  write {}", tile, windows.input, windows.output);
            }
        }
        Commands::Batch { config } => {
            process_batch(config)?;
        }
    }

    Ok(())
}
