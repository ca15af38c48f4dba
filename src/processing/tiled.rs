// src/processing/tiled.rs
use std::path::Path;

use log::{debug, info};

use crate::buffer::TypedBuffer;
use crate::config::TilingConfig;
use crate::error::{Result, TilerError};
use crate::io::{read_band_into, Access, CreateOptions, GdalRaster, RasterStore};
use crate::pixel::{DataType, Pixel};
use crate::subrect::write_subrect;
use crate::tiling::TileScheduler;

/// Trait for per-pixel index calculators
pub trait IndexCalculator {
    /// Fill `output` from `input`. Both buffers cover the same window.
    fn calculate<T: Pixel>(&self, input: &TypedBuffer<T>, output: &mut TypedBuffer<f32>) -> Result<()>;

    /// Number of input bands the calculator reads
    fn required_bands(&self) -> usize;

    /// Number of bands the calculator produces
    fn output_bands(&self) -> usize {
        1
    }

    /// Return the name of the index
    fn name(&self) -> &str;
}

/// Runs a calculator over a raster one strip at a time.
pub struct TiledProcessor {
    config: TilingConfig,
}

impl TiledProcessor {
    pub fn new(config: TilingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TilingConfig {
        &self.config
    }

    /// Opens `input_path`, creates a `Float32` output carrying the input's
    /// georeferencing and streams the calculator over every tile.
    pub fn process<I: IndexCalculator>(
        &self,
        calculator: &I,
        input_path: &Path,
        output_path: &Path,
        format: &str,
        options: &CreateOptions,
    ) -> Result<TileScheduler> {
        let input = GdalRaster::open(input_path, Access::ReadOnly)?;
        check_band_count(calculator, input.nbands())?;
        // Configuration errors surface before anything is written
        let scheduler = self.scheduler_for(&input)?;

        let mut output = GdalRaster::create(
            output_path,
            &input.dims(),
            calculator.output_bands(),
            DataType::F32,
            format,
            options,
            Some(&input),
        )?;

        info!(
            "Computing {} for {} ({}) -> {}",
            calculator.name(),
            input_path.display(),
            input.data_type(),
            output_path.display()
        );

        match input.data_type() {
            DataType::U8 => run_tiles::<u8, _, _, _>(&scheduler, calculator, &input, &mut output)?,
            DataType::U16 => run_tiles::<u16, _, _, _>(&scheduler, calculator, &input, &mut output)?,
            DataType::I16 => run_tiles::<i16, _, _, _>(&scheduler, calculator, &input, &mut output)?,
            DataType::U32 => run_tiles::<u32, _, _, _>(&scheduler, calculator, &input, &mut output)?,
            DataType::I32 => run_tiles::<i32, _, _, _>(&scheduler, calculator, &input, &mut output)?,
            DataType::F32 => run_tiles::<f32, _, _, _>(&scheduler, calculator, &input, &mut output)?,
            DataType::F64 => run_tiles::<f64, _, _, _>(&scheduler, calculator, &input, &mut output)?,
        }

        let written = output.path().to_path_buf();
        output.close()?;
        info!(
            "Wrote {} tiles of up to {} lines to {}",
            scheduler.tile_count(),
            scheduler.strip_height(),
            written.display()
        );
        Ok(scheduler)
    }

    fn scheduler_for<R: RasterStore>(&self, input: &R) -> Result<TileScheduler> {
        TileScheduler::from_store(
            input,
            self.config.memory_budget,
            self.config.overlap,
            self.config.mode,
        )
    }

    /// The tile loop over any pair of stores, monomorphised on the input
    /// element type. `T` must match the input's data type so strips stay
    /// within the memory budget.
    ///
    /// Tiles are handled in order; the first failing read, calculation or write
    /// aborts the run.
    pub fn run<T, I, R, W>(&self, calculator: &I, input: &R, output: &mut W) -> Result<TileScheduler>
    where
        T: Pixel,
        I: IndexCalculator,
        R: RasterStore,
        W: RasterStore,
    {
        let (_, _, nbands) = input.dimensions();
        check_band_count(calculator, nbands)?;
        let scheduler = self.scheduler_for(input)?;
        run_tiles::<T, _, _, _>(&scheduler, calculator, input, output)?;
        Ok(scheduler)
    }
}

fn run_tiles<T, I, R, W>(scheduler: &TileScheduler, calculator: &I, input: &R, output: &mut W) -> Result<()>
where
    T: Pixel,
    I: IndexCalculator,
    R: RasterStore,
    W: RasterStore,
{
    if T::DATA_TYPE != input.data_type() {
        return Err(TilerError::UnsupportedDataType(format!(
            "{} buffers for {} input",
            T::DATA_TYPE,
            input.data_type()
        )));
    }
    let (_, _, nbands) = input.dimensions();

    for (tile, windows) in scheduler.tiles() {
        debug!(
            "[{}/{}] reading {}, writing {}",
            tile + 1,
            scheduler.tile_count(),
            windows.input,
            windows.output
        );

        let mut input_data = TypedBuffer::<T>::new(windows.input, nbands);
        for band in 0..nbands {
            read_band_into(input, &mut input_data, band + 1, band)?;
        }

        let mut output_data = TypedBuffer::<f32>::new(windows.input, calculator.output_bands());
        calculator.calculate(&input_data, &mut output_data)?;
        drop(input_data);

        for band in 0..calculator.output_bands() {
            write_subrect(&output_data, band, &windows.output, band + 1, output)?;
        }
    }

    Ok(())
}

fn check_band_count<I: IndexCalculator>(calculator: &I, available: usize) -> Result<()> {
    if available < calculator.required_bands() {
        return Err(TilerError::NotEnoughBands {
            required: calculator.required_bands(),
            available,
        });
    }
    Ok(())
}
