// src/io/raster.rs
use std::path::{Path, PathBuf};

use gdal::raster::{Buffer, GdalType, RasterCreationOptions};
use gdal::{Dataset, DatasetOptions, Driver, DriverManager, GdalOpenFlags, Metadata};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::dims::RasterDims;
use crate::error::{Result, TilerError};
use crate::io::store::{check_band, check_window, RasterStore};
use crate::pixel::{DataType, Pixel};

/// Access mode for [`GdalRaster::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    Update,
}

/// GDAL creation options for new rasters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOptions {
    /// Compression name, or `NONE`.
    pub compress: String,
    pub compress_level: u8,
    pub tiled: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            compress: "NONE".to_string(),
            compress_level: 6,
            tiled: false,
        }
    }
}

impl CreateOptions {
    fn to_gdal(&self) -> RasterCreationOptions {
        let mut options = Vec::new();

        let compress = self.compress.to_uppercase();
        if compress != "NONE" {
            options.push(format!("COMPRESS={compress}"));
            match compress.as_str() {
                "DEFLATE" => options.push(format!("ZLEVEL={}", self.compress_level.min(9))),
                "ZSTD" => options.push(format!("ZSTD_LEVEL={}", self.compress_level.min(22))),
                _ => {}
            }
        }

        if self.tiled {
            options.push("TILED=YES".to_string());
        }

        RasterCreationOptions::from_iter(options)
    }
}

/// A raster file opened through GDAL.
pub struct GdalRaster {
    dataset: Dataset,
    path: PathBuf,
    samples: usize,
    lines: usize,
    nbands: usize,
    data_type: DataType,
}

impl GdalRaster {
    pub fn open<P: AsRef<Path>>(path: P, access: Access) -> Result<Self> {
        let path = path.as_ref();
        let mut open_flags = GdalOpenFlags::GDAL_OF_RASTER;
        if access == Access::Update {
            open_flags |= GdalOpenFlags::GDAL_OF_UPDATE;
        }
        let dataset = Dataset::open_ex(
            path,
            DatasetOptions {
                open_flags,
                ..Default::default()
            },
        )?;
        Self::from_dataset(dataset, path)
    }

    /// Creates a new raster of `dims.width()` x `dims.height()` pixels.
    ///
    /// With a `parent`, the new file inherits its geotransform and projection.
    pub fn create<P: AsRef<Path>>(
        path: P,
        dims: &RasterDims,
        nbands: usize,
        data_type: DataType,
        format: &str,
        options: &CreateOptions,
        parent: Option<&GdalRaster>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let driver = DriverManager::get_driver_by_name(format)?;
        if driver.metadata_item("DCAP_CREATE", "").is_none() {
            return Err(TilerError::UnsupportedDriver(format.to_string()));
        }

        info!(
            "Creating {} raster {}: {}x{} pixels, {} bands of {}",
            format,
            path.display(),
            dims.width(),
            dims.height(),
            nbands,
            data_type
        );

        let mut dataset = match data_type {
            DataType::U8 => create_typed::<u8>(&driver, path, dims, nbands, options)?,
            DataType::U16 => create_typed::<u16>(&driver, path, dims, nbands, options)?,
            DataType::I16 => create_typed::<i16>(&driver, path, dims, nbands, options)?,
            DataType::U32 => create_typed::<u32>(&driver, path, dims, nbands, options)?,
            DataType::I32 => create_typed::<i32>(&driver, path, dims, nbands, options)?,
            DataType::F32 => create_typed::<f32>(&driver, path, dims, nbands, options)?,
            DataType::F64 => create_typed::<f64>(&driver, path, dims, nbands, options)?,
        };

        if let Some(parent) = parent {
            if let Ok(geo_transform) = parent.dataset.geo_transform() {
                dataset.set_geo_transform(&geo_transform)?;
            }
            let projection = parent.dataset.projection();
            if !projection.is_empty() {
                dataset.set_projection(&projection)?;
            }
        }

        Self::from_dataset(dataset, path)
    }

    fn from_dataset(dataset: Dataset, path: &Path) -> Result<Self> {
        let (samples, lines) = dataset.raster_size();
        let nbands = dataset.raster_count() as usize;
        if nbands == 0 {
            return Err(TilerError::InvalidConfig(format!(
                "{} has no raster bands",
                path.display()
            )));
        }
        let data_type = DataType::from_gdal(dataset.rasterband(1)?.band_type())?;

        debug!(
            "Opened {}: {}x{} pixels, {} bands of {}",
            path.display(),
            samples,
            lines,
            nbands,
            data_type
        );

        Ok(Self {
            dataset,
            path: path.to_path_buf(),
            samples,
            lines,
            nbands,
            data_type,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn nsamples(&self) -> usize {
        self.samples
    }

    pub fn nlines(&self) -> usize {
        self.lines
    }

    pub fn nbands(&self) -> usize {
        self.nbands
    }

    /// Window covering the whole raster.
    pub fn dims(&self) -> RasterDims {
        RasterDims::full(self.samples, self.lines)
    }

    pub fn geo_transform(&self) -> Option<[f64; 6]> {
        self.dataset.geo_transform().ok()
    }

    pub fn projection(&self) -> String {
        self.dataset.projection()
    }

    /// Map coordinates of a pixel corner; falls back to pixel coordinates
    /// when the raster carries no geotransform.
    pub fn image_to_map(&self, sample: usize, line: usize) -> (f64, f64) {
        let (x, y) = (sample as f64, line as f64);
        match self.geo_transform() {
            Some(gt) => (gt[0] + x * gt[1] + y * gt[2], gt[3] + x * gt[4] + y * gt[5]),
            None => (x, y),
        }
    }

    /// `((ulx, uly), (lrx, lry))` in map units.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        (
            self.image_to_map(0, 0),
            self.image_to_map(self.samples, self.lines),
        )
    }

    /// Flushes pending writes and releases the dataset.
    pub fn close(mut self) -> Result<()> {
        self.dataset.flush_cache()?;
        debug!("Closed {}", self.path.display());
        Ok(())
    }
}

impl RasterStore for GdalRaster {
    fn dimensions(&self) -> (usize, usize, usize) {
        (self.samples, self.lines, self.nbands)
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn read_window<T: Pixel>(&self, band: usize, window: &RasterDims, dst: &mut [T]) -> Result<()> {
        check_band(band, self.nbands)?;
        check_window(window, self.samples, self.lines, dst.len())?;

        let (origin, size) = window.gdal_window();
        let rasterband = self.dataset.rasterband(band)?;
        rasterband.read_into_slice::<T>(origin, size, size, &mut dst[..window.len()], None)?;
        Ok(())
    }

    fn write_window<T: Pixel>(&mut self, band: usize, window: &RasterDims, data: &[T]) -> Result<()> {
        check_band(band, self.nbands)?;
        check_window(window, self.samples, self.lines, data.len())?;

        let (origin, size) = window.gdal_window();
        let mut rasterband = self.dataset.rasterband(band)?;
        let mut buffer = Buffer::new(size, data[..window.len()].to_vec());
        rasterband.write(origin, size, &mut buffer)?;
        Ok(())
    }
}

fn create_typed<T: GdalType>(
    driver: &Driver,
    path: &Path,
    dims: &RasterDims,
    nbands: usize,
    options: &CreateOptions,
) -> Result<Dataset> {
    let dataset = driver.create_with_band_type_with_options::<T, _>(
        path,
        dims.width(),
        dims.height(),
        nbands,
        &options.to_gdal(),
    )?;
    Ok(dataset)
}
