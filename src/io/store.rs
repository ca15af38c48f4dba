// src/io/store.rs
use crate::buffer::TypedBuffer;
use crate::dims::RasterDims;
use crate::error::{Result, TilerError};
use crate::pixel::{DataType, Pixel};

/// Narrow view of a raster file: rectangular window I/O plus shape queries.
///
/// Band indices are 1-based, following GDAL.
pub trait RasterStore {
    /// `(samples, lines, bands)`
    fn dimensions(&self) -> (usize, usize, usize);

    fn data_type(&self) -> DataType;

    /// Reads `window` of `band` into the first `window.len()` elements of `dst`.
    fn read_window<T: Pixel>(&self, band: usize, window: &RasterDims, dst: &mut [T]) -> Result<()>;

    /// Writes the first `window.len()` elements of `data` to `window` of `band`.
    fn write_window<T: Pixel>(&mut self, band: usize, window: &RasterDims, data: &[T]) -> Result<()>;
}

/// Reads one store band into one band of `buffer`, using the buffer's own window.
pub fn read_band_into<T: Pixel, S: RasterStore>(
    store: &S,
    buffer: &mut TypedBuffer<T>,
    store_band: usize,
    buffer_band: usize,
) -> Result<()> {
    let window = *buffer.dims();
    let dst = buffer.band_mut(buffer_band)?;
    store.read_window(store_band, &window, dst)
}

/// Checks a window against the raster bounds and a slice length before I/O.
pub(crate) fn check_window(
    window: &RasterDims,
    samples: usize,
    lines: usize,
    available: usize,
) -> Result<()> {
    if window.is_empty() || window.end_sample() >= samples || window.end_line() >= lines {
        return Err(TilerError::WindowOutOfRaster {
            window: *window,
            samples,
            lines,
        });
    }
    if available < window.len() {
        return Err(TilerError::SourceTooSmall {
            expected: window.len(),
            actual: available,
        });
    }
    Ok(())
}

pub(crate) fn check_band(band: usize, nbands: usize) -> Result<()> {
    if band == 0 || band > nbands {
        return Err(TilerError::BandOutOfRange { band, nbands });
    }
    Ok(())
}
