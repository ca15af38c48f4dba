// src/subrect.rs
use std::borrow::Cow;

use log::trace;

use crate::buffer::TypedBuffer;
use crate::dims::RasterDims;
use crate::error::{Result, TilerError};
use crate::io::RasterStore;
use crate::pixel::Pixel;

/// Cuts `output_window` out of a band laid out over `buffer_window`.
///
/// When both windows have the same size the source is handed back borrowed and
/// nothing is copied. Otherwise the matching rows are copied into a new
/// allocation sized to `output_window`.
pub fn extract_subrect<'a, T: Copy>(
    data: &'a [T],
    buffer_window: &RasterDims,
    output_window: &RasterDims,
) -> Result<Cow<'a, [T]>> {
    if data.len() < buffer_window.len() {
        return Err(TilerError::SourceTooSmall {
            expected: buffer_window.len(),
            actual: data.len(),
        });
    }
    if !buffer_window.contains(output_window) {
        return Err(TilerError::WindowNotContained {
            output: *output_window,
            buffer: *buffer_window,
        });
    }

    let (buffer_width, width, height) = (
        buffer_window.width(),
        output_window.width(),
        output_window.height(),
    );

    if buffer_width == width && buffer_window.height() == height {
        return Ok(Cow::Borrowed(&data[..buffer_window.len()]));
    }

    let x_off = output_window.start_sample() - buffer_window.start_sample();
    let y_off = output_window.start_line() - buffer_window.start_line();
    trace!(
        "Extracting {}x{} subrect at offset ({}, {}) from {}x{} buffer",
        width,
        height,
        x_off,
        y_off,
        buffer_width,
        buffer_window.height()
    );

    let mut out = Vec::with_capacity(width * height);
    for row in 0..height {
        let start = (row + y_off) * buffer_width + x_off;
        out.extend_from_slice(&data[start..start + width]);
    }
    Ok(Cow::Owned(out))
}

/// Writes the part of `buffer`'s band `buffer_band` (0-based) that falls in
/// `output_window` to band `store_band` (1-based) of `store`.
///
/// Store errors are returned as-is.
pub fn write_subrect<T: Pixel, S: RasterStore>(
    buffer: &TypedBuffer<T>,
    buffer_band: usize,
    output_window: &RasterDims,
    store_band: usize,
    store: &mut S,
) -> Result<()> {
    let data = buffer.band(buffer_band)?;
    let clipped = extract_subrect(data, buffer.dims(), output_window)?;
    store.write_window(store_band, output_window, &clipped)
}
