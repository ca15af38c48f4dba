// src/processing/indices/ndvi.rs
use itertools::izip;

use crate::buffer::TypedBuffer;
use crate::error::{Result, TilerError};
use crate::pixel::Pixel;
use crate::processing::tiled::IndexCalculator;

/// Keeps the ratio finite where both bands are zero.
pub const EPSILON: f32 = 1e-6;

/// Normalized Difference Vegetation Index (NDVI) calculator
///
/// `(NIR - RED) / (NIR + RED + EPSILON)`, computed in `f32` whatever the
/// input element type.
pub struct NDVI {
    red_index: usize,
    nir_index: usize,
    name: String,
}

impl NDVI {
    /// Band indices are 0-based positions in the input buffer.
    pub fn new(red_index: usize, nir_index: usize, name: Option<String>) -> Self {
        Self {
            red_index,
            nir_index,
            name: name.unwrap_or_else(|| "NDVI".to_string()),
        }
    }
}

impl Default for NDVI {
    /// Blue, Green, Red, NIR band order: red is band 3, NIR band 4.
    fn default() -> Self {
        Self::new(2, 3, None)
    }
}

impl IndexCalculator for NDVI {
    fn calculate<T: Pixel>(&self, input: &TypedBuffer<T>, output: &mut TypedBuffer<f32>) -> Result<()> {
        if output.band_len() != input.band_len() {
            return Err(TilerError::LengthMismatch {
                expected: input.band_len(),
                actual: output.band_len(),
            });
        }

        let red = input.band(self.red_index)?;
        let nir = input.band(self.nir_index)?;
        let result = output.band_mut(0)?;

        for (out, &r, &n) in izip!(result.iter_mut(), red, nir) {
            let (r, n) = (r.to_f32(), n.to_f32());
            *out = (n - r) / (n + r + EPSILON);
        }
        Ok(())
    }

    fn required_bands(&self) -> usize {
        self.red_index.max(self.nir_index) + 1
    }

    fn name(&self) -> &str {
        &self.name
    }
}
