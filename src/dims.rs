// src/dims.rs
use std::fmt;

/// A rectangular pixel window with inclusive sample (column) and line (row) bounds.
///
/// Width and height are derived, so a window with `end < start` on either axis
/// cannot size a buffer. Callers building windows by hand are expected to keep
/// `end >= start`; the scheduler never produces anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RasterDims {
    start_sample: usize,
    end_sample: usize,
    start_line: usize,
    end_line: usize,
}

impl RasterDims {
    pub fn new(start_sample: usize, end_sample: usize, start_line: usize, end_line: usize) -> Self {
        Self {
            start_sample,
            end_sample,
            start_line,
            end_line,
        }
    }

    /// Window covering a whole `samples` x `lines` image.
    pub fn full(samples: usize, lines: usize) -> Self {
        Self::new(0, samples.saturating_sub(1), 0, lines.saturating_sub(1))
    }

    pub fn start_sample(&self) -> usize {
        self.start_sample
    }

    pub fn end_sample(&self) -> usize {
        self.end_sample
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn end_line(&self) -> usize {
        self.end_line
    }

    pub fn width(&self) -> usize {
        self.end_sample - self.start_sample + 1
    }

    pub fn height(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    /// Number of pixels in one band of this window.
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.end_sample < self.start_sample || self.end_line < self.start_line
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &RasterDims) -> bool {
        other.start_sample >= self.start_sample
            && other.end_sample <= self.end_sample
            && other.start_line >= self.start_line
            && other.end_line <= self.end_line
    }

    /// Origin and size in the `(isize, isize)` / `(usize, usize)` form GDAL windows use.
    pub fn gdal_window(&self) -> ((isize, isize), (usize, usize)) {
        (
            (self.start_sample as isize, self.start_line as isize),
            (self.width(), self.height()),
        )
    }
}

impl fmt::Display for RasterDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "samples [{}, {}] lines [{}, {}]",
            self.start_sample, self.end_sample, self.start_line, self.end_line
        )
    }
}
