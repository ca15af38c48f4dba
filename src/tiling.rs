// src/tiling.rs
use std::fmt;

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::dims::RasterDims;
use crate::error::{Result, TilerError};
use crate::io::RasterStore;

/// How much of the raster one strip must hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TilingMode {
    /// The budget covers every band of a strip simultaneously.
    AllBands,
    /// The budget covers one band of a strip.
    #[default]
    SingleBand,
}

impl fmt::Display for TilingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TilingMode::AllBands => f.write_str("all-bands"),
            TilingMode::SingleBand => f.write_str("single-band"),
        }
    }
}

/// The window to read for a tile and the window its results are written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileWindows {
    /// Output strip expanded by the overlap and clamped to the raster.
    pub input: RasterDims,
    /// Non-overlapping strip of the output raster.
    pub output: RasterDims,
}

impl TileWindows {
    /// Context lines actually available above the output strip.
    pub fn top_overlap(&self) -> usize {
        self.output.start_line() - self.input.start_line()
    }

    /// Context lines actually available below the output strip.
    pub fn bottom_overlap(&self) -> usize {
        self.input.end_line() - self.output.end_line()
    }
}

/// Splits a raster into horizontal strips sized to a memory budget.
///
/// Windows are computed on demand from the tile index; nothing is cached, and
/// the overlap is fixed for the lifetime of the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileScheduler {
    samples: usize,
    lines: usize,
    element_size: usize,
    nbands: usize,
    memory_budget: usize,
    mode: TilingMode,
    overlap: usize,
    strip_height: usize,
    tile_count: usize,
}

impl TileScheduler {
    /// Builds a scheduler for a `samples` x `lines` raster.
    ///
    /// `nbands` only matters in [`TilingMode::AllBands`]. Fails with
    /// [`TilerError::OverlapTooLarge`] when the budget leaves no room for a
    /// single non-overlapping line once `2 * overlap` context lines are reserved.
    pub fn new(
        lines: usize,
        samples: usize,
        element_size: usize,
        nbands: usize,
        memory_budget: usize,
        overlap: usize,
        mode: TilingMode,
    ) -> Result<Self> {
        if lines == 0 || samples == 0 {
            return Err(TilerError::EmptyRaster { samples, lines });
        }
        if element_size == 0 {
            return Err(TilerError::InvalidConfig(
                "element size must be at least one byte".to_string(),
            ));
        }
        if mode == TilingMode::AllBands && nbands == 0 {
            return Err(TilerError::InvalidConfig(
                "all-bands tiling needs at least one band".to_string(),
            ));
        }

        let line_bytes = samples.checked_mul(element_size).ok_or_else(|| {
            TilerError::InvalidConfig(format!(
                "line of {samples} samples x {element_size} bytes overflows"
            ))
        })?;
        let mut lines_per_tile = memory_budget.div_ceil(line_bytes);
        if mode == TilingMode::AllBands {
            lines_per_tile /= nbands;
        }

        // Lines left for output once context is reserved above and below
        let free_lines = overlap
            .checked_mul(2)
            .and_then(|context| lines_per_tile.checked_sub(context))
            .filter(|&free| free > 0)
            .ok_or(TilerError::OverlapTooLarge {
                overlap,
                memory_budget,
                lines_per_tile,
            })?;

        let strip_height = free_lines.min(lines);
        let tile_count = lines.div_ceil(strip_height);

        debug!(
            "TileScheduler: {}x{} raster, {} bytes/element, budget={} ({}) overlap={} → strip height {}, {} tiles",
            samples, lines, element_size, memory_budget, mode, overlap, strip_height, tile_count
        );

        Ok(Self {
            samples,
            lines,
            element_size,
            nbands,
            memory_budget,
            mode,
            overlap,
            strip_height,
            tile_count,
        })
    }

    /// Builds a scheduler from the shape and element type of an open store.
    pub fn from_store<S: RasterStore>(
        store: &S,
        memory_budget: usize,
        overlap: usize,
        mode: TilingMode,
    ) -> Result<Self> {
        let (samples, lines, nbands) = store.dimensions();
        Self::new(
            lines,
            samples,
            store.data_type().size_bytes(),
            nbands,
            memory_budget,
            overlap,
            mode,
        )
    }

    /// A fresh scheduler over the same raster and budget with a different overlap.
    pub fn with_overlap(&self, overlap: usize) -> Result<Self> {
        Self::new(
            self.lines,
            self.samples,
            self.element_size,
            self.nbands,
            self.memory_budget,
            overlap,
            self.mode,
        )
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Lines written per tile (the last tile may be shorter).
    pub fn strip_height(&self) -> usize {
        self.strip_height
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn mode(&self) -> TilingMode {
        self.mode
    }

    pub fn tile_windows(&self, tile: usize) -> Result<TileWindows> {
        if tile >= self.tile_count {
            return Err(TilerError::TileOutOfRange {
                tile,
                count: self.tile_count,
            });
        }

        let last_line = self.lines - 1;
        let last_sample = self.samples - 1;

        let start_line = tile * self.strip_height;
        let end_line = (start_line + self.strip_height - 1).min(last_line);
        let output = RasterDims::new(0, last_sample, start_line, end_line);

        // Expanded after the output clamp; each side is clamped on its own.
        let input = RasterDims::new(
            0,
            last_sample,
            start_line.saturating_sub(self.overlap),
            end_line.saturating_add(self.overlap).min(last_line),
        );

        debug!("Tile {}: input {} output {}", tile, input, output);

        Ok(TileWindows { input, output })
    }

    pub fn tiles(&self) -> Tiles<'_> {
        Tiles {
            scheduler: self,
            next: 0,
        }
    }
}

/// Iterator over `(tile index, windows)` in increasing tile order.
pub struct Tiles<'a> {
    scheduler: &'a TileScheduler,
    next: usize,
}

impl Iterator for Tiles<'_> {
    type Item = (usize, TileWindows);

    fn next(&mut self) -> Option<Self::Item> {
        let tile = self.next;
        let windows = self.scheduler.tile_windows(tile).ok()?;
        self.next += 1;
        Some((tile, windows))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.scheduler.tile_count.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Tiles<'_> {}
