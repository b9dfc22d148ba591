//! Neighbor offsets and safe iteration bounds for square windows.
//!
//! A window is addressed by its top-left cell (the *origin*). Offsets are
//! linear index deltas from the origin, so a window is fully described by
//! `origin + offset` for every offset plus `origin + center_offset` for the
//! pixel under test. Origins are restricted so that the window never wraps
//! from the end of one row into the start of the next.

#[cfg(test)]
mod tests;

use std::ops::Range;

use crate::error::{Error, Result};
use crate::raster::Raster;

/// Window sizes the geometry can be built for.
pub const SUPPORTED_WINDOW_SIZES: &[usize] = &[3, 5];

/// Offset table for one `(window_size, width)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborhoodGeometry {
    window_size: usize,
    width: usize,
    /// Neighbor deltas in row-major order with the center skipped.
    offsets: Vec<usize>,
    center_offset: usize,
    valid_column_bound: usize,
}

impl NeighborhoodGeometry {
    /// Build the offset table for `window_size` on rows of `width` pixels.
    pub fn new(window_size: usize, width: usize) -> Result<Self> {
        if !SUPPORTED_WINDOW_SIZES.contains(&window_size) {
            return Err(Error::InvalidWindowSize {
                window_size,
                supported: SUPPORTED_WINDOW_SIZES,
            });
        }

        let margin = window_size / 2;
        let mut offsets = Vec::with_capacity(window_size * window_size - 1);
        for row in 0..window_size {
            for col in 0..window_size {
                if row == margin && col == margin {
                    continue;
                }
                offsets.push(row * width + col);
            }
        }

        Ok(Self {
            window_size,
            width,
            offsets,
            center_offset: margin * width + margin,
            valid_column_bound: (width + 1).saturating_sub(window_size),
        })
    }

    /// Build the geometry for `raster`, rejecting images smaller than the window.
    pub fn for_raster(window_size: usize, raster: &Raster) -> Result<Self> {
        let geometry = Self::new(window_size, raster.width())?;
        if raster.width() < window_size || raster.height() < window_size {
            return Err(Error::ImageTooSmall {
                width: raster.width(),
                height: raster.height(),
                window_size,
            });
        }
        Ok(geometry)
    }

    #[inline]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    #[inline]
    pub fn margin(&self) -> usize {
        self.window_size / 2
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    #[inline]
    pub fn center_offset(&self) -> usize {
        self.center_offset
    }

    /// Exclusive bound on `origin % width` for windows that stay within one row band.
    #[inline]
    pub fn valid_column_bound(&self) -> usize {
        self.valid_column_bound
    }

    /// Largest offset in the table (bottom-right cell).
    #[inline]
    pub fn last_offset(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0)
    }

    /// Candidate origins `[0, pixel_count - last_offset)`; filter with [`Self::is_valid_origin`].
    pub fn origin_range(&self, pixel_count: usize) -> Range<usize> {
        0..pixel_count.saturating_sub(self.last_offset())
    }

    #[inline]
    pub fn is_valid_origin(&self, origin: usize) -> bool {
        origin % self.width < self.valid_column_bound
    }

    /// All valid origins for an image of `pixel_count` pixels, ascending.
    pub fn origins(&self, pixel_count: usize) -> impl Iterator<Item = usize> + '_ {
        self.origin_range(pixel_count)
            .filter(move |&origin| self.is_valid_origin(origin))
    }
}
