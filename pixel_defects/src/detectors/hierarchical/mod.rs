//! Hierarchical weighted-criteria detector (3x3 only).
//!
//! For every interior pixel the detector picks the neighbor that best
//! represents the local background and compares the pixel against it. The
//! choice is a vote over the eight directions, each direction scoring three
//! normalized criteria:
//!
//! 1. **Neighborhood mean**: the mean of the neighbor's own neighbors, with
//!    the tested pixel left out, scored as its distance below the maximum
//!    sample value. Darker surroundings score higher.
//! 2. **Same-value support**: how many of the neighbor's own neighbors share
//!    its exact value, again not counting the tested pixel.
//! 3. **Opposite-pair contrast**: how similar the neighbor is to the neighbor
//!    on the opposite side; both directions of a pair get the same weight.
//!
//! Each criterion sums to one over the eight directions (a criterion with a
//! zero normalizer spreads `1/8` evenly), so the combined score `P` weighs
//! the criteria equally. The highest `P` wins; ties go to the first
//! direction in offset-table order.
//!
//! Neighbor sums and match counts are shared by overlapping windows, so they
//! are computed once for the whole image before any window is scored.


use rayon::prelude::*;

use super::{scan_windows, OPPOSITE_PAIRS};
use crate::error::Result;
use crate::geometry::NeighborhoodGeometry;
use crate::math::exceeds_threshold;
use crate::raster::Raster;

const DIRECTIONS: usize = 8;

/// Relative positions of the 8-connected neighbors, in offset-table order.
const NEIGHBOR_STEPS: [(isize, isize); DIRECTIONS] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Per-pixel neighbor statistics for one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct NeighborStats {
    /// Sum of the in-bounds neighbor samples.
    pub sum: u32,
    /// Neighbors whose sample equals the pixel's own.
    pub matches: u8,
    /// In-bounds neighbors (8 inside, 5 on edges, 3 in corners).
    pub count: u8,
}

/// Criterion weights per direction, `criteria[c][d]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DirectionWeights {
    pub criteria: [[f64; DIRECTIONS]; 3],
}

impl DirectionWeights {
    /// Combined score `P` per direction.
    pub fn scores(&self) -> [f64; DIRECTIONS] {
        std::array::from_fn(|d| self.criteria.iter().map(|c| c[d]).sum())
    }

    /// Direction with the highest score, first one on ties.
    pub fn best_direction(&self) -> usize {
        let scores = self.scores();
        let mut best = 0;
        for d in 1..DIRECTIONS {
            if scores[d] > scores[best] {
                best = d;
            }
        }
        best
    }
}

pub fn detect(raster: &Raster, threshold: f64) -> Result<Vec<usize>> {
    let geometry = NeighborhoodGeometry::for_raster(3, raster)?;

    // Pass 1 must cover the whole image before any window is scored.
    let stats: Vec<Vec<NeighborStats>> = (0..raster.channel_count())
        .map(|channel| precompute(raster, channel))
        .collect();

    let max_value = raster.max_sample_value() as f64;
    let offsets = geometry.offsets();

    Ok(scan_windows(&geometry, raster.pixel_count(), |origin| {
        let center = origin + geometry.center_offset();
        let neighbors: [usize; DIRECTIONS] = std::array::from_fn(|d| origin + offsets[d]);

        stats.iter().enumerate().any(|(channel, plane)| {
            let weights = direction_weights(raster, channel, plane, center, &neighbors, max_value);
            let best = neighbors[weights.best_direction()];
            let delta = raster.sample(best, channel) as f64 - raster.sample(center, channel) as f64;
            exceeds_threshold(delta, threshold)
        })
    }))
}

/// Pass 1: neighbor sum, same-value count and neighbor count for every pixel.
pub(crate) fn precompute(raster: &Raster, channel: usize) -> Vec<NeighborStats> {
    let width = raster.width() as isize;
    let height = raster.height() as isize;

    (0..raster.pixel_count())
        .into_par_iter()
        .map(|index| {
            let (x, y) = raster.coords(index);
            let value = raster.sample(index, channel);
            let mut stats = NeighborStats::default();

            for (dx, dy) in NEIGHBOR_STEPS {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || ny < 0 || nx >= width || ny >= height {
                    continue;
                }
                let neighbor = raster.sample(ny as usize * width as usize + nx as usize, channel);
                stats.sum += neighbor as u32;
                stats.count += 1;
                if neighbor == value {
                    stats.matches += 1;
                }
            }

            stats
        })
        .collect()
}

/// Pass 2 weights for the window centered on `center`.
pub(crate) fn direction_weights(
    raster: &Raster,
    channel: usize,
    stats: &[NeighborStats],
    center: usize,
    neighbors: &[usize; DIRECTIONS],
    max_value: f64,
) -> DirectionWeights {
    let center_value = raster.sample(center, channel);
    let values: [u16; DIRECTIONS] = std::array::from_fn(|d| raster.sample(neighbors[d], channel));

    let surroundings: [f64; DIRECTIONS] = std::array::from_fn(|d| {
        let s = stats[neighbors[d]];
        let mean = (s.sum - center_value as u32) as f64 / (s.count - 1) as f64;
        max_value - mean
    });

    let support: [f64; DIRECTIONS] = std::array::from_fn(|d| {
        let s = stats[neighbors[d]];
        let matches = s.matches - u8::from(values[d] == center_value);
        matches as f64
    });

    let mut contrast = [0.0; DIRECTIONS];
    let mut pair_total = 0.0;
    for (a, b) in OPPOSITE_PAIRS {
        let similarity = max_value - (values[a] as f64 - values[b] as f64).abs();
        contrast[a] = similarity;
        contrast[b] = similarity;
        pair_total += similarity;
    }

    DirectionWeights {
        criteria: [
            normalize(surroundings, surroundings.iter().sum()),
            normalize(support, support.iter().sum()),
            normalize(contrast, 2.0 * pair_total),
        ],
    }
}

/// Divides every score by `total`.
///
/// A zero `total` means no direction scored at all, for example when no
/// neighbor has an equal-valued neighbor of its own. The criterion then
/// spreads `1/8` to every direction so it still sums to one and leaves the
/// vote to the other criteria.
fn normalize(scores: [f64; DIRECTIONS], total: f64) -> [f64; DIRECTIONS] {
    if total > 0.0 {
        scores.map(|s| s / total)
    } else {
        [1.0 / DIRECTIONS as f64; DIRECTIONS]
    }
}
