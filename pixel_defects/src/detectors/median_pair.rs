//! Median-of-diametric-pairs detector (3x3 only).
//!
//! Each of the four opposite neighbor pairs is reduced with the center to a
//! three-value median. The pair medians are folded in a fixed cascade:
//!
//! ```text
//! r1       = median3(center, m(top/bottom), m(left/right))
//! r2       = median3(center, m(diagonal),   m(anti-diagonal))
//! expected = median3(center, r1, r2)
//! ```
//!
//! The pixel is flagged when `expected - center` exceeds the threshold in any
//! channel.

use super::{scan_windows, OPPOSITE_PAIRS};
use crate::error::Result;
use crate::geometry::NeighborhoodGeometry;
use crate::math::{exceeds_threshold, median3};
use crate::raster::Raster;

pub fn detect(raster: &Raster, threshold: f64) -> Result<Vec<usize>> {
    let geometry = NeighborhoodGeometry::for_raster(3, raster)?;
    let channels = raster.channel_count();
    let offsets = geometry.offsets();

    Ok(scan_windows(&geometry, raster.pixel_count(), |origin| {
        let center_index = origin + geometry.center_offset();
        (0..channels).any(|channel| {
            let center = raster.sample(center_index, channel);
            let pair_median = |(a, b): (usize, usize)| {
                median3(
                    center,
                    raster.sample(origin + offsets[a], channel),
                    raster.sample(origin + offsets[b], channel),
                )
            };
            let [m0, m1, m2, m3] = OPPOSITE_PAIRS.map(pair_median);

            let expected = median3(center, median3(center, m0, m1), median3(center, m2, m3));
            exceeds_threshold(expected as f64 - center as f64, threshold)
        })
    }))
}
