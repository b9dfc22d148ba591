//! Neighborhood-based defect detectors.
//!
//! Every detector scans interior pixels with a [`NeighborhoodGeometry`], tests
//! each window independently and returns the flagged center positions in
//! ascending order.

pub mod hierarchical;
pub mod mean;
pub mod median_pair;


use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{Error, Result};
use crate::geometry::NeighborhoodGeometry;
use crate::raster::Raster;

/// Opposite neighbor pairs as indices into the 3x3 offset table:
/// top/bottom, left/right, main diagonal, anti-diagonal.
pub(crate) const OPPOSITE_PAIRS: [(usize, usize); 4] = [(1, 6), (3, 4), (0, 7), (2, 5)];

const ONLY_3X3: &[usize] = &[3];

/// Detection algorithm family.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
)]
pub enum DetectorKind {
    /// Deviation from the unweighted neighbor mean.
    #[strum(to_string = "mean")]
    Mean,
    /// Deviation from a median-of-medians over opposite neighbor pairs.
    #[strum(to_string = "median")]
    MedianPair,
    /// Deviation from the neighbor chosen by a weighted three-criterion vote.
    #[strum(to_string = "hierarchical")]
    Hierarchical,
}

/// A detector together with the window it runs on, e.g. `mean5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Method {
    pub kind: DetectorKind,
    pub window_size: usize,
}

impl Method {
    pub const MEAN3: Method = Method::new(DetectorKind::Mean, 3);
    pub const MEAN5: Method = Method::new(DetectorKind::Mean, 5);
    pub const MEDIAN3: Method = Method::new(DetectorKind::MedianPair, 3);
    pub const HIERARCHICAL3: Method = Method::new(DetectorKind::Hierarchical, 3);

    pub const fn new(kind: DetectorKind, window_size: usize) -> Self {
        Self { kind, window_size }
    }

    /// Every supported method, in report column order.
    pub fn all() -> Vec<Method> {
        vec![Self::MEAN3, Self::MEAN5, Self::MEDIAN3, Self::HIERARCHICAL3]
    }

    /// Run the detector over `raster` with an absolute sample-unit `threshold`.
    pub fn detect(&self, raster: &Raster, threshold: f64) -> Result<Vec<usize>> {
        let flagged = match self.kind {
            DetectorKind::Mean => mean::detect(raster, self.window_size, threshold),
            DetectorKind::MedianPair => {
                require_3x3(self.window_size)?;
                median_pair::detect(raster, threshold)
            }
            DetectorKind::Hierarchical => {
                require_3x3(self.window_size)?;
                hierarchical::detect(raster, threshold)
            }
        }?;

        tracing::debug!(method = %self, threshold, flagged = flagged.len(), "Detector finished");
        Ok(flagged)
    }
}

fn require_3x3(window_size: usize) -> Result<()> {
    if window_size == 3 {
        Ok(())
    } else {
        Err(Error::InvalidWindowSize {
            window_size,
            supported: ONLY_3X3,
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.window_size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid method '{0}', expected a detector name followed by a window size (e.g. mean3)")]
pub struct ParseMethodError(pub String);

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| ParseMethodError(s.to_string()))?;
        let (name, size) = s.split_at(split);

        let kind = name
            .parse::<DetectorKind>()
            .map_err(|_| ParseMethodError(s.to_string()))?;
        let window_size = size
            .parse::<usize>()
            .map_err(|_| ParseMethodError(s.to_string()))?;

        Ok(Self { kind, window_size })
    }
}

impl TryFrom<String> for Method {
    type Error = ParseMethodError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Method> for String {
    fn from(value: Method) -> Self {
        value.to_string()
    }
}

/// Test every valid window origin in parallel and collect the centers of the
/// windows for which `is_defect` holds, in ascending order.
pub(crate) fn scan_windows<F>(
    geometry: &NeighborhoodGeometry,
    pixel_count: usize,
    is_defect: F,
) -> Vec<usize>
where
    F: Fn(usize) -> bool + Sync,
{
    let center_offset = geometry.center_offset();
    geometry
        .origin_range(pixel_count)
        .into_par_iter()
        .filter(|&origin| geometry.is_valid_origin(origin) && is_defect(origin))
        .map(|origin| origin + center_offset)
        .collect()
}
