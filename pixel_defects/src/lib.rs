//! Pixel Defects - detection of stuck, hot and dead sensor pixels.
//!
//! Each interior pixel of a raster is compared against statistics of its
//! local neighborhood by several independent detectors:
//! - mean of the 3x3 or 5x5 ring of neighbors
//! - median-of-medians over opposite 3x3 neighbor pairs
//! - a weighted three-criterion vote selecting the most representative neighbor
//!
//! Their outputs are merged into a [`DefectReport`] where each pixel carries
//! the per-method flags and a confidence equal to the fraction of methods that
//! flagged it.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pixel_defects::{analyze_file, AnalysisConfig};
//!
//! let config = AnalysisConfig::default();
//! let report = analyze_file(&config.tiff_source(), "sensor_white.tif".as_ref(), &config)?;
//!
//! for record in &report.records {
//!     println!("({}, {}) confidence {:.2}", record.x, record.y, record.confidence);
//! }
//! ```

mod aggregator;
mod config;
mod detectors;
mod error;
mod geometry;
pub(crate) mod math;
mod pipeline;
mod raster;

#[doc(hidden)]
pub mod testing;

pub mod prelude;

// ============================================================================
// Image model and loading
// ============================================================================

pub use raster::{ChannelLayout, ImageSource, Raster, TiffSource};

// ============================================================================
// Geometry
// ============================================================================

pub use geometry::{NeighborhoodGeometry, SUPPORTED_WINDOW_SIZES};

// ============================================================================
// Detectors
// ============================================================================

pub use detectors::{hierarchical, mean, median_pair, DetectorKind, Method, ParseMethodError};
pub use math::median3;

// ============================================================================
// Aggregation and analysis
// ============================================================================

pub use aggregator::{aggregate, DefectAggregator, DefectRecord, DefectReport};
pub use config::{AnalysisConfig, DEFAULT_THRESHOLD};
pub use error::{Error, LoadError, Result};
pub use pipeline::{analyze, analyze_file};
