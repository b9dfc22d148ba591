//! Load-then-analyze entry points.

use std::path::Path;

use crate::aggregator::{DefectAggregator, DefectReport};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::raster::{ImageSource, Raster};

/// Analyze an already loaded raster.
pub fn analyze(raster: &Raster, config: &AnalysisConfig) -> Result<DefectReport> {
    config.validate()?;
    let threshold = config.absolute_threshold(raster.max_sample_value());
    DefectAggregator::new(&config.methods).aggregate(raster, threshold)
}

/// Load `path` through `source` and analyze it. Load failures are returned
/// unchanged and no report is produced.
pub fn analyze_file<S: ImageSource + ?Sized>(
    source: &S,
    path: &Path,
    config: &AnalysisConfig,
) -> Result<DefectReport> {
    config.validate()?;
    let raster = source.load(path)?;
    analyze(&raster, config)
}
