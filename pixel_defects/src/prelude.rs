//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use pixel_defects::prelude::*;
//! ```

pub use crate::{
    aggregate, analyze, analyze_file, AnalysisConfig, ChannelLayout, DefectAggregator,
    DefectRecord, DefectReport, Error, ImageSource, LoadError, Method, Raster, TiffSource,
};
