//! Analysis configuration.

use serde::{Deserialize, Serialize};

use crate::detectors::Method;
use crate::error::{Error, Result};
use crate::raster::{ChannelLayout, TiffSource};

/// Default threshold as a fraction of the maximum sample value.
pub const DEFAULT_THRESHOLD: f64 = 0.1;

/// Settings for one analysis run.
///
/// Loadable from YAML or JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Deviation threshold as a fraction of the maximum sample value,
    /// strictly between 0 and 1.
    pub threshold: f64,
    /// Detectors to run, e.g. `[mean3, median3]`.
    pub methods: Vec<Method>,
    /// Layout the input image must have.
    pub layout: ChannelLayout,
    /// Smallest accepted image width and height.
    pub min_dimension: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            methods: Method::all(),
            layout: ChannelLayout::Mono16,
            min_dimension: 5,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(Error::InvalidThreshold(self.threshold));
        }
        Ok(())
    }

    /// Threshold in sample units for an image whose samples reach `max_sample`.
    pub fn absolute_threshold(&self, max_sample: u16) -> f64 {
        self.threshold * max_sample as f64
    }

    /// Image source matching this configuration. The minimum dimension is
    /// raised to fit the largest configured window.
    pub fn tiff_source(&self) -> TiffSource {
        let largest_window = self
            .methods
            .iter()
            .map(|method| method.window_size)
            .max()
            .unwrap_or(0);
        TiffSource::new(self.layout, self.min_dimension.max(largest_window))
    }
}
