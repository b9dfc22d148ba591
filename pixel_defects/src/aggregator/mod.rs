//! Merging detector outputs into a consolidated defect report.


use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::detectors::Method;
use crate::error::Result;
use crate::raster::Raster;

/// One flagged pixel and which methods agreed on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefectRecord {
    /// Linear pixel index (row-major).
    pub position: usize,
    pub x: usize,
    pub y: usize,
    pub flags: BTreeMap<Method, bool>,
    /// Fraction of the run's methods that flagged this pixel.
    pub confidence: f64,
}

impl DefectRecord {
    pub fn flagged_by(&self, method: Method) -> bool {
        self.flags.get(&method).copied().unwrap_or(false)
    }

    pub fn flag_count(&self) -> usize {
        self.flags.values().filter(|&&flag| flag).count()
    }
}

/// Defect records of one analysis run, sorted by position with no duplicates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefectReport {
    pub width: usize,
    pub height: usize,
    /// Absolute threshold in sample units.
    pub threshold: f64,
    pub methods: Vec<Method>,
    pub records: Vec<DefectRecord>,
}

impl DefectReport {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&DefectRecord> {
        self.records
            .binary_search_by_key(&position, |record| record.position)
            .ok()
            .map(|i| &self.records[i])
    }

    pub fn flagged_by(&self, method: Method) -> impl Iterator<Item = &DefectRecord> + '_ {
        self.records
            .iter()
            .filter(move |record| record.flagged_by(method))
    }

    /// Number of flagged pixels per method, in run order.
    pub fn count_by_method(&self) -> Vec<(Method, usize)> {
        self.methods
            .iter()
            .map(|&method| (method, self.flagged_by(method).count()))
            .collect()
    }
}

/// Runs a set of detectors and merges their results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefectAggregator {
    methods: Vec<Method>,
}

impl DefectAggregator {
    /// Repeated methods are kept once, in first-seen order.
    pub fn new(methods: &[Method]) -> Self {
        let mut unique = Vec::with_capacity(methods.len());
        for &method in methods {
            if !unique.contains(&method) {
                unique.push(method);
            }
        }
        Self { methods: unique }
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Run every method over `raster`. The first detector error aborts the
    /// whole run; no partial report is produced.
    pub fn aggregate(&self, raster: &Raster, threshold: f64) -> Result<DefectReport> {
        let method_count = self.methods.len();

        let flagged: Vec<Vec<usize>> = self
            .methods
            .par_iter()
            .map(|method| method.detect(raster, threshold))
            .collect::<Result<_>>()?;

        let mut hits: BTreeMap<usize, Vec<bool>> = BTreeMap::new();
        for (method_index, positions) in flagged.iter().enumerate() {
            for &position in positions {
                hits.entry(position)
                    .or_insert_with(|| vec![false; method_count])[method_index] = true;
            }
        }

        let records: Vec<DefectRecord> = hits
            .into_iter()
            .map(|(position, flags)| {
                let flag_count = flags.iter().filter(|&&flag| flag).count();
                let (x, y) = raster.coords(position);
                DefectRecord {
                    position,
                    x,
                    y,
                    flags: self.methods.iter().copied().zip(flags).collect(),
                    confidence: flag_count as f64 / method_count as f64,
                }
            })
            .collect();

        tracing::info!(
            width = raster.width(),
            height = raster.height(),
            methods = method_count,
            defects = records.len(),
            "Aggregated defect map"
        );

        Ok(DefectReport {
            width: raster.width(),
            height: raster.height(),
            threshold,
            methods: self.methods.clone(),
            records,
        })
    }
}

/// Shorthand for `DefectAggregator::new(methods).aggregate(raster, threshold)`.
pub fn aggregate(raster: &Raster, threshold: f64, methods: &[Method]) -> Result<DefectReport> {
    DefectAggregator::new(methods).aggregate(raster, threshold)
}
