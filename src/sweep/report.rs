//! JSON persistence for sweep results.
//!
//! The on-disk shape is a single JSON object mapping trace name to that
//! trace's measured series. Field names inside a series match what the
//! downstream plotting scripts expect, so `frame_counts` serializes as
//! `"increments"`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::Result;
use crate::sweep::SweepResult;

/// Measured fault-rate series for one trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSeries {
    /// Frame counts, ascending. Serialized as `increments`.
    #[serde(rename = "increments")]
    pub frame_counts: Vec<usize>,

    /// Fault-rate percentages per frame count, one vector per policy.
    pub rand: Vec<f64>,
    pub lru: Vec<f64>,
    pub clock: Vec<f64>,
}

impl From<SweepResult> for TraceSeries {
    fn from(result: SweepResult) -> Self {
        Self {
            frame_counts: result.frame_counts,
            rand: result.rand,
            lru: result.lru,
            clock: result.clock,
        }
    }
}

/// A collection of sweep results keyed by trace name.
///
/// `BTreeMap` keeps the serialized output stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    traces: BTreeMap<String, TraceSeries>,
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the series for one trace.
    pub fn insert(&mut self, name: impl Into<String>, result: SweepResult) {
        self.traces.insert(name.into(), result.into());
    }

    /// Look up the series for a trace.
    pub fn get(&self, name: &str) -> Option<&TraceSeries> {
        self.traces.get(name)
    }

    /// Number of traces in the report.
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// True if no traces have been recorded.
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Load a report from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
    }

    /// Write the report to a JSON file.
    ///
    /// If the file already exists its entries are kept, with this
    /// report's entries taking precedence on name collisions. Sweeps
    /// over different traces accumulate into one file that way.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        let mut merged = if path.exists() {
            Self::load(path)?
        } else {
            Self::new()
        };
        merged
            .traces
            .extend(self.traces.iter().map(|(k, v)| (k.clone(), v.clone())));

        fs::write(path, serde_json::to_string_pretty(&merged)?)?;
        Ok(())
    }
}
