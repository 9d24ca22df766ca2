//! Categorical and range selections of the control panel

use serde::{Deserialize, Serialize};

use crate::constants::controls::*;
use crate::data::Typ;

/// Inclusive run-index window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRange {
    pub low: i64,
    pub high: i64,
}

impl Default for RunRange {
    fn default() -> Self {
        Self {
            low: RUN_MIN,
            high: RUN_MAX,
        }
    }
}

impl RunRange {
    pub fn contains(&self, run: f64) -> bool {
        run >= self.low as f64 && run <= self.high as f64
    }
}

/// Inclusive window applied to every selected Y column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl Default for ValueRange {
    fn default() -> Self {
        Self {
            low: f64::MIN,
            high: f64::MAX,
        }
    }
}

impl ValueRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

/// Row selection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Selected state-of-charge values
    pub soc: Vec<f64>,

    /// Selected silicon-content values
    pub sio: Vec<f64>,

    /// Selected regimes
    pub typ: Vec<Typ>,

    /// Selected display labels, in selection order
    pub labels: Vec<String>,

    /// Run-index window
    pub runs: RunRange,

    /// Value window for the selected Y columns
    pub values: ValueRange,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            soc: DEFAULT_SOC.to_vec(),
            sio: DEFAULT_SIO.to_vec(),
            typ: vec![Typ::VH, Typ::VD],
            labels: Vec::new(),
            runs: RunRange::default(),
            values: ValueRange::default(),
        }
    }
}

impl FilterSelection {
    /// Create a new FilterSelection with the startup selections
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a row passes the SOC, SiO and Typ selections
    pub fn matches_categories(&self, soc: f64, sio: f64, typ: Typ) -> bool {
        self.soc.contains(&soc) && self.sio.contains(&sio) && self.typ.contains(&typ)
    }

    /// Set the value window
    pub fn set_value_range(&mut self, low: f64, high: f64) {
        self.values = ValueRange::new(low, high);
    }

    /// Validate and fix any invalid selection values
    pub fn validate(&mut self) {
        // Ensure low <= high for the value window
        if self.values.low > self.values.high {
            std::mem::swap(&mut self.values.low, &mut self.values.high);
        }

        if self.runs.low > self.runs.high {
            std::mem::swap(&mut self.runs.low, &mut self.runs.high);
        }
        self.runs.low = self.runs.low.clamp(RUN_MIN, RUN_MAX);
        self.runs.high = self.runs.high.clamp(RUN_MIN, RUN_MAX);

        // only the offered checkbox values can be selected
        self.soc.retain(|v| SOC_OPTIONS.contains(v));
        self.sio.retain(|v| SIO_OPTIONS.contains(v));

        let mut seen = std::collections::HashSet::new();
        self.labels.retain(|label| seen.insert(label.clone()));
    }
}
