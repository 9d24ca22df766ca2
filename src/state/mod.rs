//! Control-state snapshot
//!
//! One `ControlState` holds the current value of every control. It is
//! rebuilt on each interaction and handed to the pipeline as an immutable
//! input; nothing in here is updated in place by the recomputation.

mod filters;
mod view;

pub use filters::{FilterSelection, RunRange, ValueRange};
pub use view::{ChartKind, ViewOptions};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{columns, config};
use crate::data::{stats, Dataset};
use crate::error::Result;

/// Snapshot of all control values for one recomputation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    /// Row selections
    pub filters: FilterSelection,

    /// Chart and column options
    pub view: ViewOptions,
}

impl ControlState {
    /// Startup state: default selections, value window spanning `Current`
    pub fn initial(dataset: &Dataset) -> Result<Self> {
        let mut state = Self::default();
        if let Some(extent) = stats::column_extent(dataset.dataframe(), columns::CURRENT)? {
            state.filters.set_value_range(extent.min, extent.max);
        }
        Ok(state)
    }

    /// State file to read: the explicit path, else `STATE_FILE` in `dir`
    /// when one exists there
    pub fn locate(explicit: Option<&Path>, dir: &Path) -> Option<PathBuf> {
        match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = dir.join(config::STATE_FILE);
                default.is_file().then_some(default)
            }
        }
    }

    /// Read a control state from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut state: ControlState = serde_json::from_str(&contents)?;
        state.validate();
        Ok(state)
    }

    /// Write the control state as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Normalize swapped or out-of-domain values
    pub fn validate(&mut self) {
        self.filters.validate();
    }
}
