//! Discharge-current explorer
//!
//! Loads battery discharge measurements (VD and VH regimes), filters them
//! through cascading categorical and numeric selections, and produces chart
//! descriptors for the filtered view together with the recomputed control
//! values (slider bounds, label options and selection).
//!
//! ```no_run
//! use std::sync::Arc;
//! use discharge_explorer::{Dataset, Pipeline};
//!
//! # fn main() -> discharge_explorer::Result<()> {
//! let dataset = Arc::new(Dataset::load(&["vd.csv", "vh.csv"])?);
//! let pipeline = Pipeline::new(dataset)?;
//! let state = pipeline.initial_state()?;
//! let bundle = pipeline.recompute(&state)?;
//! println!("{} rows, {} charts", bundle.row_count, bundle.charts.len());
//! # Ok(())
//! # }
//! ```

mod perf;

pub mod constants;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod state;

pub use data::{Dataset, Typ};
pub use error::{ExplorerError, Result};
pub use pipeline::{OutputBundle, Pipeline};
pub use state::{ControlState, FilterSelection, ViewOptions};
