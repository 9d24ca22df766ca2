//! Reactive recomputation pipeline
//!
//! `Pipeline::recompute` is a pure function of the immutable dataset and one
//! control-state snapshot. Each call rebuilds masks, slider bounds, label
//! options and charts from scratch; nothing is cached between events.

pub mod axis;
pub mod chart;
pub mod labels;
pub mod mask;
pub mod smoothing;

pub use axis::{AxisRange, TickMark};
pub use chart::{ChartDescriptor, ChartLayout, Panel, Series, SeriesMode, SmoothingOutcome, SmoothingReport};
pub use labels::LabelUpdate;
pub use mask::RowMask;
pub use smoothing::{SavitzkyGolay, SmoothingUnavailable};

use serde::Serialize;
use std::sync::Arc;

use crate::data::Dataset;
use crate::error::{ExplorerError, Result};
use crate::state::ControlState;
use crate::timed;

/// Everything fed back to the displayed controls after one recomputation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputBundle {
    pub charts: Vec<ChartDescriptor>,
    /// Recomputed domain of the value-range slider
    pub value_slider: AxisRange,
    pub label_options: Vec<String>,
    /// Always a subset of `label_options`
    pub label_selection: Vec<String>,
    pub smoothing: Vec<SmoothingReport>,
    /// Rows in the filtered view
    pub row_count: usize,
}

impl OutputBundle {
    /// Write the reconciled control values back into a state snapshot
    pub fn apply_to(&self, state: &mut ControlState) {
        state.filters.labels = self.label_selection.clone();
    }
}

/// Recomputation pipeline over one immutable dataset
pub struct Pipeline {
    dataset: Arc<Dataset>,
    smoother: SavitzkyGolay,
}

impl Pipeline {
    pub fn new(dataset: Arc<Dataset>) -> Result<Self> {
        let smoother = SavitzkyGolay::standard()
            .map_err(|e| ExplorerError::Config(format!("smoothing filter: {}", e)))?;
        Ok(Self { dataset, smoother })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Control state as the dashboard first shows it
    pub fn initial_state(&self) -> Result<ControlState> {
        ControlState::initial(&self.dataset)
    }

    /// Reject column selections the dataset cannot satisfy
    fn check_columns(&self, state: &ControlState) -> Result<()> {
        for (control, column) in state.view.referenced_columns() {
            if !self.dataset.has_column(column) {
                return Err(ExplorerError::missing_column(control, column));
            }
        }
        Ok(())
    }

    /// Run every stage for one control-state snapshot
    pub fn recompute(&self, state: &ControlState) -> Result<OutputBundle> {
        timed!("recompute", self.run(state))
    }

    fn run(&self, state: &ControlState) -> Result<OutputBundle> {
        self.check_columns(state)?;

        let frame = self.dataset.dataframe();
        let filters = &state.filters;
        let view = &state.view;

        // Upstream view: categorical selections only
        let categorical = timed!("categorical view", {
            let m = mask::evaluate(frame, mask::categorical_expr(filters))?;
            mask::apply(frame, &m)?
        });

        // Phase 1 derives candidates, phase 2 narrows the old selection
        let update = labels::reconcile(&filters.labels, labels::candidate_labels(&categorical)?);

        let value_slider = timed!(
            "value axis",
            axis::value_axis(&categorical, frame, &view.y_columns)?
        );

        let filtered = timed!("row mask", {
            let m = mask::evaluate(
                frame,
                mask::row_expr(filters, &update.selection, &view.y_columns),
            )?;
            mask::apply(frame, &m)?
        });

        let mut charts = vec![timed!(
            "chart",
            chart::assemble(&filtered, view, &update.selection, &value_slider)?
        )];

        let mut smoothing = Vec::new();
        if let Some(transition) = view.transition {
            let (extra, reports) = timed!(
                "transition charts",
                chart::transition_charts(&filtered, view, transition, &self.smoother)?
            );
            charts.extend(extra);
            smoothing = reports;
        }

        tracing::debug!(
            rows = filtered.height(),
            labels = update.options.len(),
            selected = update.selection.len(),
            charts = charts.len(),
            "recomputed"
        );

        Ok(OutputBundle {
            charts,
            value_slider,
            label_options: update.options,
            label_selection: update.selection,
            smoothing,
            row_count: filtered.height(),
        })
    }
}
