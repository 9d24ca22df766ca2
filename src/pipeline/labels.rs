//! Label options and selection reconciliation
//!
//! Two phases per event: candidates come from the categorical selections
//! alone, then the previous selection is narrowed to those candidates.
//! The second phase never feeds back into the first.

use polars::prelude::DataFrame;
use serde::Serialize;
use std::collections::HashSet;

use crate::constants::columns;
use crate::data::source::column_series;
use crate::error::Result;

/// Outcome of reconciling the label control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelUpdate {
    /// Valid labels under the categorical selections
    pub options: Vec<String>,
    /// Previous selection restricted to `options`
    pub selection: Vec<String>,
    /// Previously selected labels that are no longer valid
    pub dropped: Vec<String>,
}

/// Distinct labels of a categorically filtered view, in order of appearance
pub fn candidate_labels(categorical_view: &DataFrame) -> Result<Vec<String>> {
    profiling::scope!("labels::candidates");

    let unique = column_series(categorical_view, columns::BEZEICHNUNG)?.unique_stable()?;
    Ok(unique
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect())
}

/// Keep previously selected labels that are still candidates; never add any
pub fn reconcile(previous: &[String], options: Vec<String>) -> LabelUpdate {
    let valid: HashSet<&str> = options.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    let mut selection = Vec::new();
    let mut dropped = Vec::new();

    for label in previous {
        if !seen.insert(label.as_str()) {
            continue;
        }
        if valid.contains(label.as_str()) {
            selection.push(label.clone());
        } else {
            dropped.push(label.clone());
        }
    }

    if !dropped.is_empty() {
        tracing::debug!(dropped = ?dropped, "stale labels removed from selection");
    }

    LabelUpdate {
        options,
        selection,
        dropped,
    }
}
