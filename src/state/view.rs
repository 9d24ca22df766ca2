//! Chart and column selection options

use crate::constants::{columns, controls};
use serde::{Deserialize, Serialize};

/// Chart kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
}

impl Default for ChartKind {
    fn default() -> Self {
        ChartKind::Line
    }
}

/// Display options of the chart area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewOptions {
    /// X axis column
    pub x_column: String,

    /// Y axis columns; more than one switches to the faceted layout
    pub y_columns: Vec<String>,

    /// Column whose values pick the trace color
    pub color_column: String,

    /// Column whose values pick the marker symbol
    pub symbol_column: String,

    pub chart_kind: ChartKind,

    /// Draw point markers on line charts
    pub show_markers: bool,

    /// Chart title override
    pub title: Option<String>,

    /// X axis title override
    pub x_title: Option<String>,

    /// Y axis title override
    pub y_title: Option<String>,

    /// Time separating the VD and VH regimes; enables the stitched chart
    pub transition: Option<f64>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            x_column: columns::ZEIT.to_string(),
            y_columns: vec![columns::CURRENT.to_string()],
            color_column: controls::DEFAULT_COLOR_COLUMN.to_string(),
            symbol_column: controls::DEFAULT_SYMBOL_COLUMN.to_string(),
            chart_kind: ChartKind::default(),
            show_markers: false,
            title: Some(controls::DEFAULT_TITLE.to_string()),
            x_title: Some(columns::ZEIT.to_string()),
            y_title: Some(columns::CURRENT.to_string()),
            transition: None,
        }
    }
}

/// Non-blank override or the synthesized fallback
fn or_default(value: &Option<String>, fallback: impl FnOnce() -> String) -> String {
    match value.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => fallback(),
    }
}

impl ViewOptions {
    /// Create a new ViewOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the faceted multi-column layout applies
    pub fn is_faceted(&self) -> bool {
        self.y_columns.len() > 1
    }

    pub fn chart_title(&self) -> String {
        or_default(&self.title, || {
            format!("{} vs {}", self.y_columns.join(", "), self.x_column)
        })
    }

    pub fn x_axis_title(&self) -> String {
        or_default(&self.x_title, || self.x_column.clone())
    }

    /// Y title of the single chart, or of one facet panel
    pub fn y_axis_title(&self, panel_column: Option<&str>) -> String {
        or_default(&self.y_title, || match panel_column {
            Some(column) => column.to_string(),
            None => self.y_columns.join(" / "),
        })
    }

    /// Every (control, column) pair the options refer to
    pub fn referenced_columns(&self) -> Vec<(&'static str, &str)> {
        let mut refs = vec![
            ("x axis", self.x_column.as_str()),
            ("color", self.color_column.as_str()),
            ("symbol", self.symbol_column.as_str()),
        ];
        refs.extend(self.y_columns.iter().map(|c| ("y axis", c.as_str())));
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_fallbacks() {
        let mut view = ViewOptions::new();
        assert_eq!(view.chart_title(), "Auswertung");

        view.title = Some("   ".to_string());
        view.x_title = None;
        view.y_title = None;
        view.y_columns = vec!["Current".into(), "Voltage".into()];
        assert_eq!(view.chart_title(), "Current, Voltage vs Zeit");
        assert_eq!(view.x_axis_title(), "Zeit");
        assert_eq!(view.y_axis_title(None), "Current / Voltage");
        assert_eq!(view.y_axis_title(Some("Voltage")), "Voltage");
        assert!(view.is_faceted());
    }

    #[test]
    fn test_chart_kind_serde() {
        let kind: ChartKind = serde_json::from_str("\"scatter\"").unwrap();
        assert_eq!(kind, ChartKind::Scatter);
        assert_eq!(serde_json::to_string(&ChartKind::Bar).unwrap(), "\"bar\"");
    }
}
