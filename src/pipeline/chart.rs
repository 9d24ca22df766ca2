//! Chart descriptors
//!
//! Turns a filtered view plus display options into renderable chart
//! descriptions: a single chart split by color value, a faceted grid with one
//! panel per Y column, or the stitched VD/VH transition chart.

use polars::prelude::DataFrame;
use serde::Serialize;
use std::collections::HashMap;

use super::axis::AxisRange;
use super::smoothing::{stitch, SavitzkyGolay, Segment, SmoothingUnavailable};
use crate::constants::{columns, layout};
use crate::data::{column_as_f64, column_as_string, column_values, format_number, Typ, Values};
use crate::error::Result;
use crate::state::{ChartKind, ViewOptions};

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesMode {
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "bars")]
    Bars,
}

impl SeriesMode {
    pub fn for_kind(kind: ChartKind, show_markers: bool) -> Self {
        match kind {
            ChartKind::Line if show_markers => SeriesMode::LinesMarkers,
            ChartKind::Line => SeriesMode::Lines,
            ChartKind::Bar => SeriesMode::Bars,
            ChartKind::Scatter => SeriesMode::Markers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    /// Value the renderer keys the trace color on
    pub color_group: String,
    pub mode: SeriesMode,
    pub x: Values,
    pub y: Vec<f64>,
    /// `Bezeichnung` of every point
    pub hover: Vec<String>,
    /// Per-point symbol key, when points are symbol-differentiated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<Vec<String>>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub x_title: String,
    pub y_title: String,
    pub y_range: Option<[f64; 2]>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub x_range_slider: bool,
}

impl ChartLayout {
    fn new(x_range_slider: bool) -> Self {
        Self {
            width: layout::CHART_WIDTH,
            height: layout::CHART_HEIGHT,
            x_range_slider,
        }
    }
}

/// One renderable chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub kind: ChartKind,
    pub title: String,
    pub panels: Vec<Panel>,
    pub layout: ChartLayout,
}

impl ChartDescriptor {
    /// All series across panels
    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.panels.iter().flat_map(|p| p.series.iter())
    }

    pub fn series_count(&self) -> usize {
        self.series().count()
    }

    pub fn find_series(&self, name: &str) -> Option<&Series> {
        self.series().find(|s| s.name == name)
    }
}

/// Result of the smoothing step for one Y column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SmoothingOutcome {
    Applied { samples: usize },
    Unavailable { reason: SmoothingUnavailable },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmoothingReport {
    pub column: String,
    #[serde(flatten)]
    pub outcome: SmoothingOutcome,
}

/// Column values shared by the chart builders
struct ViewColumns {
    x: Values,
    hover: Vec<String>,
    symbols: Vec<String>,
}

impl ViewColumns {
    fn read(view: &DataFrame, options: &ViewOptions) -> Result<Self> {
        Ok(Self {
            x: column_values(view, &options.x_column)?,
            hover: column_as_string(view, columns::BEZEICHNUNG)?,
            symbols: column_as_string(view, &options.symbol_column)?,
        })
    }

    fn series(
        &self,
        name: String,
        color_group: String,
        mode: SeriesMode,
        y: &[f64],
        rows: &[usize],
        with_symbols: bool,
    ) -> Series {
        Series {
            name,
            color_group,
            mode,
            x: self.x.select(rows),
            y: rows.iter().map(|&i| y[i]).collect(),
            hover: rows.iter().map(|&i| self.hover[i].clone()).collect(),
            symbols: with_symbols.then(|| rows.iter().map(|&i| self.symbols[i].clone()).collect()),
        }
    }
}

/// Row positions per distinct key, in order of first appearance
fn group_rows(keys: &[String]) -> Vec<(&str, Vec<usize>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
    for (row, key) in keys.iter().enumerate() {
        let slot = *index.entry(key.as_str()).or_insert_with(|| {
            groups.push((key.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(row);
    }
    groups
}

/// Main chart of the filtered view: single chart for one Y column, faceted
/// grid for several.
pub fn assemble(
    view: &DataFrame,
    options: &ViewOptions,
    labels: &[String],
    value_axis: &AxisRange,
) -> Result<ChartDescriptor> {
    profiling::scope!("chart::assemble");

    if options.is_faceted() {
        faceted_chart(view, options, labels, value_axis)
    } else {
        single_chart(view, options, value_axis)
    }
}

fn single_chart(view: &DataFrame, options: &ViewOptions, value_axis: &AxisRange) -> Result<ChartDescriptor> {
    let mode = SeriesMode::for_kind(options.chart_kind, options.show_markers);
    let with_symbols = match options.chart_kind {
        ChartKind::Scatter => true,
        ChartKind::Line => options.show_markers,
        ChartKind::Bar => false,
    };

    let mut series = Vec::new();
    if let Some(y_column) = options.y_columns.first() {
        let cols = ViewColumns::read(view, options)?;
        let y = column_as_f64(view, y_column)?;
        let colors = column_as_string(view, &options.color_column)?;

        for (color, rows) in group_rows(&colors) {
            let name = color.to_string();
            series.push(cols.series(name.clone(), name, mode, &y, &rows, with_symbols));
        }
    }

    Ok(ChartDescriptor {
        kind: options.chart_kind,
        title: options.chart_title(),
        panels: vec![Panel {
            x_title: options.x_axis_title(),
            y_title: options.y_axis_title(None),
            y_range: Some(value_axis.bounds()),
            series,
        }],
        layout: ChartLayout::new(true),
    })
}

fn faceted_chart(
    view: &DataFrame,
    options: &ViewOptions,
    labels: &[String],
    value_axis: &AxisRange,
) -> Result<ChartDescriptor> {
    let mode = SeriesMode::for_kind(options.chart_kind, options.show_markers);
    let with_symbols = options.chart_kind == ChartKind::Scatter;
    let cols = ViewColumns::read(view, options)?;

    let by_label: HashMap<&str, Vec<usize>> = group_rows(&cols.hover).into_iter().collect();

    let mut panels = Vec::with_capacity(options.y_columns.len());
    for y_column in &options.y_columns {
        let y = column_as_f64(view, y_column)?;
        let series = labels
            .iter()
            .map(|label| {
                let rows = by_label.get(label.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                cols.series(
                    format!("{} {}", y_column, label),
                    label.clone(),
                    mode,
                    &y,
                    rows,
                    with_symbols,
                )
            })
            .collect();

        panels.push(Panel {
            x_title: options.x_axis_title(),
            y_title: options.y_axis_title(Some(y_column)),
            y_range: Some(value_axis.bounds()),
            series,
        });
    }

    Ok(ChartDescriptor {
        kind: options.chart_kind,
        title: options.chart_title(),
        panels,
        layout: ChartLayout::new(false),
    })
}

/// Stitched VD/VH charts, one per Y column. The raw regime traces are always
/// emitted; the smoothed overlay only when the filter succeeds.
pub fn transition_charts(
    view: &DataFrame,
    options: &ViewOptions,
    transition: f64,
    smoother: &SavitzkyGolay,
) -> Result<(Vec<ChartDescriptor>, Vec<SmoothingReport>)> {
    profiling::scope!("chart::transition_charts");

    let time = column_as_f64(view, columns::ZEIT)?;
    let typ: Vec<Option<Typ>> = column_as_string(view, columns::TYP)?
        .iter()
        .map(|t| Typ::parse(t))
        .collect();

    let mut charts = Vec::with_capacity(options.y_columns.len());
    let mut reports = Vec::with_capacity(options.y_columns.len());

    for y_column in &options.y_columns {
        let values = column_as_f64(view, y_column)?;

        // rows without a known regime take no part in the composite
        let (t, (k, v)): (Vec<f64>, (Vec<Typ>, Vec<f64>)) = time
            .iter()
            .zip(&typ)
            .zip(&values)
            .filter_map(|((t, k), v)| k.map(|k| (*t, (k, *v))))
            .unzip();
        let composite = stitch(&t, &k, &v, transition);

        let raw = |regime: Typ, segment: &Segment| Series {
            name: format!("{} {}", y_column, regime),
            color_group: regime.to_string(),
            mode: SeriesMode::Lines,
            x: Values::Numbers(segment.time.clone()),
            y: segment.values.clone(),
            hover: Vec::new(),
            symbols: None,
        };
        let mut series = vec![
            raw(Typ::VD, &composite.early),
            raw(Typ::VH, &composite.late),
        ];

        let outcome = match smoother.smooth(&composite.values()) {
            Ok(smoothed) => {
                series.push(Series {
                    name: format!("{} smoothed", y_column),
                    color_group: "smoothed".to_string(),
                    mode: SeriesMode::Lines,
                    x: Values::Numbers(composite.time()),
                    y: smoothed,
                    hover: Vec::new(),
                    symbols: None,
                });
                SmoothingOutcome::Applied {
                    samples: composite.len(),
                }
            }
            Err(reason) => {
                tracing::warn!(column = %y_column, %reason, "smoothing unavailable");
                SmoothingOutcome::Unavailable { reason }
            }
        };

        charts.push(ChartDescriptor {
            kind: ChartKind::Line,
            title: format!(
                "{} (transition at {})",
                options.chart_title(),
                format_number(transition)
            ),
            panels: vec![Panel {
                x_title: columns::ZEIT.to_string(),
                y_title: options.y_axis_title(Some(y_column)),
                y_range: None,
                series,
            }],
            layout: ChartLayout::new(true),
        });
        reports.push(SmoothingReport {
            column: y_column.clone(),
            outcome,
        });
    }

    Ok((charts, reports))
}
