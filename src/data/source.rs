use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{columns, typ as codes};
use crate::error::{ExplorerError, Result};

/// Measurement regime of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Typ {
    VD,
    VH,
}

impl Typ {
    pub fn as_str(&self) -> &'static str {
        match self {
            Typ::VD => "VD",
            Typ::VH => "VH",
        }
    }

    /// Map a numeric regime code from the raw exports
    pub fn from_code(code: f64) -> Option<Self> {
        if code == codes::VH_CODE {
            Some(Typ::VH)
        } else if code == codes::VD_CODE {
            Some(Typ::VD)
        } else {
            None
        }
    }

    /// Parse either the textual regime or its numeric code
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "VD" => Some(Typ::VD),
            "VH" => Some(Typ::VH),
            other => other.parse::<f64>().ok().and_then(Self::from_code),
        }
    }
}

impl fmt::Display for Typ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column values extracted for a chart axis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Values {
    Numbers(Vec<f64>),
    Labels(Vec<String>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Numbers(v) => v.len(),
            Values::Labels(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pick the values at the given row positions
    pub fn select(&self, rows: &[usize]) -> Values {
        match self {
            Values::Numbers(v) => Values::Numbers(rows.iter().map(|&i| v[i]).collect()),
            Values::Labels(v) => Values::Labels(rows.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

/// Format a number the way labels and color groups show it.
/// Integral values drop the fraction, missing values read `nan`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Compose the display label of a row. Selection state is keyed by this
/// string, so the format must not change.
pub fn bezeichnung(soc: f64, sio: f64, d: f64, typ: Typ) -> String {
    format!(
        "SOC:{}% SiO:{}% D:{}{}",
        format_number(soc),
        format_number(sio),
        format_number(d),
        typ
    )
}

/// Immutable measurement table, normalized once at load time
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    sources: Vec<PathBuf>,
}

impl Dataset {
    /// Load and concatenate one or more CSV or Parquet files
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        profiling::scope!("Dataset::load");

        if paths.is_empty() {
            return Err(ExplorerError::Config("no input files given".to_string()));
        }

        let frames = paths
            .iter()
            .map(|p| scan(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let combined = concat(
            frames,
            UnionArgs {
                to_supertypes: true,
                ..Default::default()
            },
        )?
        .collect()?;

        let sources = paths.iter().map(|p| p.as_ref().to_path_buf()).collect();
        let dataset = Self::from_dataframe(combined, sources)?;
        tracing::info!(
            rows = dataset.height(),
            files = paths.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Validate a raw frame, normalize `Typ` and derive `Bezeichnung`
    pub fn from_dataframe(mut frame: DataFrame, sources: Vec<PathBuf>) -> Result<Self> {
        for name in columns::REQUIRED {
            if frame.column(name).is_err() {
                return Err(ExplorerError::missing_column("dataset schema", name));
            }
        }
        if frame.height() == 0 {
            return Err(ExplorerError::EmptyDataset);
        }

        let typ = normalize_typ(&frame)?;
        let soc = column_as_f64(&frame, columns::SOC)?;
        let sio = column_as_f64(&frame, columns::SIO)?;
        let run = column_as_f64(&frame, columns::D)?;

        let labels: Vec<String> = (0..frame.height())
            .map(|i| bezeichnung(soc[i], sio[i], run[i], typ[i]))
            .collect();
        let typ_names: Vec<&str> = typ.iter().map(|t| t.as_str()).collect();

        frame.with_column(Series::new(columns::TYP.into(), typ_names))?;
        frame.with_column(Series::new(columns::BEZEICHNUNG.into(), labels))?;

        tracing::debug!(
            rows = frame.height(),
            columns = frame.width(),
            "dataset normalized"
        );
        Ok(Self { frame, sources })
    }

    /// Get a reference to the normalized frame
    pub fn dataframe(&self) -> &DataFrame {
        &self.frame
    }

    /// Files the table was read from (empty for in-memory frames)
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    pub fn column_as_f64(&self, name: &str) -> Result<Vec<f64>> {
        column_as_f64(&self.frame, name)
    }

    pub fn column_as_string(&self, name: &str) -> Result<Vec<String>> {
        column_as_string(&self.frame, name)
    }
}

fn scan(path: &Path) -> Result<LazyFrame> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ExplorerError::UnsupportedFormat {
            extension: String::new(),
        })?;

    match extension.to_lowercase().as_str() {
        "parquet" => Ok(LazyFrame::scan_parquet(path, Default::default())?),
        "csv" => Ok(LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .with_try_parse_dates(true)
            .finish()?),
        ext => Err(ExplorerError::UnsupportedFormat {
            extension: ext.to_string(),
        }),
    }
}

fn normalize_typ(frame: &DataFrame) -> Result<Vec<Typ>> {
    let series = column_series(frame, columns::TYP)?;

    let raw: Vec<Option<Typ>> = if matches!(series.dtype(), DataType::String) {
        series
            .str()?
            .into_iter()
            .map(|opt| opt.and_then(Typ::parse))
            .collect()
    } else {
        column_as_f64(frame, columns::TYP)?
            .into_iter()
            .map(Typ::from_code)
            .collect()
    };

    raw.into_iter()
        .enumerate()
        .map(|(row, typ)| {
            typ.ok_or_else(|| {
                ExplorerError::Validation(format!("row {}: unknown Typ code", row))
            })
        })
        .collect()
}

/// Get a column of any frame as a Series
pub fn column_series(frame: &DataFrame, name: &str) -> Result<Series> {
    frame
        .column(name)
        .map(|c| c.as_materialized_series().clone())
        .map_err(|_| ExplorerError::missing_column("column lookup", name))
}

/// Get a column's numeric values as Vec<f64>.
/// Non-numeric values and nulls become NaN, datetimes become seconds since epoch.
pub fn column_as_f64(frame: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = column_series(frame, name)?;

    match series.dtype() {
        DataType::Datetime(unit, _) => {
            let scale = match unit {
                TimeUnit::Nanoseconds => 1e9,
                TimeUnit::Microseconds => 1e6,
                TimeUnit::Milliseconds => 1e3,
            };
            let physical = series.cast(&DataType::Int64)?;
            Ok(physical
                .i64()?
                .into_iter()
                .map(|opt| opt.map(|ts| ts as f64 / scale).unwrap_or(f64::NAN))
                .collect())
        }
        DataType::Date => {
            let physical = series.cast(&DataType::Int32)?;
            Ok(physical
                .i32()?
                .into_iter()
                .map(|opt| opt.map(|days| days as f64 * 86400.0).unwrap_or(f64::NAN))
                .collect())
        }
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|opt| opt.and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(f64::NAN))
            .collect()),
        _ => {
            let cast = series.cast(&DataType::Float64)?;
            Ok(cast
                .f64()?
                .into_iter()
                .map(|opt| opt.unwrap_or(f64::NAN))
                .collect())
        }
    }
}

/// Get a column's values as display strings
pub fn column_as_string(frame: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = column_series(frame, name)?;

    match series.dtype() {
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|opt| opt.unwrap_or("").to_string())
            .collect()),
        DataType::Boolean => Ok(series
            .bool()?
            .into_iter()
            .map(|opt| opt.map(|v| v.to_string()).unwrap_or_default())
            .collect()),
        _ => Ok(column_as_f64(frame, name)?
            .into_iter()
            .map(format_number)
            .collect()),
    }
}

/// Get a column as chart axis values, keeping text columns categorical
pub fn column_values(frame: &DataFrame, name: &str) -> Result<Values> {
    let series = column_series(frame, name)?;
    match series.dtype() {
        DataType::String | DataType::Boolean => Ok(Values::Labels(column_as_string(frame, name)?)),
        _ => Ok(Values::Numbers(column_as_f64(frame, name)?)),
    }
}
