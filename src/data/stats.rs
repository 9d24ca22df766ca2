use polars::prelude::*;

use super::source::{column_as_f64, column_series};
use crate::error::Result;

const VALUE: &str = "value";

/// Smallest and largest finite value of one or more columns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    pub fn merge(self, other: Extent) -> Extent {
        Extent {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Column as Float64; temporal and text columns go through the same
/// conversion the chart axes use
fn float_series(frame: &DataFrame, name: &str) -> Result<Series> {
    let series = column_series(frame, name)?;
    let values = match series.dtype() {
        DataType::Datetime(..) | DataType::Date | DataType::String => {
            Series::new(VALUE.into(), column_as_f64(frame, name)?)
        }
        _ => series.cast(&DataType::Float64)?.with_name(VALUE.into()),
    };
    Ok(values)
}

/// Extent of a single column; nulls, NaN and infinities are ignored
pub fn column_extent(frame: &DataFrame, name: &str) -> Result<Option<Extent>> {
    let values = float_series(frame, name)?;
    let out = DataFrame::new(vec![values.into()])?
        .lazy()
        .filter(col(VALUE).is_finite())
        .select([
            col(VALUE).min().alias("min"),
            col(VALUE).max().alias("max"),
        ])
        .collect()?;

    let min = out.column("min")?.as_materialized_series().f64()?.get(0);
    let max = out.column("max")?.as_materialized_series().f64()?.get(0);
    Ok(min.zip(max).map(|(min, max)| Extent { min, max }))
}

/// Joint extent over several columns
pub fn columns_extent(frame: &DataFrame, names: &[String]) -> Result<Option<Extent>> {
    let mut joint: Option<Extent> = None;
    for name in names {
        if let Some(e) = column_extent(frame, name)? {
            joint = Some(match joint {
                Some(j) => j.merge(e),
                None => e,
            });
        }
    }
    Ok(joint)
}
