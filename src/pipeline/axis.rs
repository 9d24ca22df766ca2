//! Value-range slider bounds and tick marks

use polars::prelude::DataFrame;
use serde::Serialize;

use crate::constants::axis::{LABEL_DECIMALS, MAX_MARKS, SLIDER_STEP, TICK_STEP};
use crate::data::{format_number, stats, Extent};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickMark {
    pub value: f64,
    pub label: String,
}

/// Slider domain rounded outward to whole tick steps
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisRange {
    pub lower: f64,
    pub upper: f64,
    /// Drag step of the slider handle
    pub step: f64,
    pub marks: Vec<TickMark>,
}

impl AxisRange {
    pub fn from_extent(extent: Extent) -> Self {
        let lower = (extent.min / TICK_STEP).floor() * TICK_STEP;
        let upper = (extent.max / TICK_STEP).ceil() * TICK_STEP;
        Self::with_bounds(lower, upper)
    }

    /// Single-mark range used when no values are available
    pub fn degenerate(at: f64) -> Self {
        Self::with_bounds(at, at)
    }

    fn with_bounds(lower: f64, upper: f64) -> Self {
        // Bounds are whole multiples of the step; the epsilon absorbs
        // representation error in the quotient.
        let steps = ((upper - lower) / TICK_STEP + 1e-9).floor().max(0.0) as usize;
        // Very wide ranges mark every `stride`-th step; the upper bound
        // always gets a mark.
        let stride = steps.div_ceil(MAX_MARKS - 2).max(1);
        let mark = |i: usize| {
            let value = lower + i as f64 * TICK_STEP;
            TickMark {
                value,
                label: tick_label(value),
            }
        };
        let mut marks: Vec<TickMark> = (0..=steps).step_by(stride).map(mark).collect();
        if steps % stride != 0 {
            marks.push(mark(steps));
        }

        Self {
            lower,
            upper,
            step: SLIDER_STEP,
            marks,
        }
    }

    pub fn bounds(&self) -> [f64; 2] {
        [self.lower, self.upper]
    }
}

/// Tick label: value rounded to two decimals
pub fn tick_label(value: f64) -> String {
    let scale = 10f64.powi(LABEL_DECIMALS);
    format_number((value * scale).round() / scale)
}

/// Bounds over the selected columns of `view`, falling back to `fallback`
/// when the view holds no finite values.
pub fn value_axis(view: &DataFrame, fallback: &DataFrame, y_columns: &[String]) -> Result<AxisRange> {
    profiling::scope!("axis::value_axis");

    let extent = match stats::columns_extent(view, y_columns)? {
        Some(e) => Some(e),
        None => stats::columns_extent(fallback, y_columns)?,
    };

    Ok(match extent {
        Some(e) => AxisRange::from_extent(e),
        None => AxisRange::degenerate(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn labels(range: &AxisRange) -> Vec<(f64, &str)> {
        range.marks.iter().map(|m| (m.value, m.label.as_str())).collect()
    }

    #[test]
    fn test_bounds_round_outward() {
        let range = AxisRange::from_extent(Extent { min: -5.0, max: 7.0 });
        assert_eq!(range.bounds(), [-10.0, 10.0]);
        assert_eq!(labels(&range), vec![(-10.0, "-10"), (0.0, "0"), (10.0, "10")]);
    }

    #[test]
    fn test_tick_count_matches_span() {
        let range = AxisRange::from_extent(Extent { min: -123.4, max: 56.7 });
        assert_eq!(range.bounds(), [-130.0, 60.0]);
        assert_eq!(range.marks.len(), 20);
        assert_eq!(range.marks.last().unwrap().value, 60.0);
    }

    #[test]
    fn test_wide_span_thins_marks() {
        let range = AxisRange::from_extent(Extent { min: -1e12, max: 1e12 });
        assert_eq!(range.bounds(), [-1e12, 1e12]);
        assert!(range.marks.len() <= MAX_MARKS);
        assert_eq!(range.marks.first().unwrap().value, -1e12);
        assert_eq!(range.marks.last().unwrap().value, 1e12);
        assert!(range.marks.windows(2).all(|w| w[0].value < w[1].value));

        // exactly at the cap every step still gets a mark
        let range = AxisRange::from_extent(Extent { min: 0.0, max: 990.0 });
        assert_eq!(range.marks.len(), 100);
        assert!(range.marks.windows(2).all(|w| w[1].value - w[0].value == 10.0));
    }

    #[test]
    fn test_degenerate_extent_yields_one_mark() {
        let range = AxisRange::from_extent(Extent { min: 20.0, max: 20.0 });
        assert_eq!(range.bounds(), [20.0, 20.0]);
        assert_eq!(labels(&range), vec![(20.0, "20")]);

        let range = AxisRange::degenerate(0.0);
        assert_eq!(range.marks.len(), 1);
    }

    #[test]
    fn test_tick_label_rounding() {
        assert_eq!(tick_label(12.3456), "12.35");
        assert_eq!(tick_label(-0.0), "0");
    }

    #[test]
    fn test_value_axis_falls_back() {
        let full = df!("Current" => &[-25.0, 31.0]).unwrap();
        let empty = full.head(Some(0));
        let names = vec!["Current".to_string()];

        let range = value_axis(&empty, &full, &names).unwrap();
        assert_eq!(range.bounds(), [-30.0, 40.0]);

        let range = value_axis(&empty, &empty, &names).unwrap();
        assert_eq!(range.bounds(), [0.0, 0.0]);

        let range = value_axis(&full, &full, &[]).unwrap();
        assert_eq!(range.marks.len(), 1);
    }
}
