//! Row-selection masks
//!
//! Every constraint is a polars `Expr`; the final mask is their conjunction.
//! Set membership is a single `is_in` per column, so the expression depth
//! does not grow with the number of selected values.
//! Per-column value constraints are folded with `and`, never overwritten.

use polars::prelude::*;

use crate::constants::columns;
use crate::error::Result;
use crate::state::{FilterSelection, RunRange, ValueRange};

const MASK_COLUMN: &str = "__row_mask";

/// Boolean row selection over a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMask {
    bits: Vec<bool>,
}

impl RowMask {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of selected rows
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    pub fn is_selected(&self, row: usize) -> bool {
        self.bits.get(row).copied().unwrap_or(false)
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Intersect with another mask of the same length
    pub fn and(&self, other: &RowMask) -> RowMask {
        RowMask {
            bits: self
                .bits
                .iter()
                .zip(&other.bits)
                .map(|(a, b)| *a && *b)
                .collect(),
        }
    }
}

/// Membership of a numeric column in a value set; an empty set matches nothing
fn numeric_membership(column: &str, values: &[f64]) -> Expr {
    let set = Series::new(column.into(), values);
    col(column).cast(DataType::Float64).is_in(lit(set))
}

/// Membership of a text column in a value set; an empty set matches nothing
fn text_membership<'a>(column: &str, values: impl IntoIterator<Item = &'a str>) -> Expr {
    let set = Series::new(column.into(), values.into_iter().collect::<Vec<_>>());
    col(column).is_in(lit(set))
}

/// SOC, SiO and Typ selections only
pub fn categorical_expr(filters: &FilterSelection) -> Expr {
    numeric_membership(columns::SOC, &filters.soc)
        .and(numeric_membership(columns::SIO, &filters.sio))
        .and(text_membership(
            columns::TYP,
            filters.typ.iter().map(|t| t.as_str()),
        ))
}

pub fn label_expr(labels: &[String]) -> Expr {
    text_membership(columns::BEZEICHNUNG, labels.iter().map(String::as_str))
}

pub fn run_expr(runs: &RunRange) -> Expr {
    let run = col(columns::D).cast(DataType::Float64);
    run.clone()
        .gt_eq(lit(runs.low as f64))
        .and(run.lt_eq(lit(runs.high as f64)))
}

/// The value window must hold for every selected column at once.
/// An empty column list leaves the constraint vacuously true.
pub fn value_range_expr(y_columns: &[String], range: &ValueRange) -> Expr {
    y_columns.iter().fold(lit(true), |acc, name| {
        let value = col(name.as_str()).cast(DataType::Float64);
        acc.and(
            value
                .clone()
                .gt_eq(lit(range.low))
                .and(value.lt_eq(lit(range.high))),
        )
    })
}

/// Full row constraint: categories, labels, runs and the value window
pub fn row_expr(filters: &FilterSelection, labels: &[String], y_columns: &[String]) -> Expr {
    categorical_expr(filters)
        .and(label_expr(labels))
        .and(run_expr(&filters.runs))
        .and(value_range_expr(y_columns, &filters.values))
}

/// Evaluate a constraint into a mask; null comparisons count as unselected
pub fn evaluate(frame: &DataFrame, expr: Expr) -> Result<RowMask> {
    profiling::scope!("mask::evaluate");

    let out = frame
        .clone()
        .lazy()
        .with_column(expr.alias(MASK_COLUMN))
        .select([col(MASK_COLUMN)])
        .collect()?;

    let bits = out
        .column(MASK_COLUMN)?
        .as_materialized_series()
        .bool()?
        .into_iter()
        .map(|v| v.unwrap_or(false))
        .collect();

    Ok(RowMask { bits })
}

/// Materialize the selected rows as a new frame
pub fn apply(frame: &DataFrame, mask: &RowMask) -> Result<DataFrame> {
    let chunked = BooleanChunked::from_slice(MASK_COLUMN.into(), mask.bits());
    Ok(frame.filter(&chunked)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{fixtures, Typ};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn subset<T: Clone>(rng: &mut StdRng, items: &[T]) -> Vec<T> {
        items
            .iter()
            .filter(|_| rng.gen_bool(0.6))
            .cloned()
            .collect()
    }

    fn random_selection(rng: &mut StdRng, labels: &[String]) -> (FilterSelection, Vec<String>) {
        let low = rng.gen_range(1..=5);
        let high = rng.gen_range(low..=5);
        let a = rng.gen_range(-30.0..30.0);
        let b = rng.gen_range(-30.0..30.0);
        let sel = FilterSelection {
            soc: subset(rng, &[10.0, 30.0, 50.0, 70.0, 90.0]),
            sio: subset(rng, &[0.0, 10.0, 15.0]),
            typ: subset(rng, &[Typ::VD, Typ::VH]),
            labels: subset(rng, labels),
            runs: RunRange { low, high },
            values: ValueRange::new(f64::min(a, b), f64::max(a, b)),
        };
        let mut y_columns = subset(rng, &["Current".to_string(), "Voltage".to_string()]);
        y_columns.shuffle(rng);
        (sel, y_columns)
    }

    #[test]
    fn test_mask_is_conjunction_of_all_constraints() {
        let ds = fixtures::sample_dataset();
        let frame = ds.dataframe();
        let soc = ds.column_as_f64("SOC").unwrap();
        let sio = ds.column_as_f64("SiO").unwrap();
        let run = ds.column_as_f64("D").unwrap();
        let typ: Vec<Typ> = ds
            .column_as_string("Typ")
            .unwrap()
            .iter()
            .map(|t| Typ::parse(t).unwrap())
            .collect();
        let labels = ds.column_as_string("Bezeichnung").unwrap();
        let mut distinct = labels.clone();
        distinct.sort();
        distinct.dedup();

        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..64 {
            let (sel, y_columns) = random_selection(&mut rng, &distinct);
            let mask = evaluate(frame, row_expr(&sel, &sel.labels, &y_columns)).unwrap();
            assert_eq!(mask.len(), ds.height());

            let y_values: Vec<Vec<f64>> = y_columns
                .iter()
                .map(|c| ds.column_as_f64(c).unwrap())
                .collect();

            for row in 0..ds.height() {
                let expected = sel.matches_categories(soc[row], sio[row], typ[row])
                    && sel.labels.contains(&labels[row])
                    && sel.runs.contains(run[row])
                    && y_values.iter().all(|col| sel.values.contains(col[row]));
                assert_eq!(mask.is_selected(row), expected, "row {} with {:?}", row, sel);
            }
        }
    }

    #[test]
    fn test_value_range_holds_for_every_column() {
        let ds = fixtures::sample_dataset();
        let mut sel = FilterSelection {
            soc: vec![10.0, 50.0, 90.0],
            sio: vec![0.0, 15.0],
            typ: vec![Typ::VD, Typ::VH],
            ..Default::default()
        };
        sel.labels = ds.column_as_string("Bezeichnung").unwrap();
        // Voltage sits between 3 and 4, Current spans both signs
        sel.set_value_range(0.0, 5.0);

        let voltage_only = vec!["Voltage".to_string()];
        let both = vec!["Voltage".to_string(), "Current".to_string()];
        let m_voltage = evaluate(ds.dataframe(), row_expr(&sel, &sel.labels, &voltage_only)).unwrap();
        let m_both = evaluate(ds.dataframe(), row_expr(&sel, &sel.labels, &both)).unwrap();

        assert_eq!(m_voltage.count(), ds.height());
        assert!(m_both.count() < m_voltage.count());
        assert_eq!(m_both, m_both.and(&m_voltage));

        let current = ds.column_as_f64("Current").unwrap();
        for row in 0..ds.height() {
            if m_both.is_selected(row) {
                assert!((0.0..=5.0).contains(&current[row]));
            }
        }
    }

    #[test]
    fn test_empty_category_selects_nothing() {
        let ds = fixtures::sample_dataset();
        let mut sel = FilterSelection::new();
        sel.labels = ds.column_as_string("Bezeichnung").unwrap();
        sel.typ.clear();

        let mask = evaluate(ds.dataframe(), row_expr(&sel, &sel.labels, &[])).unwrap();
        assert_eq!(mask.len(), ds.height());
        assert_eq!(mask.count(), 0);

        let view = apply(ds.dataframe(), &mask).unwrap();
        assert_eq!(view.height(), 0);
    }

    #[test]
    fn test_empty_y_columns_are_unconstrained() {
        let ds = fixtures::two_row_dataset();
        let mut sel = FilterSelection::new();
        sel.labels = ds.column_as_string("Bezeichnung").unwrap();
        sel.set_value_range(100.0, 200.0);

        let mask = evaluate(ds.dataframe(), row_expr(&sel, &sel.labels, &[])).unwrap();
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_full_label_grid_stays_flat() {
        let ds = fixtures::full_grid_dataset();
        let mut labels = ds.column_as_string("Bezeichnung").unwrap();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 150);

        let sel = FilterSelection {
            soc: vec![10.0, 30.0, 50.0, 70.0, 90.0],
            sio: vec![0.0, 10.0, 15.0],
            typ: vec![Typ::VH, Typ::VD],
            labels: labels.clone(),
            ..Default::default()
        };
        let mask = evaluate(ds.dataframe(), row_expr(&sel, &labels, &[])).unwrap();
        assert_eq!(mask.count(), ds.height());

        // dropping one label removes exactly that label's rows
        let fewer = &labels[1..];
        let mask = evaluate(ds.dataframe(), row_expr(&sel, fewer, &[])).unwrap();
        let all = ds.column_as_string("Bezeichnung").unwrap();
        let excluded = all.iter().filter(|l| **l == labels[0]).count();
        assert_eq!(mask.count(), ds.height() - excluded);
    }
}
