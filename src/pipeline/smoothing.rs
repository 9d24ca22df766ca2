//! Savitzky-Golay smoothing across the VD/VH transition
//!
//! The early VD segment (up to the transition time) and the late VH segment
//! (after it) are joined into one composite series, which is smoothed with
//! a fixed-window local polynomial fit. Edge samples are evaluated from the
//! fit of the first/last full window, so the output has one value per input.

use serde::Serialize;
use thiserror::Error;

use crate::constants::numeric::SINGULARITY_TOLERANCE;
use crate::constants::smoothing::{ORDER, WINDOW};
use crate::data::Typ;

/// Why no smoothed series could be produced
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SmoothingUnavailable {
    #[error("smoothing needs at least {required} samples, got {actual}")]
    TooFewSamples { required: usize, actual: usize },

    #[error("window {window} cannot carry a polynomial of order {order}")]
    InvalidWindow { window: usize, order: usize },

    #[error("least-squares fit is singular for window {window}, order {order}")]
    Singular { window: usize, order: usize },
}

/// Samples of one regime, in time order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub time: Vec<f64>,
    pub values: Vec<f64>,
}

impl Segment {
    fn from_pairs(mut pairs: Vec<(f64, f64)>) -> Self {
        // stable: equal time stamps keep their row order
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (time, values) = pairs.into_iter().unzip();
        Segment { time, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Early and late segments joined at the transition time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composite {
    pub early: Segment,
    pub late: Segment,
}

impl Composite {
    pub fn len(&self) -> usize {
        self.early.len() + self.late.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Early then late time stamps
    pub fn time(&self) -> Vec<f64> {
        self.early.time.iter().chain(&self.late.time).copied().collect()
    }

    /// Early then late values
    pub fn values(&self) -> Vec<f64> {
        self.early
            .values
            .iter()
            .chain(&self.late.values)
            .copied()
            .collect()
    }
}

/// Partition rows into VD samples at or before `transition` and VH samples
/// after it. Rows with a non-finite time or value are skipped.
pub fn stitch(time: &[f64], typ: &[Typ], values: &[f64], transition: f64) -> Composite {
    let mut early = Vec::new();
    let mut late = Vec::new();

    for ((&t, &kind), &v) in time.iter().zip(typ).zip(values) {
        if !t.is_finite() || !v.is_finite() {
            continue;
        }
        match kind {
            Typ::VD if t <= transition => early.push((t, v)),
            Typ::VH if t > transition => late.push((t, v)),
            _ => {}
        }
    }

    Composite {
        early: Segment::from_pairs(early),
        late: Segment::from_pairs(late),
    }
}

/// Fixed-window polynomial smoothing filter
#[derive(Debug, Clone)]
pub struct SavitzkyGolay {
    window: usize,
    order: usize,
    /// `weights[k][m]`: contribution of window sample `m` to the fit
    /// evaluated at window position `k`
    weights: Vec<Vec<f64>>,
}

impl SavitzkyGolay {
    pub fn new(window: usize, order: usize) -> Result<Self, SmoothingUnavailable> {
        if window % 2 == 0 || order >= window {
            return Err(SmoothingUnavailable::InvalidWindow { window, order });
        }

        let half = (window / 2) as f64;
        // abscissa normalized to [-1, 1] keeps the normal equations well conditioned
        let abscissa: Vec<f64> = (0..window).map(|i| (i as f64 - half) / half.max(1.0)).collect();
        let size = order + 1;

        let mut gram = vec![vec![0.0; size]; size];
        for i in 0..size {
            for j in 0..size {
                gram[i][j] = abscissa.iter().map(|t| t.powi((i + j) as i32)).sum();
            }
        }

        let mut weights = Vec::with_capacity(window);
        for &t_k in &abscissa {
            let basis: Vec<f64> = (0..size).map(|j| t_k.powi(j as i32)).collect();
            let z = solve(gram.clone(), basis)
                .ok_or(SmoothingUnavailable::Singular { window, order })?;
            let row: Vec<f64> = abscissa
                .iter()
                .map(|t_m| z.iter().enumerate().map(|(j, c)| c * t_m.powi(j as i32)).sum())
                .collect();
            weights.push(row);
        }

        Ok(Self {
            window,
            order,
            weights,
        })
    }

    /// Filter with the standard window and order
    pub fn standard() -> Result<Self, SmoothingUnavailable> {
        Self::new(WINDOW, ORDER)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Smooth a series; the output has the same length as the input
    pub fn smooth(&self, values: &[f64]) -> Result<Vec<f64>, SmoothingUnavailable> {
        profiling::scope!("SavitzkyGolay::smooth");

        let n = values.len();
        if n < self.window {
            return Err(SmoothingUnavailable::TooFewSamples {
                required: self.window,
                actual: n,
            });
        }

        let half = self.window / 2;
        let last_start = n - self.window;

        Ok((0..n)
            .map(|i| {
                let (start, k) = if i < half {
                    (0, i)
                } else if i > last_start + half {
                    (last_start, i - last_start)
                } else {
                    (i - half, half)
                };
                self.weights[k]
                    .iter()
                    .zip(&values[start..start + self.window])
                    .map(|(w, v)| w * v)
                    .sum::<f64>()
            })
            .collect())
    }
}

/// Solve a dense linear system by Gaussian elimination with partial pivoting
fn solve(mut matrix: Vec<Vec<f64>>, mut vector: Vec<f64>) -> Option<Vec<f64>> {
    let size = vector.len();

    for i in 0..size {
        let mut max_row = i;
        for k in (i + 1)..size {
            if matrix[k][i].abs() > matrix[max_row][i].abs() {
                max_row = k;
            }
        }
        matrix.swap(i, max_row);
        vector.swap(i, max_row);

        if matrix[i][i].abs() < SINGULARITY_TOLERANCE {
            return None;
        }

        for k in (i + 1)..size {
            let factor = matrix[k][i] / matrix[i][i];
            for j in i..size {
                matrix[k][j] -= factor * matrix[i][j];
            }
            vector[k] -= factor * vector[i];
        }
    }

    // Back substitution
    let mut solution = vec![0.0; size];
    for i in (0..size).rev() {
        solution[i] = vector[i];
        for j in (i + 1)..size {
            solution[i] -= matrix[i][j] * solution[j];
        }
        solution[i] /= matrix[i][i];
    }
    Some(solution)
}
