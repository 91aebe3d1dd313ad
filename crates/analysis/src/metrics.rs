//! Summary statistics of prediction quality.

use std::fmt;

use crate::aggregate::TargetSeries;

/// Agreement between truth and predictions for one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub count: usize,

    /// Mean of `prediction - truth`.
    pub bias: f64,

    /// Mean absolute error.
    pub mae: f64,

    /// Root mean squared error.
    pub rmse: f64,

    /// Coefficient of determination; `NaN` when truth has no variance.
    pub r2: f64,
}

impl Metrics {
    /// Computes metrics over a series, or `None` if it is empty.
    #[must_use]
    pub fn of(series: &TargetSeries) -> Option<Self> {
        let truth = series.truth();
        let residual = series.prediction() - truth;

        let bias = residual.mean()?;
        let mae = residual.mapv(f64::abs).mean()?;
        let mse = residual.mapv(|r| r * r).mean()?;

        let truth_mean = truth.mean()?;
        let variance = truth.mapv(|t| (t - truth_mean).powi(2)).mean()?;
        let r2 = if variance > 0.0 {
            1.0 - mse / variance
        } else {
            f64::NAN
        };

        Some(Self {
            count: series.len(),
            bias,
            mae,
            rmse: mse.sqrt(),
            r2,
        })
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n = {}, bias = {:.4}, mae = {:.4}, rmse = {:.4}, r2 = {:.4}",
            self.count, self.bias, self.mae, self.rmse, self.r2
        )
    }
}
