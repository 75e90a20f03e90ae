//! Demand statistics over one dense daily series.

use serde::{Deserialize, Serialize};

/// Mean and volatility of daily demand for a pair.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandStats {
    pub avg_daily_sales: f64,
    /// Sample standard deviation (n-1); 0 for degenerate series.
    pub std_dev_demand: f64,
}

impl DemandStats {
    pub fn from_daily(daily: &[i64]) -> Self {
        let xs: Vec<f64> = daily.iter().map(|u| *u as f64).collect();
        let avg = mean(&xs);
        Self {
            avg_daily_sales: finite_or_zero(avg),
            std_dev_demand: finite_or_zero(stddev_sample(&xs, avg)),
        }
    }
}

pub(crate) fn mean(xs: &[f64]) -> f64 {
    match xs.len() {
        0 => 0.0,
        n => xs.iter().sum::<f64>() / n as f64,
    }
}

/// Bessel-corrected standard deviation around a precomputed mean.
pub(crate) fn stddev_sample(xs: &[f64], mean: f64) -> f64 {
    let Some(dof) = xs.len().checked_sub(1).filter(|&d| d > 0) else {
        return 0.0;
    };
    let squared_deviations: f64 = xs.iter().map(|x| (x - mean).powi(2)).sum();
    // Constant series can round to a tiny negative variance.
    (squared_deviations / dof as f64).max(0.0).sqrt()
}

/// Non-finite values never reach a metric record.
pub(crate) fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}
