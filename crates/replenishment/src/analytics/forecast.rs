//! Short-horizon demand forecast: least-squares trend line over daily units.
//!
//! Deliberately simple; this is a directional signal for the dashboard, not a
//! demand model.

use std::collections::{BTreeMap, HashSet};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use retailpulse_core::{AnalyticsError, ProductId};

use crate::record::{Product, SalesRow};
use crate::stats::mean;

pub const DEFAULT_HORIZON_DAYS: u32 = 7;

/// Units and revenue sold on one day.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub units: f64,
    pub revenue: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub units: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandForecast {
    pub slope: f64,
    pub intercept: f64,
    pub predicted: Vec<ForecastPoint>,
    pub projected_revenue: f64,
}

/// Daily totals for every product in `category`, ordered by date.
///
/// Only days with at least one sale appear (no zero-filling).
pub fn category_daily_series(sales: &[SalesRow], catalog: &[Product], category: &str) -> Vec<DailyPoint> {
    let members: HashSet<ProductId> = catalog
        .iter()
        .filter(|p| p.category == category)
        .map(|p| p.product_id)
        .collect();

    let mut by_day: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for row in sales.iter().filter(|r| members.contains(&r.product_id)) {
        let entry = by_day.entry(row.date).or_insert((0.0, 0.0));
        entry.0 += row.units_sold as f64;
        entry.1 += row.sales_amount;
    }

    by_day
        .into_iter()
        .map(|(date, (units, revenue))| DailyPoint { date, units, revenue })
        .collect()
}

/// Fit `units = intercept + slope × day` (day 0 = first point) and project
/// `horizon_days` days past the last point.
///
/// Predictions are clamped at zero and truncated to whole units; projected
/// revenue prices them at the series' average unit price.
pub fn forecast_demand(points: &[DailyPoint], horizon_days: u32) -> Result<DemandForecast, AnalyticsError> {
    if points.len() < 2 {
        return Err(AnalyticsError::InsufficientData {
            needed: 2,
            found: points.len(),
        });
    }

    let Some(first) = points.iter().map(|p| p.date).min() else {
        return Err(AnalyticsError::InsufficientData { needed: 2, found: 0 });
    };
    let Some(last) = points.iter().map(|p| p.date).max() else {
        return Err(AnalyticsError::InsufficientData { needed: 2, found: 0 });
    };

    let xs: Vec<f64> = points.iter().map(|p| (p.date - first).num_days() as f64).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.units).collect();
    let (slope, intercept) = least_squares(&xs, &ys);

    let last_day = (last - first).num_days();
    let predicted: Vec<ForecastPoint> = (1..=u64::from(horizon_days))
        .filter_map(|ahead| {
            let date = last.checked_add_days(Days::new(ahead))?;
            let x = (last_day + ahead as i64) as f64;
            let units = (intercept + slope * x).max(0.0);
            Some(ForecastPoint {
                date,
                units: units as i64,
            })
        })
        .collect();

    let total_units: f64 = ys.iter().sum();
    let total_revenue: f64 = points.iter().map(|p| p.revenue).sum();
    let avg_price = if total_units != 0.0 {
        total_revenue / total_units
    } else {
        0.0
    };
    let projected_revenue = predicted.iter().map(|p| p.units as f64).sum::<f64>() * avg_price;

    Ok(DemandForecast {
        slope,
        intercept,
        predicted,
        projected_revenue,
    })
}

/// Ordinary least squares; a flat line through the mean when x has no spread.
fn least_squares(xs: &[f64], ys: &[f64]) -> (f64, f64) {
    let mx = mean(xs);
    let my = mean(ys);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        sxy += (x - mx) * (y - my);
        sxx += (x - mx) * (x - mx);
    }

    if sxx <= f64::EPSILON {
        return (0.0, my);
    }
    let slope = sxy / sxx;
    (slope, my - slope * mx)
}
