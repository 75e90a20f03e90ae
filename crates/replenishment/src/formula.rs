//! Safety stock / reorder point under a normal service-level assumption.

use serde::{Deserialize, Serialize};

use crate::stats::finite_or_zero;

/// Replenishment thresholds for one pair.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentPoint {
    pub lead_time_demand: f64,
    pub safety_stock: f64,
    pub reorder_point: f64,
}

/// `avg_daily_sales × lead_time`.
pub fn lead_time_demand(avg_daily_sales: f64, lead_time_days: f64) -> f64 {
    finite_or_zero(avg_daily_sales * lead_time_days)
}

/// `max(0, z × σ × √lead_time)`.
///
/// Negative or non-finite inputs clamp to 0 rather than propagating.
pub fn safety_stock(std_dev_demand: f64, lead_time_days: f64, z_score: f64) -> f64 {
    let raw = z_score * std_dev_demand * lead_time_days.sqrt();
    if raw.is_finite() && raw > 0.0 { raw } else { 0.0 }
}

pub fn replenishment_point(
    avg_daily_sales: f64,
    std_dev_demand: f64,
    lead_time_days: f64,
    z_score: f64,
) -> ReplenishmentPoint {
    let lead_time_demand = lead_time_demand(avg_daily_sales, lead_time_days);
    let safety_stock = safety_stock(std_dev_demand, lead_time_days, z_score);
    ReplenishmentPoint {
        lead_time_demand,
        safety_stock,
        reorder_point: lead_time_demand + safety_stock,
    }
}

/// Current inventory in weeks of average demand; unbounded without demand.
pub fn weeks_of_supply(current_inventory: i64, avg_daily_sales: f64) -> f64 {
    if avg_daily_sales > 0.0 {
        current_inventory as f64 / (avg_daily_sales * 7.0)
    } else {
        f64::INFINITY
    }
}
