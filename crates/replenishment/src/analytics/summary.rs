use serde::{Deserialize, Serialize};

use crate::analytics::scenario::RevenueBaseline;
use crate::record::MetricRecord;

/// Weeks of supply below which a pair counts as under-stocked.
pub const DEFAULT_LOW_SUPPLY_WEEKS: f64 = 2.0;

/// Headline counts over a set of metric records.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessSummary {
    pub total: usize,
    pub flagged_for_reorder: usize,
    pub low_supply: usize,
    /// Share of records at or above the threshold, in percent; 0 without
    /// records.
    pub readiness_pct: f64,
}

impl ReadinessSummary {
    pub fn from_records(records: &[MetricRecord], low_supply_weeks: f64) -> Self {
        let total = records.len();
        let flagged_for_reorder = records.iter().filter(|r| r.flagged_for_reorder).count();
        let low_supply = low_supply(records, low_supply_weeks).count();

        let readiness_pct = if total == 0 {
            0.0
        } else {
            (total - low_supply) as f64 / total as f64 * 100.0
        };

        Self {
            total,
            flagged_for_reorder,
            low_supply,
            readiness_pct,
        }
    }
}

/// Executive overview: trailing revenue alongside readiness.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub revenue: f64,
    #[serde(flatten)]
    pub readiness: ReadinessSummary,
}

impl Scorecard {
    pub fn new(baseline: &RevenueBaseline, readiness: ReadinessSummary) -> Self {
        Self {
            revenue: baseline.revenue,
            readiness,
        }
    }
}

/// Records whose weeks of supply fall below `weeks`.
pub fn low_supply(records: &[MetricRecord], weeks: f64) -> impl Iterator<Item = &MetricRecord> {
    records.iter().filter(move |r| r.weeks_of_supply < weeks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use retailpulse_core::{ProductId, StoreId};

    fn record(weeks_of_supply: f64, flagged: bool) -> MetricRecord {
        MetricRecord {
            store_id: StoreId::new(1),
            product_id: ProductId::new(1),
            avg_daily_sales: 1.0,
            std_dev_demand: 0.0,
            lead_time_demand: 7.0,
            safety_stock: 0.0,
            reorder_point: 7.0,
            current_inventory: 0,
            weeks_of_supply,
            flagged_for_reorder: flagged,
            product_name: None,
        }
    }

    #[test]
    fn counts_low_supply_and_flags() {
        let records = vec![
            record(0.5, true),
            record(2.0, false),
            record(f64::INFINITY, false),
            record(1.9, false),
        ];
        let summary = ReadinessSummary::from_records(&records, DEFAULT_LOW_SUPPLY_WEEKS);

        assert_eq!(summary.total, 4);
        assert_eq!(summary.flagged_for_reorder, 1);
        assert_eq!(summary.low_supply, 2);
        assert_eq!(summary.readiness_pct, 50.0);
    }

    #[test]
    fn scorecard_flattens_readiness_next_to_revenue() {
        let baseline = RevenueBaseline {
            revenue: 1250.0,
            volume: 50,
        };
        let readiness = ReadinessSummary::from_records(&[record(3.0, false)], DEFAULT_LOW_SUPPLY_WEEKS);
        let json = serde_json::to_value(Scorecard::new(&baseline, readiness)).unwrap();

        assert_eq!(json["revenue"], 1250.0);
        assert_eq!(json["total"], 1);
        assert_eq!(json["readiness_pct"], 100.0);
    }

    #[test]
    fn no_records_scores_zero_readiness() {
        let summary = ReadinessSummary::from_records(&[], DEFAULT_LOW_SUPPLY_WEEKS);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.low_supply, 0);
        assert_eq!(summary.readiness_pct, 0.0);
    }
}
