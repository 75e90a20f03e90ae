//! Promotion what-if: discount the average price, lift the volume.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use retailpulse_core::AnalyticsError;

use crate::panel::DemandWindow;
use crate::record::SalesRow;
use crate::source::DemandDataSource;

/// Revenue and unit volume over a trailing window.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueBaseline {
    pub revenue: f64,
    pub volume: i64,
}

impl RevenueBaseline {
    pub fn from_sales<'a>(window: DemandWindow, rows: impl IntoIterator<Item = &'a SalesRow>) -> Self {
        rows.into_iter()
            .filter(|row| window.contains(row.date))
            .fold(Self::default(), |acc, row| Self {
                revenue: acc.revenue + row.sales_amount,
                volume: acc.volume + row.units_sold,
            })
    }

    pub fn load<S>(source: &S, window_days: u32, as_of: NaiveDate) -> Result<Self, AnalyticsError>
    where
        S: DemandDataSource + ?Sized,
    {
        let rows = source.read_sales_in_window(window_days, as_of)?;
        Ok(Self::from_sales(DemandWindow::ending_at(as_of, window_days), &rows))
    }

    /// Revenue per unit; 0 without volume.
    pub fn avg_price(&self) -> f64 {
        if self.volume > 0 {
            self.revenue / self.volume as f64
        } else {
            0.0
        }
    }
}

/// Promotion parameters, in percent.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionScenario {
    pub discount_pct: f64,
    pub uplift_pct: f64,
}

impl Default for PromotionScenario {
    fn default() -> Self {
        Self {
            discount_pct: 10.0,
            uplift_pct: 20.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProjection {
    pub current_revenue: f64,
    pub projected_revenue: f64,
    pub net_impact: f64,
}

impl PromotionScenario {
    pub fn new(discount_pct: f64, uplift_pct: f64) -> Self {
        Self {
            discount_pct,
            uplift_pct,
        }
    }

    pub fn project(&self, baseline: &RevenueBaseline) -> Result<ScenarioProjection, AnalyticsError> {
        if !(self.discount_pct.is_finite() && (0.0..=100.0).contains(&self.discount_pct)) {
            return Err(AnalyticsError::invalid_input(format!(
                "discount_pct must be within [0, 100], got {}",
                self.discount_pct
            )));
        }
        if !(self.uplift_pct.is_finite() && self.uplift_pct >= 0.0) {
            return Err(AnalyticsError::invalid_input(format!(
                "uplift_pct must be a non-negative number, got {}",
                self.uplift_pct
            )));
        }

        let price = baseline.avg_price() * (1.0 - self.discount_pct / 100.0);
        let volume = baseline.volume as f64 * (1.0 + self.uplift_pct / 100.0);
        let projected_revenue = price * volume;

        Ok(ScenarioProjection {
            current_revenue: baseline.revenue,
            projected_revenue,
            net_impact: projected_revenue - baseline.revenue,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retailpulse_core::{ProductId, StoreId};

    use crate::source::InMemoryDataSource;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn row(day: u32, units: i64, amount: f64) -> SalesRow {
        SalesRow::new(
            NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            StoreId::new(1),
            ProductId::new(1),
            units,
        )
        .with_sales_amount(amount)
    }

    #[test]
    fn baseline_sums_window_rows_only() {
        let rows = vec![row(30, 10, 50.0), row(20, 5, 25.0), row(1, 100, 1000.0)];
        let baseline = RevenueBaseline::from_sales(DemandWindow::ending_at(as_of(), 15), &rows);
        assert_eq!(baseline.volume, 15);
        assert_eq!(baseline.revenue, 75.0);
        assert_eq!(baseline.avg_price(), 5.0);
    }

    #[test]
    fn baseline_loads_through_the_source() {
        let source = InMemoryDataSource::new().with_sales([row(29, 4, 8.0)]);
        let baseline = RevenueBaseline::load(&source, 30, as_of()).unwrap();
        assert_eq!(baseline, RevenueBaseline { revenue: 8.0, volume: 4 });
    }

    #[test]
    fn projection_applies_discount_and_uplift() {
        let baseline = RevenueBaseline {
            revenue: 1000.0,
            volume: 100,
        };
        let projection = PromotionScenario::new(10.0, 20.0).project(&baseline).unwrap();

        // 10.0 * 0.9 * 120
        assert!((projection.projected_revenue - 1080.0).abs() < 1e-9);
        assert!((projection.net_impact - 80.0).abs() < 1e-9);
        assert_eq!(projection.current_revenue, 1000.0);
    }

    #[test]
    fn no_volume_projects_zero_revenue() {
        let projection = PromotionScenario::default()
            .project(&RevenueBaseline::default())
            .unwrap();
        assert_eq!(projection.projected_revenue, 0.0);
        assert_eq!(projection.net_impact, 0.0);
    }

    #[test]
    fn out_of_range_percentages_are_rejected() {
        let baseline = RevenueBaseline::default();
        for scenario in [
            PromotionScenario::new(-1.0, 0.0),
            PromotionScenario::new(101.0, 0.0),
            PromotionScenario::new(10.0, -5.0),
            PromotionScenario::new(f64::NAN, 0.0),
        ] {
            assert!(matches!(
                scenario.project(&baseline),
                Err(AnalyticsError::InvalidInput(_))
            ));
        }
    }
}
