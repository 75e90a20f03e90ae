//! Inventory metrics engine: sales + inventory -> replenishment signals.
//!
//! Pipeline:
//! - Build the dense demand panel for the trailing window.
//! - Aggregate mean / sample std per observed pair.
//! - Apply the safety-stock formula.
//! - Join the global-latest inventory snapshot and product names.
//! - Derive weeks of supply and the reorder flag.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info};

use retailpulse_core::{DataAccessResult, PairKey, ProductId};

use crate::config::ReplenishmentConfig;
use crate::formula::{replenishment_point, weeks_of_supply};
use crate::inventory::CurrentInventory;
use crate::panel::{DemandPanel, DemandWindow};
use crate::record::MetricRecord;
use crate::source::DemandDataSource;
use crate::stats::DemandStats;

/// Stateless metrics engine; holds configuration only.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct MetricsEngine {
    config: ReplenishmentConfig,
}

impl MetricsEngine {
    pub fn new(config: ReplenishmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReplenishmentConfig {
        &self.config
    }

    /// Compute one metric record per store/product pair that sold in the
    /// window ending at `as_of`.
    ///
    /// An empty window is not an error: the result is simply empty.
    /// Data-access failures are returned as-is.
    pub fn compute<S>(&self, source: &S, as_of: NaiveDate) -> DataAccessResult<Vec<MetricRecord>>
    where
        S: DemandDataSource + ?Sized,
    {
        let window = DemandWindow::ending_at(as_of, self.config.window_days);

        debug!(window_days = window.days(), %as_of, "fetching daily sales");
        let sales = source.read_sales_in_window(window.days(), as_of)?;
        let panel = DemandPanel::build(window, &sales);

        if panel.is_empty() {
            info!(
                window_days = window.days(),
                %as_of,
                "no sales in window; returning empty inventory metrics"
            );
            return Ok(Vec::new());
        }

        debug!(pairs = panel.pair_count(), "fetching current inventory levels");
        let inventory = CurrentInventory::resolve(&source.read_latest_inventory_snapshot()?);

        debug!("fetching product names");
        let names: HashMap<ProductId, String> = source
            .read_product_names()?
            .into_iter()
            .map(|n| (n.product_id, n.product_name))
            .collect();

        let records: Vec<MetricRecord> = panel
            .iter()
            .map(|(key, daily)| {
                let stats = DemandStats::from_daily(daily);
                self.assemble(
                    key,
                    stats,
                    inventory.units_on_hand(&key),
                    names.get(&key.product_id).map(String::as_str),
                )
            })
            .collect();

        info!(
            records = records.len(),
            flagged = records.iter().filter(|r| r.flagged_for_reorder).count(),
            inventory_as_of = ?inventory.as_of(),
            "inventory metrics calculation completed"
        );

        Ok(records)
    }

    fn assemble(
        &self,
        key: PairKey,
        stats: DemandStats,
        current_inventory: i64,
        product_name: Option<&str>,
    ) -> MetricRecord {
        let point = replenishment_point(
            stats.avg_daily_sales,
            stats.std_dev_demand,
            self.config.lead_time_days,
            self.config.z_score,
        );

        MetricRecord {
            store_id: key.store_id,
            product_id: key.product_id,
            avg_daily_sales: stats.avg_daily_sales,
            std_dev_demand: stats.std_dev_demand,
            lead_time_demand: point.lead_time_demand,
            safety_stock: point.safety_stock,
            reorder_point: point.reorder_point,
            current_inventory,
            weeks_of_supply: weeks_of_supply(current_inventory, stats.avg_daily_sales),
            flagged_for_reorder: (current_inventory as f64) < point.reorder_point,
            product_name: product_name.map(str::to_owned),
        }
    }
}

/// Run the engine with default parameters (30-day window, 7-day lead time,
/// z = 1.65).
pub fn calculate_inventory_metrics<S>(source: &S, as_of: NaiveDate) -> DataAccessResult<Vec<MetricRecord>>
where
    S: DemandDataSource + ?Sized,
{
    MetricsEngine::default().compute(source, as_of)
}
