use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use retailpulse_core::{ProductId, StoreId};

use crate::record::{MetricRecord, Product};

/// Carrying cost of stock on hand for one pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiabilityLine {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub current_inventory: i64,
    pub unit_cost: f64,
    pub liability: f64,
}

/// Unit costs taken from the product dimension; products without a cost are
/// left out.
pub fn unit_costs_from_catalog(catalog: &[Product]) -> HashMap<ProductId, f64> {
    catalog
        .iter()
        .filter_map(|p| p.unit_cost.map(|cost| (p.product_id, cost)))
        .collect()
}

/// `current_inventory × unit_cost` for every record holding stock.
///
/// Costs are supplied by the caller; records whose product has no cost are
/// skipped rather than guessed.
pub fn assess_liability(records: &[MetricRecord], unit_costs: &HashMap<ProductId, f64>) -> Vec<LiabilityLine> {
    records
        .iter()
        .filter(|r| r.current_inventory > 0)
        .filter_map(|r| {
            let unit_cost = *unit_costs.get(&r.product_id)?;
            Some(LiabilityLine {
                store_id: r.store_id,
                product_id: r.product_id,
                product_name: r.product_name.clone(),
                current_inventory: r.current_inventory,
                unit_cost,
                liability: r.current_inventory as f64 * unit_cost,
            })
        })
        .collect()
}

pub fn total_liability(lines: &[LiabilityLine]) -> f64 {
    lines.iter().map(|l| l.liability).sum()
}
