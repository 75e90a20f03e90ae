use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use retailpulse_core::{PairKey, ProductId, StoreId};

/// One sales row as delivered by the data source.
///
/// May be a single transaction or a per-day pre-aggregate; the panel builder
/// re-aggregates either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRow {
    pub date: NaiveDate,
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub units_sold: i64,
    pub sales_amount: f64,
}

impl SalesRow {
    pub fn new(date: NaiveDate, store_id: StoreId, product_id: ProductId, units_sold: i64) -> Self {
        Self {
            date,
            store_id,
            product_id,
            units_sold,
            sales_amount: 0.0,
        }
    }

    pub fn with_sales_amount(mut self, sales_amount: f64) -> Self {
        self.sales_amount = sales_amount;
        self
    }

    pub fn key(&self) -> PairKey {
        PairKey::new(self.store_id, self.product_id)
    }
}

/// One inventory snapshot row (`fact_inventory`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub snapshot_date: NaiveDate,
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub units_on_hand: i64,
}

impl InventoryRow {
    pub fn key(&self) -> PairKey {
        PairKey::new(self.store_id, self.product_id)
    }
}

/// Display-name lookup row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductName {
    pub product_id: ProductId,
    pub product_name: String,
}

/// Product dimension row (`dim_product`), lookup only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub product_name: String,
    pub category: String,
    pub unit_cost: Option<f64>,
}

impl Product {
    pub fn name(&self) -> ProductName {
        ProductName {
            product_id: self.product_id,
            product_name: self.product_name.clone(),
        }
    }
}

/// One cell of the dense demand panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub date: NaiveDate,
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub daily_units_sold: i64,
}

/// Replenishment signals for one observed store/product pair.
///
/// Every numeric field is finite except `weeks_of_supply`, which is
/// `f64::INFINITY` when there is no average demand. In JSON that value is
/// written as `null` and read back as infinity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub avg_daily_sales: f64,
    pub std_dev_demand: f64,
    pub lead_time_demand: f64,
    pub safety_stock: f64,
    pub reorder_point: f64,
    pub current_inventory: i64,
    #[serde(with = "unbounded_weeks")]
    pub weeks_of_supply: f64,
    pub flagged_for_reorder: bool,
    pub product_name: Option<String>,
}

impl MetricRecord {
    pub fn key(&self) -> PairKey {
        PairKey::new(self.store_id, self.product_id)
    }
}

/// `null` <-> unbounded weeks of supply.
mod unbounded_weeks {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(weeks: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if weeks.is_finite() {
            serializer.serialize_f64(*weeks)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
