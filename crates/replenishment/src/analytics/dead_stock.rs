//! Dead-stock alert: pairs that recorded sales rows in a short trailing window
//! but moved no units, while still holding stock.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use retailpulse_core::{DataAccessResult, PairKey, ProductId, StoreId};

use crate::inventory::CurrentInventory;
use crate::panel::DemandWindow;
use crate::record::{ProductName, SalesRow};
use crate::source::DemandDataSource;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeadStockThresholds {
    /// Trailing days that must show zero units sold.
    pub window_days: u32,
    /// Alert only above this many units on hand.
    pub min_units_on_hand: i64,
}

impl DeadStockThresholds {
    pub const DEFAULT_WINDOW_DAYS: u32 = 7;
    pub const DEFAULT_MIN_UNITS_ON_HAND: i64 = 10;
}

impl Default for DeadStockThresholds {
    fn default() -> Self {
        Self {
            window_days: Self::DEFAULT_WINDOW_DAYS,
            min_units_on_hand: Self::DEFAULT_MIN_UNITS_ON_HAND,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadStockAlert {
    pub store_id: StoreId,
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub units_on_hand: i64,
}

/// Alerts in ascending (store, product) order.
///
/// Only pairs with at least one row inside the window qualify; on-hand units
/// come from the latest snapshot.
pub fn dead_stock_alerts(
    sales: &[SalesRow],
    inventory: &CurrentInventory,
    names: &[ProductName],
    as_of: NaiveDate,
    thresholds: DeadStockThresholds,
) -> Vec<DeadStockAlert> {
    let window = DemandWindow::ending_at(as_of, thresholds.window_days);

    let mut units_by_pair: BTreeMap<PairKey, i64> = BTreeMap::new();
    for row in sales.iter().filter(|r| window.contains(r.date)) {
        *units_by_pair.entry(row.key()).or_default() += row.units_sold;
    }

    let names: HashMap<ProductId, &str> = names
        .iter()
        .map(|n| (n.product_id, n.product_name.as_str()))
        .collect();

    units_by_pair
        .into_iter()
        .filter(|(_, units)| *units == 0)
        .filter_map(|(key, _)| {
            let units_on_hand = inventory.units_on_hand(&key);
            (units_on_hand > thresholds.min_units_on_hand).then(|| DeadStockAlert {
                store_id: key.store_id,
                product_id: key.product_id,
                product_name: names.get(&key.product_id).map(|n| n.to_string()),
                units_on_hand,
            })
        })
        .collect()
}

/// Read the window, snapshot and names from `source` and scan for dead stock.
pub fn find_dead_stock<S>(
    source: &S,
    as_of: NaiveDate,
    thresholds: DeadStockThresholds,
) -> DataAccessResult<Vec<DeadStockAlert>>
where
    S: DemandDataSource + ?Sized,
{
    let sales = source.read_sales_in_window(thresholds.window_days, as_of)?;
    let inventory = CurrentInventory::resolve(&source.read_latest_inventory_snapshot()?);
    let names = source.read_product_names()?;
    Ok(dead_stock_alerts(&sales, &inventory, &names, as_of, thresholds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use retailpulse_core::DataAccessError;

    use crate::record::{InventoryRow, Product};
    use crate::source::InMemoryDataSource;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn sale(days_ago: u64, store: i64, product: i64, units: i64) -> SalesRow {
        SalesRow::new(as_of() - Days::new(days_ago), StoreId::new(store), ProductId::new(product), units)
    }

    fn stock(store: i64, product: i64, units: i64) -> InventoryRow {
        InventoryRow {
            snapshot_date: as_of(),
            store_id: StoreId::new(store),
            product_id: ProductId::new(product),
            units_on_hand: units,
        }
    }

    #[test]
    fn flags_stocked_pairs_without_movement() {
        let source = InMemoryDataSource::new()
            .with_sales([
                sale(1, 1, 1, 0),
                sale(3, 1, 1, 0),
                // Sold something: not dead.
                sale(2, 1, 2, 0),
                sale(2, 1, 2, 4),
                // Zero units but too little stock.
                sale(0, 2, 1, 0),
            ])
            .with_inventory([stock(1, 1, 40), stock(1, 2, 40), stock(2, 1, 10)])
            .with_products([Product {
                product_id: ProductId::new(1),
                product_name: "Canned Beans".into(),
                category: "Grocery".into(),
                unit_cost: None,
            }]);

        let alerts = find_dead_stock(&source, as_of(), DeadStockThresholds::default()).unwrap();
        assert_eq!(
            alerts,
            vec![DeadStockAlert {
                store_id: StoreId::new(1),
                product_id: ProductId::new(1),
                product_name: Some("Canned Beans".into()),
                units_on_hand: 40,
            }]
        );
    }

    #[test]
    fn sales_before_the_window_do_not_count() {
        // Sold 9 units eight days ago; nothing since.
        let sales = vec![sale(8, 1, 1, 9), sale(0, 1, 1, 0)];
        let inventory = CurrentInventory::resolve(&[stock(1, 1, 11)]);

        let alerts = dead_stock_alerts(&sales, &inventory, &[], as_of(), DeadStockThresholds::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].product_name, None);
    }

    #[test]
    fn pairs_without_rows_in_the_window_are_not_reported() {
        let inventory = CurrentInventory::resolve(&[stock(1, 1, 500)]);
        let alerts = dead_stock_alerts(&[], &inventory, &[], as_of(), DeadStockThresholds::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn thresholds_are_configurable() {
        let sales = vec![sale(10, 1, 1, 0)];
        let inventory = CurrentInventory::resolve(&[stock(1, 1, 3)]);
        let thresholds = DeadStockThresholds {
            window_days: 14,
            min_units_on_hand: 2,
        };

        assert_eq!(dead_stock_alerts(&sales, &inventory, &[], as_of(), thresholds).len(), 1);
        assert!(dead_stock_alerts(&sales, &inventory, &[], as_of(), DeadStockThresholds::default()).is_empty());
    }

    struct BrokenInventory;

    impl DemandDataSource for BrokenInventory {
        fn read_sales_in_window(&self, _: u32, _: NaiveDate) -> DataAccessResult<Vec<SalesRow>> {
            Ok(vec![sale(0, 1, 1, 0)])
        }

        fn read_latest_inventory_snapshot(&self) -> DataAccessResult<Vec<InventoryRow>> {
            Err(DataAccessError::query("no such table: fact_inventory"))
        }

        fn read_product_names(&self) -> DataAccessResult<Vec<ProductName>> {
            Ok(Vec::new())
        }

        fn read_product_catalog(&self) -> DataAccessResult<Vec<Product>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn read_failures_propagate() {
        let err = find_dead_stock(&BrokenInventory, as_of(), DeadStockThresholds::default()).unwrap_err();
        assert_eq!(err, DataAccessError::query("no such table: fact_inventory"));
    }
}
