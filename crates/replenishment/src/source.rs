//! Data-access boundary of the engine.

use std::sync::Arc;

use chrono::NaiveDate;

use retailpulse_core::DataAccessResult;

use crate::panel::DemandWindow;
use crate::record::{InventoryRow, Product, ProductName, SalesRow};

/// Read-only handle onto the relational source.
///
/// Implementations own their cancellation/timeout policy; the engine only
/// forwards their errors.
pub trait DemandDataSource {
    /// Sales rows dated inside the `days_back`-day window ending at `as_of`.
    fn read_sales_in_window(&self, days_back: u32, as_of: NaiveDate) -> DataAccessResult<Vec<SalesRow>>;

    /// Inventory rows carrying the single most recent `snapshot_date`.
    fn read_latest_inventory_snapshot(&self) -> DataAccessResult<Vec<InventoryRow>>;

    fn read_product_names(&self) -> DataAccessResult<Vec<ProductName>>;

    /// Full product dimension (category, unit cost).
    fn read_product_catalog(&self) -> DataAccessResult<Vec<Product>>;
}

impl<S> DemandDataSource for &S
where
    S: DemandDataSource + ?Sized,
{
    fn read_sales_in_window(&self, days_back: u32, as_of: NaiveDate) -> DataAccessResult<Vec<SalesRow>> {
        (**self).read_sales_in_window(days_back, as_of)
    }

    fn read_latest_inventory_snapshot(&self) -> DataAccessResult<Vec<InventoryRow>> {
        (**self).read_latest_inventory_snapshot()
    }

    fn read_product_names(&self) -> DataAccessResult<Vec<ProductName>> {
        (**self).read_product_names()
    }

    fn read_product_catalog(&self) -> DataAccessResult<Vec<Product>> {
        (**self).read_product_catalog()
    }
}

impl<S> DemandDataSource for Arc<S>
where
    S: DemandDataSource + ?Sized,
{
    fn read_sales_in_window(&self, days_back: u32, as_of: NaiveDate) -> DataAccessResult<Vec<SalesRow>> {
        (**self).read_sales_in_window(days_back, as_of)
    }

    fn read_latest_inventory_snapshot(&self) -> DataAccessResult<Vec<InventoryRow>> {
        (**self).read_latest_inventory_snapshot()
    }

    fn read_product_names(&self) -> DataAccessResult<Vec<ProductName>> {
        (**self).read_product_names()
    }

    fn read_product_catalog(&self) -> DataAccessResult<Vec<Product>> {
        (**self).read_product_catalog()
    }
}

/// In-memory source for tests/dev.
///
/// Holds raw tables exactly as loaded; filtering happens on read, the same
/// way the SQL source does it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    sales: Vec<SalesRow>,
    inventory: Vec<InventoryRow>,
    products: Vec<Product>,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sales(mut self, rows: impl IntoIterator<Item = SalesRow>) -> Self {
        self.sales.extend(rows);
        self
    }

    pub fn with_inventory(mut self, rows: impl IntoIterator<Item = InventoryRow>) -> Self {
        self.inventory.extend(rows);
        self
    }

    pub fn with_products(mut self, rows: impl IntoIterator<Item = Product>) -> Self {
        self.products.extend(rows);
        self
    }
}

impl DemandDataSource for InMemoryDataSource {
    fn read_sales_in_window(&self, days_back: u32, as_of: NaiveDate) -> DataAccessResult<Vec<SalesRow>> {
        let window = DemandWindow::ending_at(as_of, days_back);
        Ok(self
            .sales
            .iter()
            .filter(|row| window.contains(row.date))
            .cloned()
            .collect())
    }

    fn read_latest_inventory_snapshot(&self) -> DataAccessResult<Vec<InventoryRow>> {
        let Some(latest) = self.inventory.iter().map(|row| row.snapshot_date).max() else {
            return Ok(Vec::new());
        };
        Ok(self
            .inventory
            .iter()
            .filter(|row| row.snapshot_date == latest)
            .cloned()
            .collect())
    }

    fn read_product_names(&self) -> DataAccessResult<Vec<ProductName>> {
        Ok(self.products.iter().map(Product::name).collect())
    }

    fn read_product_catalog(&self) -> DataAccessResult<Vec<Product>> {
        Ok(self.products.clone())
    }
}
