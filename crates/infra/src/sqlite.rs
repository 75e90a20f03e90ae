//! SQLite-backed data source over the ETL star schema.
//!
//! Tables: `dim_product`, `fact_sales`, `fact_inventory`. Dates are stored as
//! `YYYY-MM-DD` text; a trailing time component (as written by some loaders)
//! is tolerated.
//!
//! ## Sync facade
//!
//! The engine is synchronous, so this source owns a current-thread Tokio
//! runtime and drives sqlx with `block_on`. Do not call it from inside another
//! Tokio runtime.

use std::time::Duration;

use chrono::{Days, NaiveDate};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use retailpulse_core::{DataAccessError, DataAccessResult, ProductId, StoreId};
use retailpulse_replenishment::{DemandDataSource, InventoryRow, Product, ProductName, SalesRow};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS dim_product (
        product_id   INTEGER PRIMARY KEY,
        product_name TEXT,
        category     TEXT,
        brand        TEXT,
        supplier_id  INTEGER,
        unit_cost    REAL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fact_sales (
        transaction_id INTEGER PRIMARY KEY,
        date           TEXT,
        store_id       INTEGER,
        product_id     INTEGER,
        units_sold     INTEGER,
        sales_amount   REAL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fact_inventory (
        snapshot_date TEXT,
        store_id      INTEGER,
        product_id    INTEGER,
        units_on_hand INTEGER,
        PRIMARY KEY (snapshot_date, store_id, product_id)
    )
    "#,
];

/// Read handle onto a `retail.db`-style SQLite database.
#[derive(Debug)]
pub struct SqliteDataSource {
    runtime: Runtime,
    pool: SqlitePool,
}

impl SqliteDataSource {
    /// Open a pool on `database_url` (e.g. `sqlite://retail.db`, `sqlite::memory:`).
    ///
    /// A single long-lived connection is used so in-memory databases survive
    /// between calls.
    pub fn connect(database_url: &str) -> DataAccessResult<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DataAccessError::connection(format!("failed to start runtime: {e}")))?;

        let pool = runtime
            .block_on(
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .acquire_timeout(Duration::from_secs(10))
                    .connect(database_url),
            )
            .map_err(|e| DataAccessError::connection(format!("{database_url}: {e}")))?;

        debug!(database_url, "sqlite data source connected");
        Ok(Self { runtime, pool })
    }

    /// Create the star-schema tables if they do not exist.
    pub fn init_schema(&self) -> DataAccessResult<()> {
        self.runtime.block_on(async {
            for statement in SCHEMA {
                sqlx::query(statement)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| DataAccessError::query(format!("create schema: {e}")))?;
            }
            Ok(())
        })
    }

    pub fn insert_sales(&self, rows: &[SalesRow]) -> DataAccessResult<()> {
        self.runtime.block_on(async {
            let mut tx = self.pool.begin().await.map_err(query_err("begin fact_sales load"))?;
            for row in rows {
                sqlx::query(
                    r#"
                    INSERT INTO fact_sales (date, store_id, product_id, units_sold, sales_amount)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                )
                .bind(row.date)
                .bind(row.store_id.get())
                .bind(row.product_id.get())
                .bind(row.units_sold)
                .bind(row.sales_amount)
                .execute(&mut *tx)
                .await
                .map_err(query_err("insert fact_sales"))?;
            }
            tx.commit().await.map_err(query_err("commit fact_sales load"))
        })
    }

    pub fn insert_inventory(&self, rows: &[InventoryRow]) -> DataAccessResult<()> {
        self.runtime.block_on(async {
            let mut tx = self.pool.begin().await.map_err(query_err("begin fact_inventory load"))?;
            for row in rows {
                sqlx::query(
                    r#"
                    INSERT INTO fact_inventory (snapshot_date, store_id, product_id, units_on_hand)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT (snapshot_date, store_id, product_id)
                    DO UPDATE SET units_on_hand = excluded.units_on_hand
                    "#,
                )
                .bind(row.snapshot_date)
                .bind(row.store_id.get())
                .bind(row.product_id.get())
                .bind(row.units_on_hand)
                .execute(&mut *tx)
                .await
                .map_err(query_err("insert fact_inventory"))?;
            }
            tx.commit().await.map_err(query_err("commit fact_inventory load"))
        })
    }

    pub fn insert_products(&self, rows: &[Product]) -> DataAccessResult<()> {
        self.runtime.block_on(async {
            let mut tx = self.pool.begin().await.map_err(query_err("begin dim_product load"))?;
            for row in rows {
                sqlx::query(
                    r#"
                    INSERT INTO dim_product (product_id, product_name, category, unit_cost)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT (product_id)
                    DO UPDATE SET
                        product_name = excluded.product_name,
                        category = excluded.category,
                        unit_cost = excluded.unit_cost
                    "#,
                )
                .bind(row.product_id.get())
                .bind(&row.product_name)
                .bind(&row.category)
                .bind(row.unit_cost)
                .execute(&mut *tx)
                .await
                .map_err(query_err("insert dim_product"))?;
            }
            tx.commit().await.map_err(query_err("commit dim_product load"))
        })
    }

    fn fetch_all(&self, what: &'static str, sql: &str, binds: &[NaiveDate]) -> DataAccessResult<Vec<SqliteRow>> {
        self.runtime.block_on(async {
            let mut query = sqlx::query(sql);
            for value in binds {
                query = query.bind(*value);
            }
            query.fetch_all(&self.pool).await.map_err(query_err(what))
        })
    }
}

impl Drop for SqliteDataSource {
    fn drop(&mut self) {
        self.runtime.block_on(self.pool.close());
    }
}

impl DemandDataSource for SqliteDataSource {
    fn read_sales_in_window(&self, days_back: u32, as_of: NaiveDate) -> DataAccessResult<Vec<SalesRow>> {
        if days_back == 0 {
            return Ok(Vec::new());
        }
        let start = as_of
            .checked_sub_days(Days::new(u64::from(days_back) - 1))
            .unwrap_or(NaiveDate::MIN);

        let rows = self.fetch_all(
            "read fact_sales",
            r#"
            SELECT
                DATE(date) AS day,
                store_id,
                product_id,
                CAST(COALESCE(SUM(units_sold), 0) AS INTEGER) AS daily_units_sold,
                CAST(COALESCE(SUM(sales_amount), 0) AS REAL) AS daily_sales_amount
            FROM fact_sales
            WHERE DATE(date) BETWEEN ?1 AND ?2
            GROUP BY DATE(date), store_id, product_id
            ORDER BY day, store_id, product_id
            "#,
            &[start, as_of],
        )?;

        rows.iter()
            .map(|row| {
                Ok(SalesRow {
                    date: get(row, "day")?,
                    store_id: StoreId::new(get(row, "store_id")?),
                    product_id: ProductId::new(get(row, "product_id")?),
                    units_sold: get(row, "daily_units_sold")?,
                    sales_amount: get(row, "daily_sales_amount")?,
                })
            })
            .collect()
    }

    fn read_latest_inventory_snapshot(&self) -> DataAccessResult<Vec<InventoryRow>> {
        let rows = self.fetch_all(
            "read fact_inventory",
            r#"
            SELECT DATE(snapshot_date) AS snapshot_date, store_id, product_id, units_on_hand
            FROM fact_inventory
            WHERE snapshot_date = (SELECT MAX(snapshot_date) FROM fact_inventory)
            "#,
            &[],
        )?;

        rows.iter()
            .map(|row| {
                Ok(InventoryRow {
                    snapshot_date: get(row, "snapshot_date")?,
                    store_id: StoreId::new(get(row, "store_id")?),
                    product_id: ProductId::new(get(row, "product_id")?),
                    units_on_hand: get::<Option<i64>>(row, "units_on_hand")?.unwrap_or(0),
                })
            })
            .collect()
    }

    fn read_product_names(&self) -> DataAccessResult<Vec<ProductName>> {
        let rows = self.fetch_all(
            "read dim_product names",
            "SELECT product_id, product_name FROM dim_product WHERE product_name IS NOT NULL",
            &[],
        )?;

        rows.iter()
            .map(|row| {
                Ok(ProductName {
                    product_id: ProductId::new(get(row, "product_id")?),
                    product_name: get(row, "product_name")?,
                })
            })
            .collect()
    }

    fn read_product_catalog(&self) -> DataAccessResult<Vec<Product>> {
        let rows = self.fetch_all(
            "read dim_product",
            r#"
            SELECT product_id, product_name, category, CAST(unit_cost AS REAL) AS unit_cost
            FROM dim_product
            "#,
            &[],
        )?;

        rows.iter()
            .map(|row| {
                Ok(Product {
                    product_id: ProductId::new(get(row, "product_id")?),
                    product_name: get::<Option<String>>(row, "product_name")?.unwrap_or_default(),
                    category: get::<Option<String>>(row, "category")?.unwrap_or_default(),
                    unit_cost: get(row, "unit_cost")?,
                })
            })
            .collect()
    }
}

fn get<'r, T>(row: &'r SqliteRow, column: &str) -> DataAccessResult<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get::<T, _>(column)
        .map_err(|e| DataAccessError::decode(format!("{column}: {e}")))
}

fn query_err(what: &'static str) -> impl Fn(sqlx::Error) -> DataAccessError {
    move |e| DataAccessError::query(format!("{what}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn memory_db() -> SqliteDataSource {
        let db = SqliteDataSource::connect("sqlite::memory:").unwrap();
        db.init_schema().unwrap();
        db
    }

    /// Raw SQL, bypassing the typed loaders.
    fn execute(db: &SqliteDataSource, sql: &str) {
        db.runtime.block_on(sqlx::query(sql).execute(&db.pool)).unwrap();
    }

    #[test]
    fn timestamped_dates_are_truncated_to_the_day() {
        let db = memory_db();
        execute(
            &db,
            "INSERT INTO fact_sales (date, store_id, product_id, units_sold, sales_amount) \
             VALUES ('2024-06-30 00:00:00', 1, 1, 3, 6.0), ('2024-06-30', 1, 1, 2, 4.0)",
        );
        execute(&db, "INSERT INTO fact_inventory VALUES ('2024-06-30 00:00:00', 1, 1, 9)");

        let sales = db.read_sales_in_window(1, day()).unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].date, day());
        assert_eq!(sales[0].units_sold, 5);

        let stock = db.read_latest_inventory_snapshot().unwrap();
        assert_eq!(stock[0].snapshot_date, day());
        assert_eq!(stock[0].units_on_hand, 9);
    }

    #[test]
    fn malformed_dates_are_decode_errors() {
        let db = memory_db();
        execute(&db, "INSERT INTO fact_inventory VALUES ('30/06/2024', 1, 1, 9)");

        let err = db.read_latest_inventory_snapshot().unwrap_err();
        assert!(matches!(err, DataAccessError::Decode(msg) if msg.contains("snapshot_date")));
    }

    #[test]
    fn typed_loaders_store_iso_dates() {
        let db = memory_db();
        db.insert_sales(&[SalesRow::new(day(), StoreId::new(1), ProductId::new(1), 4)])
            .unwrap();

        let stored: String = db
            .runtime
            .block_on(sqlx::query_scalar("SELECT date FROM fact_sales").fetch_one(&db.pool))
            .unwrap();
        assert_eq!(stored, "2024-06-30");
    }
}
