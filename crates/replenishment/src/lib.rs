//! `retailpulse-replenishment`
//!
//! **Responsibility:** turn trailing sales and the current inventory snapshot
//! into per-store/per-product replenishment signals.
//!
//! - Pure, synchronous computation over a read-only [`DemandDataSource`].
//! - No persistent state between calls; every run rebuilds from the source.
//! - Data-access failures propagate unmodified; an empty window is an empty
//!   result, not an error.

pub mod analytics;
pub mod config;
pub mod engine;
pub mod formula;
pub mod inventory;
pub mod panel;
pub mod record;
pub mod source;
pub mod stats;

pub use config::ReplenishmentConfig;
pub use engine::{MetricsEngine, calculate_inventory_metrics};
pub use formula::{ReplenishmentPoint, replenishment_point, safety_stock, weeks_of_supply};
pub use inventory::CurrentInventory;
pub use panel::{DemandPanel, DemandWindow};
pub use record::{DemandRecord, InventoryRow, MetricRecord, Product, ProductName, SalesRow};
pub use source::{DemandDataSource, InMemoryDataSource};
pub use stats::DemandStats;
