//! Dashboard-facing helpers over engine output and raw sales.
//!
//! None of these feed back into the metrics computation.

pub mod dead_stock;
pub mod forecast;
pub mod liability;
pub mod planogram;
pub mod scenario;
pub mod summary;
pub mod trend;

pub use dead_stock::{DeadStockAlert, DeadStockThresholds, dead_stock_alerts, find_dead_stock};
pub use forecast::{
    DEFAULT_HORIZON_DAYS, DailyPoint, DemandForecast, ForecastPoint, category_daily_series,
    forecast_demand,
};
pub use liability::{LiabilityLine, assess_liability, total_liability, unit_costs_from_catalog};
pub use planogram::{
    DEFAULT_FACINGS, PlanogramFit, ShelfWidth, shelf_limit_inches, validate_planogram, widths_by_product,
};
pub use scenario::{PromotionScenario, RevenueBaseline, ScenarioProjection};
pub use summary::{DEFAULT_LOW_SUPPLY_WEEKS, ReadinessSummary, Scorecard, low_supply};
pub use trend::{DEFAULT_TREND_DAYS, daily_units_trend, load_units_trend};
