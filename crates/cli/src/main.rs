use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use retailpulse_infra::{AppConfig, SqliteDataSource};
use retailpulse_replenishment::analytics::{
    DEFAULT_FACINGS, DEFAULT_HORIZON_DAYS, DEFAULT_LOW_SUPPLY_WEEKS, DEFAULT_TREND_DAYS, DeadStockThresholds,
    PromotionScenario, ReadinessSummary, RevenueBaseline, Scorecard, ShelfWidth, assess_liability,
    category_daily_series, find_dead_stock, forecast_demand, load_units_trend, total_liability,
    unit_costs_from_catalog, validate_planogram, widths_by_product,
};
use retailpulse_replenishment::{DemandDataSource, MetricsEngine};

/// Replenishment signals from the retail star schema.
///
/// Database and engine parameters come from `RETAILPULSE_*` environment
/// variables; output is JSON on stdout, logs go to stderr.
#[derive(Debug, Parser)]
#[command(name = "retailpulse", version)]
struct Cli {
    /// Last day of the demand window (YYYY-MM-DD); overrides RETAILPULSE_AS_OF.
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// One JSON line per store/product metric record (default).
    Metrics {
        /// Only records flagged for reorder.
        #[arg(long)]
        flagged: bool,
    },
    /// Trailing-window revenue and readiness counts.
    Summary {
        #[arg(long, default_value_t = DEFAULT_LOW_SUPPLY_WEEKS)]
        low_supply_weeks: f64,
    },
    /// Promotion what-if over the trailing window's revenue.
    Scenario {
        #[arg(long, default_value_t = 10.0)]
        discount_pct: f64,
        #[arg(long, default_value_t = 20.0)]
        uplift_pct: f64,
    },
    /// Linear demand trend for one product category.
    Forecast {
        #[arg(long)]
        category: String,
        #[arg(long, default_value_t = DEFAULT_HORIZON_DAYS)]
        horizon_days: u32,
    },
    /// Value of stock on hand at catalog unit cost.
    Liability,
    /// Stocked pairs that sold nothing over the last few days.
    DeadStock {
        #[arg(long, default_value_t = DeadStockThresholds::DEFAULT_WINDOW_DAYS)]
        days: u32,
        #[arg(long, default_value_t = DeadStockThresholds::DEFAULT_MIN_UNITS_ON_HAND)]
        min_on_hand: i64,
    },
    /// Chain-wide units sold per day.
    Trend {
        #[arg(long, default_value_t = DEFAULT_TREND_DAYS)]
        days: u32,
    },
    /// Check a category's assortment against its shelf fixture.
    Planogram {
        #[arg(long)]
        category: String,
        /// JSON array of `{"product_id", "width_inches"}` entries.
        #[arg(long)]
        widths: PathBuf,
        #[arg(long, default_value_t = DEFAULT_FACINGS)]
        facings: u32,
    },
}

fn main() -> anyhow::Result<()> {
    retailpulse_observability::init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("invalid RETAILPULSE_* configuration")?;
    if cli.as_of.is_some() {
        config.as_of = cli.as_of;
    }
    let as_of = config.as_of_or_today();

    let source = SqliteDataSource::connect(&config.database_url)
        .with_context(|| format!("failed to open {}", config.database_url))?;
    let engine = MetricsEngine::new(config.replenishment);

    tracing::info!(
        database_url = %config.database_url,
        %as_of,
        window_days = config.replenishment.window_days,
        "retailpulse run starting"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Command::Metrics { flagged: false }) {
        Command::Metrics { flagged } => {
            let records = engine.compute(&source, as_of).context("metrics computation failed")?;
            for record in records.iter().filter(|r| !flagged || r.flagged_for_reorder) {
                write_json_line(&mut out, record)?;
            }
        }
        Command::Summary { low_supply_weeks } => {
            let records = engine.compute(&source, as_of).context("metrics computation failed")?;
            let baseline = RevenueBaseline::load(&source, config.replenishment.window_days, as_of)
                .context("failed to load revenue baseline")?;
            let readiness = ReadinessSummary::from_records(&records, low_supply_weeks);
            write_json_line(&mut out, &Scorecard::new(&baseline, readiness))?;
        }
        Command::Scenario {
            discount_pct,
            uplift_pct,
        } => {
            let baseline = RevenueBaseline::load(&source, config.replenishment.window_days, as_of)
                .context("failed to load revenue baseline")?;
            let projection = PromotionScenario::new(discount_pct, uplift_pct).project(&baseline)?;
            write_json_line(&mut out, &projection)?;
        }
        Command::Forecast {
            category,
            horizon_days,
        } => {
            let sales = source
                .read_sales_in_window(config.replenishment.window_days, as_of)
                .context("failed to read sales")?;
            let catalog = source.read_product_catalog().context("failed to read product catalog")?;
            let series = category_daily_series(&sales, &catalog, &category);
            let forecast = forecast_demand(&series, horizon_days)
                .with_context(|| format!("cannot forecast category {category:?}"))?;
            write_json_line(&mut out, &forecast)?;
        }
        Command::Liability => {
            let records = engine.compute(&source, as_of).context("metrics computation failed")?;
            let catalog = source.read_product_catalog().context("failed to read product catalog")?;
            let lines = assess_liability(&records, &unit_costs_from_catalog(&catalog));
            for line in &lines {
                write_json_line(&mut out, line)?;
            }
            tracing::info!(lines = lines.len(), total = total_liability(&lines), "liability assessed");
        }
        Command::DeadStock { days, min_on_hand } => {
            let thresholds = DeadStockThresholds {
                window_days: days,
                min_units_on_hand: min_on_hand,
            };
            let alerts = find_dead_stock(&source, as_of, thresholds).context("dead-stock scan failed")?;
            for alert in &alerts {
                write_json_line(&mut out, alert)?;
            }
            tracing::info!(alerts = alerts.len(), "dead-stock scan complete");
        }
        Command::Trend { days } => {
            let trend = load_units_trend(&source, days, as_of).context("failed to read sales")?;
            for point in &trend {
                write_json_line(&mut out, point)?;
            }
        }
        Command::Planogram {
            category,
            widths,
            facings,
        } => {
            let raw = std::fs::read_to_string(&widths)
                .with_context(|| format!("failed to read {}", widths.display()))?;
            let entries: Vec<ShelfWidth> =
                serde_json::from_str(&raw).with_context(|| format!("malformed widths in {}", widths.display()))?;
            let catalog = source.read_product_catalog().context("failed to read product catalog")?;
            let fit = validate_planogram(&catalog, &category, &widths_by_product(&entries), facings)?;
            write_json_line(&mut out, &fit)?;
        }
    }

    out.flush().context("failed to flush stdout")?;
    Ok(())
}

fn write_json_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, value).context("failed to serialize output")?;
    out.write_all(b"\n").context("failed to write output")?;
    Ok(())
}
