//! Chain-wide daily units and revenue over a trailing window.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use retailpulse_core::DataAccessResult;

use crate::analytics::forecast::DailyPoint;
use crate::panel::DemandWindow;
use crate::record::SalesRow;
use crate::source::DemandDataSource;

pub const DEFAULT_TREND_DAYS: u32 = 60;

/// Totals across every store and product, one point per day with sales rows,
/// ordered by date.
pub fn daily_units_trend(sales: &[SalesRow], window: DemandWindow) -> Vec<DailyPoint> {
    let mut by_day: BTreeMap<NaiveDate, (i64, f64)> = BTreeMap::new();
    for row in sales.iter().filter(|r| window.contains(r.date)) {
        let (units, revenue) = by_day.entry(row.date).or_default();
        *units += row.units_sold;
        *revenue += row.sales_amount;
    }

    by_day
        .into_iter()
        .map(|(date, (units, revenue))| DailyPoint {
            date,
            units: units as f64,
            revenue,
        })
        .collect()
}

pub fn load_units_trend<S>(source: &S, days: u32, as_of: NaiveDate) -> DataAccessResult<Vec<DailyPoint>>
where
    S: DemandDataSource + ?Sized,
{
    let sales = source.read_sales_in_window(days, as_of)?;
    Ok(daily_units_trend(&sales, DemandWindow::ending_at(as_of, days)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use retailpulse_core::{ProductId, StoreId};

    use crate::source::InMemoryDataSource;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn sale(days_ago: u64, store: i64, product: i64, units: i64) -> SalesRow {
        SalesRow::new(as_of() - Days::new(days_ago), StoreId::new(store), ProductId::new(product), units)
            .with_sales_amount(units as f64)
    }

    #[test]
    fn sums_all_pairs_per_day_in_date_order() {
        let source = InMemoryDataSource::new().with_sales([
            sale(0, 1, 1, 2),
            sale(5, 2, 7, 3),
            sale(0, 2, 3, 4),
            sale(59, 1, 1, 1),
            sale(60, 1, 1, 100),
        ]);

        let trend = load_units_trend(&source, DEFAULT_TREND_DAYS, as_of()).unwrap();
        let days: Vec<(NaiveDate, f64)> = trend.iter().map(|p| (p.date, p.units)).collect();
        assert_eq!(
            days,
            vec![
                (as_of() - Days::new(59), 1.0),
                (as_of() - Days::new(5), 3.0),
                (as_of(), 6.0),
            ]
        );
        assert_eq!(trend[2].revenue, 6.0);
    }

    #[test]
    fn days_without_rows_are_absent() {
        let trend = daily_units_trend(&[], DemandWindow::ending_at(as_of(), 60));
        assert!(trend.is_empty());
    }
}
