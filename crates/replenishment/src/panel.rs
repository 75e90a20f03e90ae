//! Dense demand panel: one cell per (day in window) × (observed pair).
//!
//! Statistics over the sparse sales log would only see days that had sales
//! and overstate both mean and volatility, so every observed pair is expanded
//! to the full window with explicit zeros.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use retailpulse_core::PairKey;

use crate::record::{DemandRecord, SalesRow};

/// Trailing window of calendar days, inclusive at both ends.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DemandWindow {
    end: NaiveDate,
    days: u32,
}

impl DemandWindow {
    /// Window of `days` calendar days whose last day is `end`.
    ///
    /// Shortened to start at `NaiveDate::MIN` when it would reach further back.
    pub fn ending_at(end: NaiveDate, days: u32) -> Self {
        let representable = (end - NaiveDate::MIN).num_days().saturating_add(1);
        let days = u32::try_from(representable).map_or(days, |max| days.min(max));
        Self { end, days }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// First day of the window, `None` for an empty window.
    pub fn start(&self) -> Option<NaiveDate> {
        if self.days == 0 {
            return None;
        }
        self.end.checked_sub_days(Days::new(u64::from(self.days) - 1))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.offset_of(date).is_some()
    }

    /// Zero-based position of `date` inside the window.
    pub fn offset_of(&self, date: NaiveDate) -> Option<usize> {
        let start = self.start()?;
        if date < start || date > self.end {
            return None;
        }
        usize::try_from((date - start).num_days()).ok()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start()
            .into_iter()
            .flat_map(|start| start.iter_days())
            .take(self.days as usize)
    }
}

/// Per-pair daily demand over a fixed window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandPanel {
    window: DemandWindow,
    series: BTreeMap<PairKey, Vec<i64>>,
}

impl DemandPanel {
    /// Build the dense panel from raw rows.
    ///
    /// Rows outside the window are ignored; rows sharing a (day, pair) are
    /// summed. Only pairs with at least one row inside the window appear.
    pub fn build<'a>(window: DemandWindow, rows: impl IntoIterator<Item = &'a SalesRow>) -> Self {
        let len = window.days() as usize;
        let mut series: BTreeMap<PairKey, Vec<i64>> = BTreeMap::new();

        for row in rows {
            let Some(offset) = window.offset_of(row.date) else {
                continue;
            };
            let daily = series.entry(row.key()).or_insert_with(|| vec![0; len]);
            daily[offset] += row.units_sold;
        }

        Self { window, series }
    }

    pub fn window(&self) -> DemandWindow {
        self.window
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Number of observed pairs.
    pub fn pair_count(&self) -> usize {
        self.series.len()
    }

    /// Daily series for one pair, `None` if the pair was never observed.
    pub fn series(&self, key: &PairKey) -> Option<&[i64]> {
        self.series.get(key).map(Vec::as_slice)
    }

    /// Pairs in ascending key order with their daily series.
    pub fn iter(&self) -> impl Iterator<Item = (PairKey, &[i64])> + '_ {
        self.series.iter().map(|(key, daily)| (*key, daily.as_slice()))
    }

    /// Flattened panel as demand records (pair-major, then date).
    pub fn records(&self) -> Vec<DemandRecord> {
        let mut out = Vec::with_capacity(self.series.len() * self.window.days() as usize);
        for (key, daily) in &self.series {
            for (date, units) in self.window.dates().zip(daily.iter()) {
                out.push(DemandRecord {
                    date,
                    store_id: key.store_id,
                    product_id: key.product_id,
                    daily_units_sold: *units,
                });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use retailpulse_core::{ProductId, StoreId};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn sale(days_ago: u64, store: i64, product: i64, units: i64) -> SalesRow {
        SalesRow::new(
            as_of() - Days::new(days_ago),
            StoreId::new(store),
            ProductId::new(product),
            units,
        )
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let window = DemandWindow::ending_at(as_of(), 30);
        assert_eq!(window.start(), NaiveDate::from_ymd_opt(2024, 6, 1));
        assert!(window.contains(as_of()));
        assert!(!window.contains(as_of() - Days::new(30)));
        assert!(!window.contains(as_of() + Days::new(1)));
        assert_eq!(window.dates().count(), 30);
    }

    #[test]
    fn zero_day_window_is_empty() {
        let window = DemandWindow::ending_at(as_of(), 0);
        assert_eq!(window.start(), None);
        assert_eq!(window.dates().count(), 0);

        let panel = DemandPanel::build(window, &[sale(0, 1, 1, 5)]);
        assert!(panel.is_empty());
    }

    #[test]
    fn window_never_reaches_before_the_calendar_start() {
        let end = NaiveDate::MIN + Days::new(2);
        let window = DemandWindow::ending_at(end, u32::MAX);

        assert_eq!(window.days(), 3);
        assert_eq!(window.start(), Some(NaiveDate::MIN));
        let dates: Vec<NaiveDate> = window.dates().collect();
        assert_eq!(dates.len(), 3);
        assert_eq!(dates.last(), Some(&end));
    }

    #[test]
    fn missing_days_are_zero_filled() {
        let rows = vec![sale(0, 1, 1, 10)];
        let panel = DemandPanel::build(DemandWindow::ending_at(as_of(), 30), &rows);

        let key = PairKey::new(StoreId::new(1), ProductId::new(1));
        let series = panel.series(&key).unwrap();
        assert_eq!(series.len(), 30);
        assert_eq!(series[29], 10);
        assert_eq!(series.iter().sum::<i64>(), 10);
    }

    #[test]
    fn same_day_rows_are_summed() {
        let rows = vec![sale(3, 1, 1, 2), sale(3, 1, 1, 5), sale(3, 2, 1, 1)];
        let panel = DemandPanel::build(DemandWindow::ending_at(as_of(), 7), &rows);

        let key = PairKey::new(StoreId::new(1), ProductId::new(1));
        assert_eq!(panel.series(&key).unwrap()[3], 7);
        assert_eq!(panel.pair_count(), 2);
    }

    #[test]
    fn only_observed_pairs_are_expanded() {
        // store 1 sells product 1, store 2 sells product 2; the cross pairs
        // (1, 2) and (2, 1) never sold and must not appear.
        let rows = vec![sale(0, 1, 1, 1), sale(1, 2, 2, 1)];
        let panel = DemandPanel::build(DemandWindow::ending_at(as_of(), 10), &rows);

        assert_eq!(panel.pair_count(), 2);
        assert!(panel.series(&PairKey::new(StoreId::new(1), ProductId::new(2))).is_none());
        assert_eq!(panel.records().len(), 20);
    }

    #[test]
    fn pairs_seen_only_outside_the_window_are_dropped() {
        let rows = vec![sale(30, 1, 1, 9), sale(0, 2, 2, 1)];
        let panel = DemandPanel::build(DemandWindow::ending_at(as_of(), 30), &rows);

        assert_eq!(panel.pair_count(), 1);
        assert!(panel.series(&PairKey::new(StoreId::new(1), ProductId::new(1))).is_none());
    }

    #[test]
    fn records_cover_every_window_date_per_pair() {
        let rows = vec![sale(2, 1, 1, 4)];
        let window = DemandWindow::ending_at(as_of(), 3);
        let records = DemandPanel::build(window, &rows).records();

        let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, window.dates().collect::<Vec<_>>());
        assert_eq!(records[0].daily_units_sold, 4);
        assert_eq!(records[2].daily_units_sold, 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: record count = observed pairs × window length, however
        /// many raw rows each pair had.
        #[test]
        fn panel_size_is_pairs_times_window(
            window_days in 1u32..60,
            raw in prop::collection::vec((0u64..90, 1i64..4, 1i64..6, 0i64..50), 0..120)
        ) {
            let rows: Vec<SalesRow> = raw
                .iter()
                .map(|(ago, s, p, u)| sale(*ago, *s, *p, *u))
                .collect();
            let window = DemandWindow::ending_at(as_of(), window_days);
            let panel = DemandPanel::build(window, &rows);

            let observed: std::collections::BTreeSet<PairKey> = rows
                .iter()
                .filter(|r| window.contains(r.date))
                .map(SalesRow::key)
                .collect();

            prop_assert_eq!(panel.pair_count(), observed.len());
            prop_assert_eq!(panel.records().len(), observed.len() * window_days as usize);
            for (_, series) in panel.iter() {
                prop_assert_eq!(series.len(), window_days as usize);
            }
        }
    }
}
