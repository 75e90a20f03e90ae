use std::collections::HashMap;

use chrono::NaiveDate;

use retailpulse_core::PairKey;

use crate::record::InventoryRow;

/// On-hand units as of the single latest snapshot date in the table.
///
/// The as-of date is global: a pair whose own latest row is older than the
/// table-wide maximum counts as having no stock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentInventory {
    as_of: Option<NaiveDate>,
    on_hand: HashMap<PairKey, i64>,
}

impl CurrentInventory {
    pub fn resolve(rows: &[InventoryRow]) -> Self {
        let Some(as_of) = rows.iter().map(|row| row.snapshot_date).max() else {
            return Self::default();
        };

        let on_hand = rows
            .iter()
            .filter(|row| row.snapshot_date == as_of)
            .map(|row| (row.key(), row.units_on_hand))
            .collect();

        Self {
            as_of: Some(as_of),
            on_hand,
        }
    }

    pub fn as_of(&self) -> Option<NaiveDate> {
        self.as_of
    }

    /// Units on hand; absence means no stock.
    pub fn units_on_hand(&self, key: &PairKey) -> i64 {
        self.on_hand.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.on_hand.len()
    }

    pub fn is_empty(&self) -> bool {
        self.on_hand.is_empty()
    }
}
