//! Dated exchange rate tables.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One dated rate: the value of one unit of a currency in the reference currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEntry {
    pub date: NaiveDate,
    pub rate: Decimal,
}

/// Rates for a single currency, kept sorted by date with at most one entry per date.
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    entries: Vec<RateEntry>,
}

impl RateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rate, replacing any entry for the same date.
    ///
    /// Returns the replaced rate, if any. Callers validate positivity.
    pub fn insert(&mut self, date: NaiveDate, rate: Decimal) -> Option<Decimal> {
        let entry = RateEntry { date, rate };
        match self.entries.binary_search_by_key(&date, |e| e.date) {
            Ok(idx) => {
                let previous = std::mem::replace(&mut self.entries[idx], entry);
                Some(previous.rate)
            }
            Err(idx) => {
                self.entries.insert(idx, entry);
                None
            }
        }
    }

    /// Get the rate in effect on `date`.
    ///
    /// That is the latest rate dated on or before `date`, or failing that the
    /// earliest rate after it. `None` only when the table is empty.
    pub fn rate_on(&self, date: NaiveDate) -> Option<Decimal> {
        let idx = self.entries.partition_point(|e| e.date <= date);
        if idx > 0 {
            Some(self.entries[idx - 1].rate)
        } else {
            self.entries.first().map(|e| e.rate)
        }
    }

    /// Get the rate recorded for exactly `date`.
    pub fn exact(&self, date: NaiveDate) -> Option<Decimal> {
        self.entries
            .binary_search_by_key(&date, |e| e.date)
            .ok()
            .map(|idx| self.entries[idx].rate)
    }

    /// Earliest recorded entry.
    pub fn earliest(&self) -> Option<&RateEntry> {
        self.entries.first()
    }

    /// Latest recorded entry.
    pub fn latest(&self) -> Option<&RateEntry> {
        self.entries.last()
    }

    /// Iterate entries in date order.
    pub fn iter(&self) -> impl Iterator<Item = &RateEntry> {
        self.entries.iter()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
