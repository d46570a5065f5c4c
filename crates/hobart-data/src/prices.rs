//! Raw daily price containers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One daily adjusted-close observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date.
    pub date: NaiveDate,
    /// Close adjusted for splits and dividends.
    pub adjusted_close: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub const fn new(date: NaiveDate, adjusted_close: f64) -> Self {
        Self {
            date,
            adjusted_close,
        }
    }
}

/// Daily adjusted closes keyed by symbol.
///
/// Each history is kept sorted by date with at most one point per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    histories: BTreeMap<String, Vec<PricePoint>>,
}

impl PriceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) the history of a symbol.
    ///
    /// Points are sorted by date; for duplicate dates the last one wins.
    pub fn insert(&mut self, symbol: impl Into<String>, mut points: Vec<PricePoint>) {
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        self.histories.insert(symbol.into(), deduped);
    }

    /// History of a symbol, if present.
    pub fn get(&self, symbol: &str) -> Option<&[PricePoint]> {
        self.histories.get(symbol).map(Vec::as_slice)
    }

    /// Symbols present in the table.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.histories.keys().map(String::as_str)
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    /// Whether the table holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }
}

impl FromIterator<(String, Vec<PricePoint>)> for PriceTable {
    fn from_iter<I: IntoIterator<Item = (String, Vec<PricePoint>)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (symbol, points) in iter {
            table.insert(symbol, points);
        }
        table
    }
}
