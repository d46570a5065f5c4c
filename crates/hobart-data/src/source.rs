//! Price source abstraction.

use crate::error::Result;
use crate::prices::PriceTable;
use chrono::NaiveDate;

/// Anything that can supply daily adjusted-close prices.
///
/// Implementations must return a history for every requested symbol or fail
/// with [`DataError::DataUnavailable`](crate::DataError::DataUnavailable).
#[allow(async_fn_in_trait)]
pub trait PriceSource {
    /// Fetch adjusted closes for `symbols` over `[start, end]`.
    async fn fetch_adjusted_close(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable>;
}

/// A fixed, in-memory price source.
///
/// Serves requests from a preloaded [`PriceTable`], trimmed to the requested
/// range. Useful for replaying saved data and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    table: PriceTable,
}

impl StaticPriceSource {
    /// Wrap a price table.
    pub const fn new(table: PriceTable) -> Self {
        Self { table }
    }
}

impl PriceSource for StaticPriceSource {
    async fn fetch_adjusted_close(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable> {
        let mut out = PriceTable::new();
        for symbol in symbols {
            let history = self.table.get(symbol).ok_or_else(|| {
                crate::DataError::unavailable(symbol.as_str(), "symbol not present in price table")
            })?;
            let points: Vec<_> = history
                .iter()
                .filter(|p| p.date >= start && p.date <= end)
                .copied()
                .collect();
            out.insert(symbol.as_str(), points);
        }
        Ok(out)
    }
}
