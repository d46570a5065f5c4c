//! Quote data fetching from Yahoo Finance.

use crate::error::{DataError, Result};
use crate::prices::{PricePoint, PriceTable};
use crate::source::PriceSource;
use chrono::{DateTime, NaiveDate};
use polars::prelude::*;
use std::time::Duration;
use tokio::time::sleep;
use yahoo_finance_api as yahoo;

/// Yahoo Finance quote provider with rate limiting.
pub struct YahooQuoteProvider {
    provider: yahoo::YahooConnector,
    rate_limit_delay: Duration,
}

impl std::fmt::Debug for YahooQuoteProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooQuoteProvider")
            .field("rate_limit_delay", &self.rate_limit_delay)
            .finish_non_exhaustive()
    }
}

impl YahooQuoteProvider {
    /// Default pause between two requests.
    pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(250);

    /// Create a new Yahoo Finance quote provider with default rate limiting.
    pub fn new() -> Result<Self> {
        Self::with_rate_limit(Self::DEFAULT_RATE_LIMIT)
    }

    /// Create a new Yahoo Finance quote provider with custom rate limiting.
    pub fn with_rate_limit(rate_limit_delay: Duration) -> Result<Self> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| DataError::unavailable("yahoo", e.to_string()))?;
        Ok(Self {
            provider,
            rate_limit_delay,
        })
    }

    /// Fetch daily quotes for a single symbol.
    ///
    /// # Arguments
    /// * `symbol` - The ticker symbol (e.g., "MAS")
    /// * `start` - First date of the range
    /// * `end` - Last date of the range
    ///
    /// # Returns
    /// A Polars DataFrame with columns: symbol, date, close, adjusted_close
    pub async fn fetch_quotes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DataFrame> {
        // Validate date range
        if start > end {
            return Err(DataError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        // Validate symbol
        if symbol.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }

        let start_time = to_offset_date_time(start)?;
        // Yahoo treats the end timestamp as exclusive
        let end_time = to_offset_date_time(end.succ_opt().unwrap_or(end))?;

        let response = self
            .provider
            .get_quote_history(symbol, start_time, end_time)
            .await
            .map_err(|e| DataError::unavailable(symbol, e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| DataError::unavailable(symbol, e.to_string()))?;

        if quotes.is_empty() {
            return Err(DataError::unavailable(
                symbol,
                "No data returned from Yahoo Finance",
            ));
        }

        let mut dates: Vec<NaiveDate> = Vec::with_capacity(quotes.len());
        for quote in &quotes {
            let date = DateTime::from_timestamp(quote.timestamp as i64, 0)
                .ok_or_else(|| {
                    DataError::TimeConversion(format!("invalid timestamp {}", quote.timestamp))
                })?
                .date_naive();
            dates.push(date);
        }
        let closes: Vec<f64> = quotes.iter().map(|q| q.close).collect();
        let adj_closes: Vec<f64> = quotes.iter().map(|q| q.adjclose).collect();

        let mut df = DataFrame::new(vec![
            Series::new("date".into(), dates).into(),
            Series::new("close".into(), closes).into(),
            Series::new("adjusted_close".into(), adj_closes).into(),
        ])?;

        // Add symbol column
        let symbol_col: Column = Series::new("symbol".into(), vec![symbol; df.height()]).into();
        df.with_column(symbol_col)?;

        let df = df
            .lazy()
            .select(&[
                col("symbol"),
                col("date"),
                col("close"),
                col("adjusted_close"),
            ])
            .collect()?;

        tracing::debug!(symbol, rows = df.height(), "fetched Yahoo quotes");

        // Apply rate limiting
        sleep(self.rate_limit_delay).await;

        Ok(df)
    }

    /// Fetch daily adjusted closes for a single symbol.
    pub async fn fetch_adjusted_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        let df = self.fetch_quotes(symbol, start, end).await?;
        adjusted_closes(&df)
    }
}

impl PriceSource for YahooQuoteProvider {
    async fn fetch_adjusted_close(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceTable> {
        let mut table = PriceTable::new();

        // One symbol at a time; the first failure aborts the whole request.
        for symbol in symbols {
            let history = self.fetch_adjusted_history(symbol, start, end).await?;
            table.insert(symbol.as_str(), history);
        }

        Ok(table)
    }
}

/// Extract (date, adjusted_close) pairs from a quotes DataFrame.
///
/// Rows with a null date or price are skipped.
pub fn adjusted_closes(df: &DataFrame) -> Result<Vec<PricePoint>> {
    let dates = df.column("date")?.as_materialized_series().date()?;
    let prices = df.column("adjusted_close")?.as_materialized_series().f64()?;

    Ok(dates
        .as_date_iter()
        .zip(prices)
        .filter_map(|(date, price)| Some(PricePoint::new(date?, price?)))
        .collect())
}

fn to_offset_date_time(date: NaiveDate) -> Result<time::OffsetDateTime> {
    let timestamp = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DataError::TimeConversion(format!("invalid date {date}")))?
        .and_utc()
        .timestamp();
    time::OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| DataError::TimeConversion(e.to_string()))
}
