//! Monthly log return series.
//!
//! Turns daily adjusted closes for a target instrument and the three factor
//! proxies into an aligned table of monthly log returns:
//!
//! 1. keep only trading days on which all four instruments have a price
//! 2. take the last price of each calendar month, labelled with the month-end date
//! 3. r_t = ln(P_t / P_{t-1}) between consecutive calendar months
//! 4. drop any month where one of the four returns is undefined
//!
//! Every regression in a report is fitted on the same rows, so the deletion
//! is listwise across all columns.

use crate::error::{DataError, Result};
use crate::prices::{PricePoint, PriceTable};
use crate::source::PriceSource;
use chrono::{Datelike, NaiveDate};
use hobart_factors::Factor;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One month of aligned log returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnObservation {
    /// Calendar month-end date.
    pub date: NaiveDate,
    /// Log return of the target instrument.
    pub target: f64,
    /// Log returns of the factor proxies, indexed by [`Factor::index`].
    pub factors: [f64; 3],
}

impl ReturnObservation {
    /// Create a new observation.
    pub const fn new(date: NaiveDate, target: f64, factors: [f64; 3]) -> Self {
        Self {
            date,
            target,
            factors,
        }
    }

    /// Return of one factor proxy.
    pub const fn factor(&self, factor: Factor) -> f64 {
        self.factors[factor.index()]
    }

    fn is_finite(&self) -> bool {
        self.target.is_finite() && self.factors.iter().all(|v| v.is_finite())
    }
}

/// Aligned monthly log returns of a target instrument and the factor proxies.
///
/// Dates are strictly increasing, every value is finite and there are at
/// least [`ReturnSeries::MIN_OBSERVATIONS`] rows. Deserialization goes
/// through [`ReturnSeries::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawReturnSeries")]
pub struct ReturnSeries {
    target: String,
    observations: Vec<ReturnObservation>,
}

#[derive(Deserialize)]
struct RawReturnSeries {
    target: String,
    observations: Vec<ReturnObservation>,
}

impl TryFrom<RawReturnSeries> for ReturnSeries {
    type Error = DataError;

    fn try_from(raw: RawReturnSeries) -> Result<Self> {
        Self::new(raw.target, raw.observations)
    }
}

impl ReturnSeries {
    /// Minimum number of rows for a usable series.
    pub const MIN_OBSERVATIONS: usize = 2;

    /// Create a series, checking its invariants.
    pub fn new(target: impl Into<String>, observations: Vec<ReturnObservation>) -> Result<Self> {
        let target = target.into();
        if target.is_empty() {
            return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
        }
        if observations.len() < Self::MIN_OBSERVATIONS {
            return Err(DataError::InvalidSeries(format!(
                "need at least {} observations, got {}",
                Self::MIN_OBSERVATIONS,
                observations.len()
            )));
        }
        if let Some(pair) = observations.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(DataError::InvalidSeries(format!(
                "dates not strictly increasing at {}",
                pair[1].date
            )));
        }
        if let Some(obs) = observations.iter().find(|o| !o.is_finite()) {
            return Err(DataError::InvalidSeries(format!(
                "non-finite value on {}",
                obs.date
            )));
        }

        Ok(Self {
            target,
            observations,
        })
    }

    /// Target instrument symbol (also its column name).
    pub fn target(&self) -> &str {
        &self.target
    }

    /// All rows in date order.
    pub fn observations(&self) -> &[ReturnObservation] {
        &self.observations
    }

    /// Number of monthly observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Always false for a constructed series; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Number of columns (target plus factors).
    pub const fn width(&self) -> usize {
        1 + Factor::ALL.len()
    }

    /// Month-end dates.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.observations.iter().map(|o| o.date).collect()
    }

    /// First month-end date.
    pub fn first_date(&self) -> NaiveDate {
        self.observations[0].date
    }

    /// Last month-end date.
    pub fn last_date(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].date
    }

    /// Target returns in date order.
    pub fn target_returns(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.target).collect()
    }

    /// Returns of one factor proxy in date order.
    pub fn factor_returns(&self, factor: Factor) -> Vec<f64> {
        self.observations.iter().map(|o| o.factor(factor)).collect()
    }

    /// Column names: target first, then factors in canonical order.
    pub fn column_names(&self) -> Vec<&str> {
        std::iter::once(self.target.as_str())
            .chain(Factor::ALL.iter().map(|f| f.column()))
            .collect()
    }

    /// Convert to a DataFrame with columns: date, target, SP500, VW, TYX
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = vec![
            Series::new("date".into(), self.dates()).into(),
            Series::new(self.target.as_str().into(), self.target_returns()).into(),
        ];
        for factor in Factor::ALL {
            columns.push(Series::new(factor.column().into(), self.factor_returns(factor)).into());
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Symbols fetched for a report on `ticker`: target first, then the proxies.
pub fn required_symbols(ticker: &str) -> Vec<String> {
    std::iter::once(ticker.to_string())
        .chain(Factor::ALL.iter().map(|f| f.yahoo_symbol().to_string()))
        .collect()
}

/// Fetch prices for `ticker` and the factor proxies and build its return series.
///
/// # Errors
///
/// Fails with [`DataError::InvalidSymbol`] for an empty ticker,
/// [`DataError::InvalidDateRange`] unless `start < end`, and
/// [`DataError::DataUnavailable`] when the source fails or fewer than two
/// aligned months remain.
pub async fn build<S: PriceSource>(
    source: &S,
    ticker: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ReturnSeries> {
    if ticker.trim().is_empty() {
        return Err(DataError::InvalidSymbol("Empty symbol".to_string()));
    }
    if start >= end {
        return Err(DataError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let symbols = required_symbols(ticker);
    tracing::debug!(ticker, %start, %end, symbols = symbols.len(), "fetching adjusted closes");
    let table = source.fetch_adjusted_close(&symbols, start, end).await?;

    build_from_prices(ticker, &table)
}

/// Build a return series from already fetched prices.
///
/// `table` must hold histories for `ticker` and for each factor's Yahoo symbol.
pub fn build_from_prices(ticker: &str, table: &PriceTable) -> Result<ReturnSeries> {
    let symbols = required_symbols(ticker);
    let mut histories: Vec<HashMap<NaiveDate, f64>> = Vec::with_capacity(symbols.len());
    for symbol in &symbols {
        let history = table
            .get(symbol)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| DataError::unavailable(symbol.as_str(), "no price history returned"))?;
        histories.push(history.iter().map(|p| (p.date, p.adjusted_close)).collect());
    }

    let daily = align_daily(table.get(ticker).unwrap_or_default(), &histories);
    let monthly = resample_month_end(&daily);
    let observations = monthly_log_returns(&monthly);

    tracing::debug!(
        ticker,
        aligned_days = daily.len(),
        months = monthly.len(),
        observations = observations.len(),
        "built monthly return series"
    );

    if observations.len() < ReturnSeries::MIN_OBSERVATIONS {
        return Err(DataError::unavailable(
            ticker,
            format!(
                "only {} aligned monthly observation(s), need at least {}",
                observations.len(),
                ReturnSeries::MIN_OBSERVATIONS
            ),
        ));
    }

    ReturnSeries::new(ticker, observations)
}

/// Calendar month-end date of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Four prices (target, SP500, VW, TYX) on one date.
type Row = (NaiveDate, [f64; 4]);

/// Keep only dates on which every instrument has a finite price.
fn align_daily(target: &[PricePoint], histories: &[HashMap<NaiveDate, f64>]) -> Vec<Row> {
    target
        .iter()
        .filter_map(|point| {
            let mut prices = [0.0; 4];
            for (slot, history) in prices.iter_mut().zip(histories) {
                *slot = *history.get(&point.date)?;
            }
            prices
                .iter()
                .all(|p| p.is_finite())
                .then_some((point.date, prices))
        })
        .collect()
}

/// Last row of each calendar month, labelled with the month-end date.
fn resample_month_end(daily: &[Row]) -> Vec<Row> {
    let mut months: BTreeMap<NaiveDate, [f64; 4]> = BTreeMap::new();
    for (date, prices) in daily {
        // daily is date-ordered, so the last insert per month wins
        months.insert(month_end(*date), *prices);
    }
    months.into_iter().collect()
}

fn month_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Log returns between adjacent calendar months.
fn monthly_log_returns(monthly: &[Row]) -> Vec<ReturnObservation> {
    monthly
        .windows(2)
        .filter(|w| month_ordinal(w[1].0) - month_ordinal(w[0].0) == 1)
        .filter_map(|w| {
            let (_, prev) = w[0];
            let (date, curr) = w[1];
            let mut r = [0.0; 4];
            for ((slot, p0), p1) in r.iter_mut().zip(prev).zip(curr) {
                if p0 <= 0.0 || p1 <= 0.0 {
                    return None;
                }
                *slot = (p1 / p0).ln();
            }
            let obs = ReturnObservation::new(date, r[0], [r[1], r[2], r[3]]);
            obs.is_finite().then_some(obs)
        })
        .collect()
}
