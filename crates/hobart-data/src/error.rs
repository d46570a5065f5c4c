//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Price data could not be obtained, or too little of it survived alignment
    #[error("Data unavailable for {symbol}: {reason}")]
    DataUnavailable {
        /// Symbol that was queried
        symbol: String,
        /// Reason the data is unavailable
        reason: String,
    },

    /// Invalid date range
    #[error("Invalid date range: start {start} is not before end {end}")]
    InvalidDateRange {
        /// Start date of the range
        start: String,
        /// End date of the range
        end: String,
    },

    /// Invalid symbol
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// A return series violated one of its invariants
    #[error("Invalid return series: {0}")]
    InvalidSeries(String),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Time conversion error
    #[error("Time conversion error: {0}")]
    TimeConversion(String),
}

impl DataError {
    /// Shorthand for a [`DataError::DataUnavailable`].
    pub fn unavailable(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error means the pipeline has no usable data.
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable { .. })
    }
}
