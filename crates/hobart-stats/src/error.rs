//! Error types for statistical estimation.

use thiserror::Error;

/// Result type for statistical operations.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Errors that can occur during estimation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// A regression's design matrix is rank-deficient
    #[error("Model ({model}) is singular: {reason}")]
    SingularModel {
        /// 1-based model number
        model: usize,
        /// What made the design degenerate
        reason: String,
    },

    /// Design matrix without full column rank, outside of a numbered model
    #[error("Rank-deficient design: {0}")]
    RankDeficient(String),

    /// A statistic was requested on zero observations
    #[error("Empty series: {series}")]
    EmptySeries {
        /// Name of the series
        series: String,
    },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },
}

impl StatsError {
    /// Shorthand for a [`StatsError::EmptySeries`].
    pub fn empty(series: impl Into<String>) -> Self {
        Self::EmptySeries {
            series: series.into(),
        }
    }
}
