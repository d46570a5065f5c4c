//! Error types for the end-to-end pipeline.

use hobart_data::DataError;
use hobart_output::{ExportError, ReportError};
use hobart_stats::StatsError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running an analysis.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Price retrieval or series construction failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// A statistic could not be computed
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// The report could not be assembled or written
    #[error(transparent)]
    Report(#[from] ReportError),

    /// A flat export could not be written
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Stock name not in the catalog
    #[error("Unknown stock: {0}")]
    UnknownStock(String),

    /// Catalog file could not be parsed
    #[error("Invalid stock catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
