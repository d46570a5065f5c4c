#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod pipeline;

// Re-export main types from sub-crates
pub use hobart_data as data;
pub use hobart_factors as factors;
pub use hobart_output as output;
pub use hobart_stats as stats;

pub use catalog::{DEFAULT_STOCK, DEFAULT_TICKER, StockCatalog, StockEntry};
pub use error::{PipelineError, Result};
pub use pipeline::{Analysis, AnalysisRequest, WrittenFiles, run_analysis};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
