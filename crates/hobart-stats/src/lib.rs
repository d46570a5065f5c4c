#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod descriptive;
pub mod distribution;
pub mod error;
pub mod linalg;
pub mod ols;
pub mod regression;

// Re-export main types
pub use descriptive::{DescriptiveStats, describe, quantile};
pub use distribution::{
    CdfPoint, DEFAULT_BINS, DistributionAnalysis, Histogram, NormalFit, analyze_distribution,
    empirical_cdf, fit_normal, histogram,
};
pub use error::{Result, StatsError};
pub use ols::OlsFit;
pub use regression::{
    CoefficientEstimate, RegressionResult, RegressionSet, design_matrix, fit_all, fit_model,
};
