#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod factor;
pub mod model;
pub mod registry;

pub use factor::{Factor, FactorError, Regressor};
pub use model::ModelSpec;

// Re-export registry types for convenience
pub use registry::{FactorInfo, available_factors, factor_symbols, get_factor_info};
