#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/hobart/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod prices;
pub mod series;
pub mod source;
pub mod yahoo;

pub use error::{DataError, Result};
pub use prices::{PricePoint, PriceTable};
pub use series::{
    ReturnObservation, ReturnSeries, build, build_from_prices, month_end, required_symbols,
};
pub use source::{PriceSource, StaticPriceSource};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
