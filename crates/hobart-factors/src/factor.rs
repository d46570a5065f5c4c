//! Market factor proxies and the canonical regressor columns.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while resolving factor names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactorError {
    /// The name matches neither a column name nor a Yahoo symbol.
    #[error("Unknown factor: {0}")]
    UnknownFactor(String),
}

/// One of the three fixed market-factor proxies.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Factor {
    /// S&P 500 index.
    #[display("SP500")]
    Sp500,
    /// Wilshire 5000, used as the value-weighted market proxy.
    #[display("VW")]
    ValueWeighted,
    /// CBOE 30-year Treasury yield index.
    #[display("TYX")]
    TreasuryYield,
}

impl Factor {
    /// All factors in canonical column order.
    pub const ALL: [Self; 3] = [Self::Sp500, Self::ValueWeighted, Self::TreasuryYield];

    /// Column name used in return series and exports.
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Sp500 => "SP500",
            Self::ValueWeighted => "VW",
            Self::TreasuryYield => "TYX",
        }
    }

    /// Yahoo Finance symbol of the proxy.
    pub const fn yahoo_symbol(&self) -> &'static str {
        match self {
            Self::Sp500 => "^GSPC",
            Self::ValueWeighted => "^W5000",
            Self::TreasuryYield => "^TYX",
        }
    }

    /// Column header used in the formatted regression table.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Sp500 => "S&P 500",
            Self::ValueWeighted => "Val.-Wgtd",
            Self::TreasuryYield => "30 Yr Treas.",
        }
    }

    /// Position of the factor in [`Factor::ALL`].
    pub const fn index(&self) -> usize {
        match self {
            Self::Sp500 => 0,
            Self::ValueWeighted => 1,
            Self::TreasuryYield => 2,
        }
    }
}

impl FromStr for Factor {
    type Err = FactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.column().eq_ignore_ascii_case(s) || f.yahoo_symbol().eq_ignore_ascii_case(s))
            .ok_or_else(|| FactorError::UnknownFactor(s.to_string()))
    }
}

/// An explanatory variable of a regression: the intercept or a factor.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regressor {
    /// Constant term.
    #[display("const")]
    Intercept,
    /// Slope on a market factor.
    #[display("{_0}")]
    Factor(Factor),
}

impl Regressor {
    /// Fixed column order of the regression table.
    pub const CANONICAL: [Self; 4] = [
        Self::Intercept,
        Self::Factor(Factor::Sp500),
        Self::Factor(Factor::ValueWeighted),
        Self::Factor(Factor::TreasuryYield),
    ];

    /// Table header for this regressor.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Intercept => "Int.",
            Self::Factor(factor) => factor.display_name(),
        }
    }
}

impl From<Factor> for Regressor {
    fn from(factor: Factor) -> Self {
        Self::Factor(factor)
    }
}
