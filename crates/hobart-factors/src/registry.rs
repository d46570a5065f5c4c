//! Factor Registry
//!
//! Descriptive metadata for every market factor proxy, with lookup by column
//! name or Yahoo symbol.

use crate::factor::Factor;

/// Factor metadata
#[derive(Debug, Clone)]
pub struct FactorInfo {
    /// The factor itself
    pub factor: Factor,
    /// Column name in return series
    pub column: &'static str,
    /// Yahoo Finance symbol of the proxy
    pub symbol: &'static str,
    /// Table header
    pub display_name: &'static str,
    /// Brief description of what the proxy measures
    pub description: &'static str,
}

/// Get all available factor info
pub fn available_factors() -> Vec<FactorInfo> {
    Factor::ALL.into_iter().map(info_for).collect()
}

/// Get factor info by column name or Yahoo symbol
pub fn get_factor_info(name: &str) -> Option<FactorInfo> {
    name.parse::<Factor>().ok().map(info_for)
}

/// Yahoo symbols of every proxy, in canonical order
pub fn factor_symbols() -> Vec<&'static str> {
    Factor::ALL.iter().map(Factor::yahoo_symbol).collect()
}

fn info_for(factor: Factor) -> FactorInfo {
    let description = match factor {
        Factor::Sp500 => "Large-cap US equity market (S&P 500 index)",
        Factor::ValueWeighted => "Broad value-weighted US equity market (Wilshire 5000)",
        Factor::TreasuryYield => "Long-term interest rate level (CBOE 30-year Treasury yield)",
    };
    FactorInfo {
        factor,
        column: factor.column(),
        symbol: factor.yahoo_symbol(),
        display_name: factor.display_name(),
        description,
    }
}
