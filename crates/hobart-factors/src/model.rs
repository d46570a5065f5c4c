//! The five nested regression specifications.
//!
//! Every report fits the same models, in the same order, against the same
//! aligned sample:
//!
//! 1. target ~ SP500
//! 2. target ~ VW
//! 3. target ~ TYX
//! 4. target ~ SP500 + VW
//! 5. target ~ SP500 + VW + TYX
//!
//! All models include an intercept.

use crate::factor::{Factor, Regressor};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A fixed regression specification.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelSpec {
    /// Market beta against the S&P 500.
    #[display("(1)")]
    Sp500,
    /// Beta against the value-weighted market.
    #[display("(2)")]
    ValueWeighted,
    /// Sensitivity to the 30-year Treasury yield.
    #[display("(3)")]
    TreasuryYield,
    /// S&P 500 and value-weighted market together.
    #[display("(4)")]
    Sp500ValueWeighted,
    /// All three factors.
    #[display("(5)")]
    Full,
}

impl ModelSpec {
    /// All specifications in reporting order.
    pub const ALL: [Self; 5] = [
        Self::Sp500,
        Self::ValueWeighted,
        Self::TreasuryYield,
        Self::Sp500ValueWeighted,
        Self::Full,
    ];

    /// 1-based model number.
    pub const fn number(&self) -> usize {
        match self {
            Self::Sp500 => 1,
            Self::ValueWeighted => 2,
            Self::TreasuryYield => 3,
            Self::Sp500ValueWeighted => 4,
            Self::Full => 5,
        }
    }

    /// Factor subset of the model.
    pub const fn factors(&self) -> &'static [Factor] {
        match self {
            Self::Sp500 => &[Factor::Sp500],
            Self::ValueWeighted => &[Factor::ValueWeighted],
            Self::TreasuryYield => &[Factor::TreasuryYield],
            Self::Sp500ValueWeighted => &[Factor::Sp500, Factor::ValueWeighted],
            Self::Full => &Factor::ALL,
        }
    }

    /// Regressors of the model, intercept first.
    pub fn regressors(&self) -> Vec<Regressor> {
        std::iter::once(Regressor::Intercept)
            .chain(self.factors().iter().copied().map(Regressor::Factor))
            .collect()
    }

    /// Number of estimated parameters, intercept included.
    pub const fn parameter_count(&self) -> usize {
        self.factors().len() + 1
    }

    /// Whether the regressor is part of this specification.
    pub fn includes(&self, regressor: Regressor) -> bool {
        match regressor {
            Regressor::Intercept => true,
            Regressor::Factor(factor) => self.factors().contains(&factor),
        }
    }

    /// Human-readable formula for the given target column.
    pub fn formula(&self, target: &str) -> String {
        let rhs: Vec<&str> = self.factors().iter().map(Factor::column).collect();
        format!("{} ~ {}", target, rhs.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_fixed_order() {
        let numbers: Vec<_> = ModelSpec::ALL.iter().map(ModelSpec::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[rstest]
    #[case(ModelSpec::Sp500, 2)]
    #[case(ModelSpec::ValueWeighted, 2)]
    #[case(ModelSpec::TreasuryYield, 2)]
    #[case(ModelSpec::Sp500ValueWeighted, 3)]
    #[case(ModelSpec::Full, 4)]
    fn test_parameter_count(#[case] spec: ModelSpec, #[case] expected: usize) {
        assert_eq!(spec.parameter_count(), expected);
        assert_eq!(spec.regressors().len(), expected);
    }

    #[test]
    fn test_includes() {
        assert!(ModelSpec::TreasuryYield.includes(Regressor::Intercept));
        assert!(ModelSpec::TreasuryYield.includes(Factor::TreasuryYield.into()));
        assert!(!ModelSpec::TreasuryYield.includes(Factor::Sp500.into()));
        assert!(!ModelSpec::Sp500ValueWeighted.includes(Factor::TreasuryYield.into()));
    }

    #[test]
    fn test_models_are_nested_in_full() {
        for spec in ModelSpec::ALL {
            for factor in spec.factors() {
                assert!(ModelSpec::Full.includes((*factor).into()));
            }
        }
    }

    #[test]
    fn test_formula_and_label() {
        assert_eq!(ModelSpec::Sp500ValueWeighted.formula("MAS"), "MAS ~ SP500 + VW");
        assert_eq!(ModelSpec::Full.to_string(), "(5)");
    }
}
