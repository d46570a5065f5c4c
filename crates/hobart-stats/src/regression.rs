//! Regression Engine
//!
//! Fits the five fixed [`ModelSpec`]s against one [`ReturnSeries`]. Every
//! model sees the same listwise-deleted sample, so observation counts agree
//! across the set. A singular design only fails its own slot.

use crate::error::{Result, StatsError};
use crate::ols::{self, OlsFit};
use hobart_data::ReturnSeries;
use hobart_factors::{ModelSpec, Regressor};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Inference for one regressor of a fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoefficientEstimate {
    /// Intercept or factor
    pub regressor: Regressor,
    /// Point estimate
    pub coefficient: f64,
    /// Standard error
    pub std_error: f64,
    /// t-statistic
    pub t_value: f64,
    /// Two-sided p-value
    pub p_value: f64,
}

/// A fitted regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Which of the five specifications was fitted
    pub model: ModelSpec,
    /// Dependent variable
    pub target: String,
    /// One estimate per regressor, intercept first
    pub estimates: Vec<CoefficientEstimate>,
    /// sqrt(SSR / (n - k))
    pub residual_std_error: f64,
    /// Coefficient of determination
    pub r_squared: f64,
    /// Adjusted R²
    pub adj_r_squared: f64,
    /// F-statistic against the intercept-only model
    pub f_statistic: f64,
    /// p-value of the F-statistic
    pub f_p_value: f64,
    /// Observation count
    pub nobs: usize,
    /// Residual degrees of freedom
    pub df_resid: usize,
}

impl RegressionResult {
    /// Estimate for a regressor, `None` if the model does not include it.
    pub fn estimate(&self, regressor: Regressor) -> Option<&CoefficientEstimate> {
        self.estimates.iter().find(|e| e.regressor == regressor)
    }

    /// Coefficient for a regressor, `None` if the model does not include it.
    pub fn coefficient(&self, regressor: Regressor) -> Option<f64> {
        self.estimate(regressor).map(|e| e.coefficient)
    }

    /// Formula string, e.g. `MAS ~ SP500 + VW`.
    pub fn formula(&self) -> String {
        self.model.formula(&self.target)
    }

    fn from_fit(model: ModelSpec, target: &str, fit: &OlsFit) -> Self {
        let estimates = model
            .regressors()
            .into_iter()
            .enumerate()
            .map(|(i, regressor)| CoefficientEstimate {
                regressor,
                coefficient: fit.coefficients[i],
                std_error: fit.standard_errors[i],
                t_value: fit.t_values[i],
                p_value: fit.p_values[i],
            })
            .collect();

        Self {
            model,
            target: target.to_string(),
            estimates,
            residual_std_error: fit.residual_std_error(),
            r_squared: fit.r_squared(),
            adj_r_squared: fit.adj_r_squared(),
            f_statistic: fit.f_statistic(),
            f_p_value: fit.f_p_value(),
            nobs: fit.nobs,
            df_resid: fit.df_resid,
        }
    }
}

/// Design matrix for a model: a column of ones followed by the model's
/// factor returns, in [`ModelSpec::factors`] order.
pub fn design_matrix(series: &ReturnSeries, model: ModelSpec) -> Array2<f64> {
    let factors = model.factors();
    Array2::from_shape_fn((series.len(), factors.len() + 1), |(i, j)| {
        if j == 0 {
            1.0
        } else {
            series.observations()[i].factor(factors[j - 1])
        }
    })
}

/// Fit one specification.
///
/// # Errors
///
/// [`StatsError::SingularModel`] when the design is rank-deficient, either
/// from collinear factors or from having no more observations than
/// parameters.
pub fn fit_model(series: &ReturnSeries, model: ModelSpec) -> Result<RegressionResult> {
    let y = Array1::from(series.target_returns());
    let x = design_matrix(series, model);

    let fit = ols::fit(y.view(), x.view()).map_err(|e| StatsError::SingularModel {
        model: model.number(),
        reason: match e {
            StatsError::RankDeficient(reason) => reason,
            other => other.to_string(),
        },
    })?;

    let result = RegressionResult::from_fit(model, series.target(), &fit);
    tracing::debug!(
        model = %model,
        formula = %result.formula(),
        r_squared = result.r_squared,
        nobs = result.nobs,
        "fitted regression"
    );
    Ok(result)
}

/// Outcomes of the five models, in reporting order.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionSet {
    target: String,
    slots: [Result<RegressionResult>; 5],
}

impl RegressionSet {
    /// Dependent variable shared by all models.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Outcome for one specification.
    pub fn get(&self, model: ModelSpec) -> &Result<RegressionResult> {
        &self.slots[model.number() - 1]
    }

    /// All outcomes paired with their specification.
    pub fn iter(&self) -> impl Iterator<Item = (ModelSpec, &Result<RegressionResult>)> {
        ModelSpec::ALL.into_iter().zip(self.slots.iter())
    }

    /// Successfully fitted models.
    pub fn successful(&self) -> impl Iterator<Item = &RegressionResult> {
        self.slots.iter().filter_map(|slot| slot.as_ref().ok())
    }

    /// Failed models.
    pub fn failures(&self) -> impl Iterator<Item = (ModelSpec, &StatsError)> {
        self.iter()
            .filter_map(|(model, slot)| slot.as_ref().err().map(|e| (model, e)))
    }

    /// Whether all five models were fitted.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Result::is_ok)
    }

    /// All five results, or the first failure.
    pub fn complete(&self) -> Result<Vec<RegressionResult>> {
        self.slots.iter().cloned().collect()
    }
}

/// Fit all five specifications against the series' target.
pub fn fit_all(series: &ReturnSeries) -> RegressionSet {
    let slots = ModelSpec::ALL.map(|model| {
        let outcome = fit_model(series, model);
        if let Err(err) = &outcome {
            tracing::warn!(model = %model, error = %err, "regression failed");
        }
        outcome
    });

    RegressionSet {
        target: series.target().to_string(),
        slots,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use hobart_data::{ReturnObservation, month_end};
    use hobart_factors::Factor;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn month(index: usize) -> NaiveDate {
        let year = 2020 + (index / 12) as i32;
        let m = (index % 12) as u32 + 1;
        month_end(NaiveDate::from_ymd_opt(year, m, 1).unwrap())
    }

    fn synthetic_series(
        n: usize,
        seed: u64,
        target: impl Fn(&[f64; 3], f64) -> f64,
        factors: impl Fn(&mut StdRng) -> [f64; 3],
    ) -> ReturnSeries {
        let mut rng = StdRng::seed_from_u64(seed);
        let observations = (0..n)
            .map(|i| {
                let f = factors(&mut rng);
                let noise = rng.gen_range(-1e-4..1e-4);
                ReturnObservation::new(month(i), target(&f, noise), f)
            })
            .collect();
        ReturnSeries::new("MAS", observations).unwrap()
    }

    fn independent_factors(rng: &mut StdRng) -> [f64; 3] {
        [
            rng.gen_range(-0.08..0.08),
            rng.gen_range(-0.08..0.08),
            rng.gen_range(-0.05..0.05),
        ]
    }

    fn noisy_series() -> ReturnSeries {
        let mut rng = StdRng::seed_from_u64(7);
        let observations = (0..60)
            .map(|i| {
                let f = independent_factors(&mut rng);
                let y = 0.002 + 0.9 * f[0] + 0.3 * f[1] - 0.2 * f[2] + rng.gen_range(-0.03..0.03);
                ReturnObservation::new(month(i), y, f)
            })
            .collect();
        ReturnSeries::new("MAS", observations).unwrap()
    }

    #[test]
    fn test_recovers_sp500_beta() {
        let series = synthetic_series(24, 42, |f, e| 1.5 * f[0] + e, independent_factors);
        let result = fit_model(&series, ModelSpec::Sp500).unwrap();

        let beta = result.estimate(Regressor::Factor(Factor::Sp500)).unwrap();
        assert_abs_diff_eq!(beta.coefficient, 1.5, epsilon = 0.01);
        assert!(beta.p_value < 0.01);
        assert_eq!(result.nobs, 24);
        assert_eq!(result.df_resid, 22);
    }

    #[test]
    fn test_all_models_share_sample() {
        let set = fit_all(&noisy_series());
        assert!(set.is_complete());

        let counts: Vec<usize> = set.successful().map(|r| r.nobs).collect();
        assert_eq!(counts, vec![60; 5]);
    }

    #[test]
    fn test_full_model_has_highest_r_squared() {
        let set = fit_all(&noisy_series());
        let results = set.complete().unwrap();

        let full = results[4].r_squared;
        for result in &results[..4] {
            assert!(full >= result.r_squared - 1e-12, "{}", result.model);
        }
    }

    #[test]
    fn test_estimates_follow_regressor_order() {
        let set = fit_all(&noisy_series());
        for result in set.successful() {
            let regressors: Vec<_> = result.estimates.iter().map(|e| e.regressor).collect();
            assert_eq!(regressors, result.model.regressors());
            assert!(result.estimate(Regressor::Intercept).is_some());
        }

        let model3 = set.get(ModelSpec::TreasuryYield).as_ref().unwrap();
        assert!(model3.coefficient(Regressor::Factor(Factor::Sp500)).is_none());
        assert_eq!(model3.formula(), "MAS ~ TYX");
    }

    #[test]
    fn test_collinear_factors_fail_only_affected_models() {
        // VW is an exact multiple of SP500
        let series = synthetic_series(
            24,
            3,
            |f, e| 0.8 * f[0] + 0.1 * f[2] + e,
            |rng| {
                let sp = rng.gen_range(-0.08..0.08);
                [sp, 2.0 * sp, rng.gen_range(-0.05..0.05)]
            },
        );
        let set = fit_all(&series);

        assert!(set.get(ModelSpec::Sp500).is_ok());
        assert!(set.get(ModelSpec::ValueWeighted).is_ok());
        assert!(set.get(ModelSpec::TreasuryYield).is_ok());
        assert!(matches!(
            set.get(ModelSpec::Sp500ValueWeighted),
            Err(StatsError::SingularModel { model: 4, .. })
        ));
        assert!(matches!(
            set.get(ModelSpec::Full),
            Err(StatsError::SingularModel { model: 5, .. })
        ));

        assert!(!set.is_complete());
        assert_eq!(set.successful().count(), 3);
        let failed: Vec<_> = set.failures().map(|(model, _)| model).collect();
        assert_eq!(failed, vec![ModelSpec::Sp500ValueWeighted, ModelSpec::Full]);
        assert!(matches!(
            set.complete(),
            Err(StatsError::SingularModel { model: 4, .. })
        ));
    }

    #[test]
    fn test_too_few_observations_is_singular() {
        let series = synthetic_series(3, 1, |f, e| f[0] + e, independent_factors);
        let set = fit_all(&series);

        assert!(set.get(ModelSpec::Sp500).is_ok());
        assert!(set.get(ModelSpec::Sp500ValueWeighted).is_err());
        assert!(set.get(ModelSpec::Full).is_err());
    }

    #[test]
    fn test_design_matrix_columns() {
        let series = noisy_series();
        let x = design_matrix(&series, ModelSpec::Sp500ValueWeighted);

        assert_eq!(x.dim(), (60, 3));
        assert!(x.column(0).iter().all(|v| *v == 1.0));
        assert_eq!(x[[5, 1]], series.observations()[5].factor(Factor::Sp500));
        assert_eq!(x[[5, 2]], series.observations()[5].factor(Factor::ValueWeighted));
    }
}
