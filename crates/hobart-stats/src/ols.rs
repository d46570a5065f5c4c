//! Ordinary least squares with classical inference.
//!
//! Given y (n) and X (n x k, intercept column included by the caller):
//!
//! - β = (XᵀX)⁻¹ Xᵀy
//! - s² = SSR / (n - k)
//! - Var(β) = s² (XᵀX)⁻¹, standard errors are the square roots of its diagonal
//! - t = β / se, two-sided p-values from Student's t with n - k degrees of freedom
//! - F = ((SST - SSR) / (k - 1)) / (SSR / (n - k))

use crate::error::{Result, StatsError};
use crate::linalg::invert;
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Output of an OLS fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlsFit {
    /// Estimated coefficients, in design-matrix column order
    pub coefficients: Array1<f64>,
    /// Standard errors of the coefficients
    pub standard_errors: Array1<f64>,
    /// t-statistics
    pub t_values: Array1<f64>,
    /// Two-sided p-values
    pub p_values: Array1<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
    /// Total sum of squares about the mean of y
    pub sst: f64,
    /// Number of observations
    pub nobs: usize,
    /// Residual degrees of freedom (n - k)
    pub df_resid: usize,
}

impl OlsFit {
    /// Number of estimated parameters.
    pub fn n_params(&self) -> usize {
        self.coefficients.len()
    }

    /// Residual standard error, sqrt(SSR / (n - k)).
    pub fn residual_std_error(&self) -> f64 {
        (self.ssr / self.df_resid as f64).sqrt()
    }

    /// Coefficient of determination. Zero when y has no variance.
    pub fn r_squared(&self) -> f64 {
        if self.sst <= 0.0 {
            return 0.0;
        }
        1.0 - self.ssr / self.sst
    }

    /// R² adjusted for the number of parameters.
    pub fn adj_r_squared(&self) -> f64 {
        let n = self.nobs as f64;
        1.0 - (1.0 - self.r_squared()) * (n - 1.0) / self.df_resid as f64
    }

    /// F-statistic of the regression against an intercept-only model.
    pub fn f_statistic(&self) -> f64 {
        let df_model = self.n_params().saturating_sub(1);
        if df_model == 0 {
            return f64::NAN;
        }
        let explained = (self.sst - self.ssr).max(0.0) / df_model as f64;
        let unexplained = self.ssr / self.df_resid as f64;
        if unexplained == 0.0 {
            return if explained == 0.0 { f64::NAN } else { f64::INFINITY };
        }
        explained / unexplained
    }

    /// p-value of the F-statistic.
    pub fn f_p_value(&self) -> f64 {
        let f = self.f_statistic();
        if f.is_nan() {
            return f64::NAN;
        }
        if f.is_infinite() {
            return 0.0;
        }
        let df_model = (self.n_params() - 1) as f64;
        FisherSnedecor::new(df_model, self.df_resid as f64)
            .map_or(f64::NAN, |dist| 1.0 - dist.cdf(f))
    }
}

/// Fit y on X by ordinary least squares.
///
/// # Errors
///
/// [`StatsError::DimensionMismatch`] if X and y disagree on the number of
/// rows, [`StatsError::RankDeficient`] if `n <= k` or XᵀX is singular.
pub fn fit(y: ArrayView1<'_, f64>, x: ArrayView2<'_, f64>) -> Result<OlsFit> {
    let (n, k) = x.dim();
    if y.len() != n {
        return Err(StatsError::DimensionMismatch {
            expected: n,
            actual: y.len(),
        });
    }
    if n <= k {
        return Err(StatsError::RankDeficient(format!(
            "{n} observations for {k} parameters"
        )));
    }

    let xtx = x.t().dot(&x);
    let xtx_inv = invert(&xtx)
        .ok_or_else(|| StatsError::RankDeficient("XᵀX is singular (collinear regressors)".into()))?;
    let coefficients = xtx_inv.dot(&x.t().dot(&y));

    let residuals = &y - &x.dot(&coefficients);
    let ssr = residuals.dot(&residuals);
    let mean = y.sum() / n as f64;
    let sst = y.iter().map(|v| (v - mean).powi(2)).sum::<f64>();

    let df_resid = n - k;
    let sigma2 = ssr / df_resid as f64;
    let standard_errors = xtx_inv.diag().mapv(|v| (sigma2 * v).max(0.0).sqrt());

    let t_dist = StudentsT::new(0.0, 1.0, df_resid as f64)
        .map_err(|e| StatsError::RankDeficient(e.to_string()))?;

    let mut t_values = Array1::<f64>::zeros(k);
    let mut p_values = Array1::<f64>::zeros(k);
    for i in 0..k {
        let (coef, se) = (coefficients[i], standard_errors[i]);
        if se == 0.0 {
            // Exact fit: any non-zero coefficient is infinitely precise.
            t_values[i] = if coef == 0.0 { 0.0 } else { coef.signum() * f64::INFINITY };
            p_values[i] = if coef == 0.0 { 1.0 } else { 0.0 };
        } else {
            let t = coef / se;
            t_values[i] = t;
            p_values[i] = (2.0 * (1.0 - t_dist.cdf(t.abs()))).clamp(0.0, 1.0);
        }
    }

    Ok(OlsFit {
        coefficients,
        standard_errors,
        t_values,
        p_values,
        ssr,
        sst,
        nobs: n,
        df_resid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    fn with_intercept(columns: &[&[f64]]) -> Array2<f64> {
        let n = columns[0].len();
        let mut x = Array2::<f64>::ones((n, columns.len() + 1));
        for (j, col) in columns.iter().enumerate() {
            for (i, v) in col.iter().enumerate() {
                x[[i, j + 1]] = *v;
            }
        }
        x
    }

    #[test]
    fn test_simple_regression_known_values() {
        // y = 1 + 2x + e with hand-computed statistics
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = array![3.1, 4.9, 7.2, 8.8, 11.0];
        let x = with_intercept(&[&xs]);

        let fit = fit(y.view(), x.view()).unwrap();

        assert_abs_diff_eq!(fit.coefficients[1], 1.97, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.coefficients[0], 1.09, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.ssr, 0.091, epsilon = 1e-9);
        assert_eq!(fit.nobs, 5);
        assert_eq!(fit.df_resid, 3);
        // se(slope) = sqrt(s² / Sxx) with Sxx = 10
        assert_abs_diff_eq!(
            fit.standard_errors[1],
            (0.091 / 3.0 / 10.0f64).sqrt(),
            epsilon = 1e-9
        );
        assert!(fit.p_values[1] < 0.001);
        assert!(fit.r_squared() > 0.99);
    }

    #[test]
    fn test_exact_fit_p_values() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let y = array![2.0, 4.0, 6.0, 8.0];
        let x = with_intercept(&[&xs]);

        let fit = fit(y.view(), x.view()).unwrap();
        assert_abs_diff_eq!(fit.coefficients[1], 2.0, epsilon = 1e-10);
        assert!(fit.p_values[1] < 0.01);
        assert!(fit.f_p_value() <= 0.01);
    }

    #[test]
    fn test_collinear_columns_are_rank_deficient() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0];
        let y = array![1.0, 3.0, 2.0, 5.0, 4.0];
        let x = with_intercept(&[&a, &b]);

        assert!(matches!(
            fit(y.view(), x.view()),
            Err(StatsError::RankDeficient(_))
        ));
    }

    #[test]
    fn test_too_few_observations() {
        let y = array![1.0, 2.0];
        let x = with_intercept(&[&[1.0, 2.0]]);
        assert!(matches!(
            fit(y.view(), x.view()),
            Err(StatsError::RankDeficient(_))
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let y = array![1.0, 2.0, 3.0];
        let x = with_intercept(&[&[1.0, 2.0, 3.0, 4.0]]);
        assert!(matches!(
            fit(y.view(), x.view()),
            Err(StatsError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_fit_statistics_consistency() {
        let xs = [0.5, -1.0, 2.0, 0.0, 1.5, -0.5, 1.0];
        let y = array![1.2, -0.9, 2.4, 0.3, 1.4, -0.2, 1.3];
        let x = with_intercept(&[&xs]);

        let fit = fit(y.view(), x.view()).unwrap();
        let r2 = fit.r_squared();
        assert!((0.0..=1.0).contains(&r2));
        assert!(fit.adj_r_squared() <= r2);
        // With one slope, F equals t² of the slope.
        assert_abs_diff_eq!(fit.f_statistic(), fit.t_values[1].powi(2), epsilon = 1e-8);
        assert_abs_diff_eq!(fit.f_p_value(), fit.p_values[1], epsilon = 1e-6);
    }
}
