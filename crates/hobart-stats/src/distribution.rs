//! Distribution Analyzer
//!
//! Gaussian fit of the target's monthly returns, empirical CDFs for the
//! target and the S&P 500, and the density histogram the normal-fit chart
//! is drawn from.

use crate::descriptive::{DescriptiveStats, describe};
use crate::error::{Result, StatsError};
use hobart_data::ReturnSeries;
use hobart_factors::Factor;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Normal};

/// Bin count used for the normal-fit chart.
pub const DEFAULT_BINS: usize = 25;

/// Maximum-likelihood Gaussian parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalFit {
    /// Mean
    pub mu: f64,
    /// Population standard deviation
    pub sigma: f64,
}

impl NormalFit {
    /// sigma²
    pub fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }

    /// Density at `x`. A degenerate fit (sigma == 0) puts all mass on `mu`.
    pub fn pdf(&self, x: f64) -> f64 {
        match Normal::new(self.mu, self.sigma) {
            Ok(normal) if self.sigma > 0.0 => normal.pdf(x),
            _ if x == self.mu => f64::INFINITY,
            _ => 0.0,
        }
    }
}

/// Fit a normal distribution by maximum likelihood.
///
/// # Errors
///
/// [`StatsError::EmptySeries`] if `returns` is empty.
pub fn fit_normal(returns: &[f64]) -> Result<NormalFit> {
    if returns.is_empty() {
        return Err(StatsError::empty("returns"));
    }

    // Shift by the first value so a constant sample has exactly zero spread.
    let n = returns.len() as f64;
    let shift = returns[0];
    let mu = shift + returns.iter().map(|r| r - shift).sum::<f64>() / n;
    let sigma = (returns.iter().map(|r| (r - mu).powi(2)).sum::<f64>() / n).sqrt();

    Ok(NormalFit { mu, sigma })
}

/// One point of an empirical CDF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CdfPoint {
    /// Observed value
    pub value: f64,
    /// Cumulative probability
    pub probability: f64,
}

/// Empirical CDF: values ascending with `p_i = i / (n - 1)`.
///
/// A single value maps to probability `0.0`; an empty input gives an empty
/// curve.
pub fn empirical_cdf(returns: &[f64]) -> Vec<CdfPoint> {
    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    let denom = sorted.len().saturating_sub(1);
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, value)| CdfPoint {
            value,
            probability: if denom == 0 { 0.0 } else { i as f64 / denom as f64 },
        })
        .collect()
}

/// Equal-width histogram normalised to a density.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges
    pub edges: Vec<f64>,
    /// Observations per bin
    pub counts: Vec<usize>,
    /// `count / (n * width)` per bin; bar areas sum to 1
    pub densities: Vec<f64>,
}

impl Histogram {
    /// Width of every bin.
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if !self.counts.is_empty() => (hi - lo) / self.counts.len() as f64,
            _ => 0.0,
        }
    }

    /// Bin midpoints.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }
}

/// Bin `values` into `bins` equal-width bins spanning their range.
///
/// The last bin is closed on the right. When all values coincide the range
/// is widened to `[v - 0.5, v + 0.5]`.
///
/// # Errors
///
/// [`StatsError::EmptySeries`] on empty input, [`StatsError::DimensionMismatch`]
/// when `bins` is zero.
pub fn histogram(values: &[f64], bins: usize) -> Result<Histogram> {
    if values.is_empty() {
        return Err(StatsError::empty("histogram"));
    }
    if bins == 0 {
        return Err(StatsError::DimensionMismatch {
            expected: 1,
            actual: 0,
        });
    }

    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let n = values.len() as f64;
    let densities = counts.iter().map(|c| *c as f64 / (n * width)).collect();
    let edges = (0..=bins).map(|i| lo + width * i as f64).collect();

    Ok(Histogram {
        edges,
        counts,
        densities,
    })
}

/// Everything the distribution and CDF report sections need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionAnalysis {
    /// Target instrument
    pub target: String,
    /// Reference factor for the CDF comparison
    pub reference: Factor,
    /// Gaussian fit of the target returns
    pub normal: NormalFit,
    /// Target empirical CDF
    pub target_cdf: Vec<CdfPoint>,
    /// Reference empirical CDF
    pub reference_cdf: Vec<CdfPoint>,
    /// Target summary statistics
    pub target_stats: DescriptiveStats,
    /// Reference summary statistics
    pub reference_stats: DescriptiveStats,
}

/// Analyze the target's return distribution against the S&P 500.
///
/// # Errors
///
/// [`StatsError::EmptySeries`] if the series has no rows.
pub fn analyze_distribution(series: &ReturnSeries) -> Result<DistributionAnalysis> {
    let target_returns = series.target_returns();
    let reference = Factor::Sp500;
    let reference_returns = series.factor_returns(reference);

    let normal = fit_normal(&target_returns)?;
    let target_stats = describe(series.target(), &target_returns)?;
    let reference_stats = describe(reference.column(), &reference_returns)?;

    tracing::debug!(
        target = series.target(),
        mu = normal.mu,
        sigma = normal.sigma,
        "fitted normal distribution"
    );

    Ok(DistributionAnalysis {
        target: series.target().to_string(),
        reference,
        normal,
        target_cdf: empirical_cdf(&target_returns),
        reference_cdf: empirical_cdf(&reference_returns),
        target_stats,
        reference_stats,
    })
}
