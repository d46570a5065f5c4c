//! Descriptive statistics for a single column.

use crate::error::{Result, StatsError};
use serde::{Deserialize, Serialize};

/// Summary of one numeric column.
///
/// `std` is the sample standard deviation (divides by `n - 1`) and is NaN
/// for a single observation. Quantiles interpolate linearly between order
/// statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    /// Number of observations
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation
    pub std: f64,
    /// Minimum
    pub min: f64,
    /// 25th percentile
    pub q25: f64,
    /// Median
    pub median: f64,
    /// 75th percentile
    pub q75: f64,
    /// Maximum
    pub max: f64,
}

/// Describe a column of values.
///
/// # Errors
///
/// [`StatsError::EmptySeries`] if `values` is empty.
pub fn describe(name: &str, values: &[f64]) -> Result<DescriptiveStats> {
    if values.is_empty() {
        return Err(StatsError::empty(name));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = values.len();
    let shift = values[0];
    let mean = shift + values.iter().map(|v| v - shift).sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        (ss / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    Ok(DescriptiveStats {
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Linear-interpolation quantile of an ascending slice. NaN when empty.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_describe() {
        let stats = describe("x", &[4.0, 1.0, 3.0, 2.0]).unwrap();

        assert_eq!(stats.count, 4);
        assert_abs_diff_eq!(stats.mean, 2.5);
        // sample variance = 5 / 3
        assert_abs_diff_eq!(stats.std, (5.0f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_abs_diff_eq!(stats.q25, 1.75);
        assert_abs_diff_eq!(stats.median, 2.5);
        assert_abs_diff_eq!(stats.q75, 3.25);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn test_single_value() {
        let stats = describe("x", &[0.3]).unwrap();
        assert_eq!(stats.count, 1);
        assert!(stats.std.is_nan());
        assert_eq!(stats.median, 0.3);
    }

    #[test]
    fn test_quantile() {
        assert_abs_diff_eq!(quantile(&[1.0, 2.0, 3.0], 0.5), 2.0);
        assert_eq!(quantile(&[7.0], 0.9), 7.0);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn test_empty() {
        assert_eq!(describe("MAS", &[]), Err(StatsError::empty("MAS")));
    }
}
