//! Gaussian likelihood evaluation and closed-form parameter estimation.

use std::f64::consts::PI;

use crate::error::StatsError;

/// Mean and variance of a normal error model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalParams {
    /// Location parameter.
    pub mean: f64,
    /// Variance (not standard deviation).
    pub variance: f64,
}

impl NormalParams {
    /// Creates a new parameter pair.
    pub fn new(mean: f64, variance: f64) -> Self {
        Self { mean, variance }
    }

    /// Standard deviation (`sqrt(variance)`).
    pub fn sd(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Negative log-likelihood of `residuals` under `N(mean, variance)`.
///
/// ```text
/// NLL = n/2 * ln(2*pi*variance) + sum((e - mean)^2) / (2*variance)
/// ```
///
/// A non-positive or non-finite variance yields `f64::INFINITY` so that
/// optimisers can treat the point as a rejected candidate instead of
/// handling an error. An empty residual slice has likelihood one (NLL 0).
///
/// # Example
///
/// ```
/// use condor_stats::{NormalParams, negative_log_likelihood};
///
/// let nll = negative_log_likelihood(&[0.0], &NormalParams::new(0.0, 1.0));
/// assert!((nll - 0.5 * (2.0 * std::f64::consts::PI).ln()).abs() < 1e-12);
/// assert_eq!(
///     negative_log_likelihood(&[1.0], &NormalParams::new(0.0, 0.0)),
///     f64::INFINITY
/// );
/// ```
pub fn negative_log_likelihood(residuals: &[f64], params: &NormalParams) -> f64 {
    if !params.variance.is_finite() || params.variance <= 0.0 || !params.mean.is_finite() {
        return f64::INFINITY;
    }
    if residuals.is_empty() {
        return 0.0;
    }
    let n = residuals.len() as f64;
    let ss: f64 = residuals
        .iter()
        .map(|e| (e - params.mean) * (e - params.mean))
        .sum();
    let nll = 0.5 * n * (2.0 * PI * params.variance).ln() + ss / (2.0 * params.variance);
    if nll.is_nan() { f64::INFINITY } else { nll }
}

/// Maximum-likelihood mean and variance of a normal sample.
///
/// Closed form: the sample mean and the biased (1/n) variance.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StatsError::InsufficientData`] | fewer than 2 observations |
/// | [`StatsError::NonFiniteData`] | any element is NaN or infinite |
pub fn estimate_normal_params(sample: &[f64]) -> Result<NormalParams, StatsError> {
    if sample.len() < 2 {
        return Err(StatsError::InsufficientData {
            n: sample.len(),
            min: 2,
        });
    }
    if sample.iter().any(|x| !x.is_finite()) {
        return Err(StatsError::NonFiniteData);
    }
    let n = sample.len() as f64;
    let mean = sample.iter().sum::<f64>() / n;
    let variance = sample.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
    Ok(NormalParams { mean, variance })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn nll_standard_normal_at_zero() {
        let nll = negative_log_likelihood(&[0.0, 0.0], &NormalParams::new(0.0, 1.0));
        assert_relative_eq!(nll, (2.0 * PI).ln(), epsilon = 1e-12);
    }

    #[test]
    fn nll_matches_hand_computation() {
        // data [1.2, 2.3, 3.4], mean 2.3, sd 0.88
        let data = [1.2, 2.3, 3.4];
        let params = NormalParams::new(2.3, 0.88 * 0.88);
        let nll = negative_log_likelihood(&data, &params);
        let expected: f64 = data
            .iter()
            .map(|x| {
                0.5 * (2.0 * PI * params.variance).ln()
                    + (x - 2.3) * (x - 2.3) / (2.0 * params.variance)
            })
            .sum();
        assert_relative_eq!(nll, expected, epsilon = 1e-12);
        assert_relative_eq!(nll, 3.9358, epsilon = 1e-3);
    }

    #[test]
    fn nll_rejects_non_positive_variance() {
        assert_eq!(
            negative_log_likelihood(&[1.0, 2.0], &NormalParams::new(0.0, 0.0)),
            f64::INFINITY
        );
        assert_eq!(
            negative_log_likelihood(&[1.0, 2.0], &NormalParams::new(0.0, -1.0)),
            f64::INFINITY
        );
        assert_eq!(
            negative_log_likelihood(&[1.0], &NormalParams::new(0.0, f64::NAN)),
            f64::INFINITY
        );
    }

    #[test]
    fn nll_minimised_at_mle() {
        let data = [0.5, 1.5, 2.0, 3.5, 2.5];
        let mle = estimate_normal_params(&data).unwrap();
        let at_mle = negative_log_likelihood(&data, &mle);
        for (dm, dv) in [(0.1, 0.0), (-0.1, 0.0), (0.0, 0.2), (0.0, -0.2)] {
            let other = NormalParams::new(mle.mean + dm, mle.variance + dv);
            assert!(negative_log_likelihood(&data, &other) > at_mle);
        }
    }

    #[test]
    fn estimate_params_closed_form() {
        let p = estimate_normal_params(&[1.2, 2.3, 3.4]).unwrap();
        assert_relative_eq!(p.mean, 2.3, epsilon = 1e-12);
        assert_relative_eq!(p.sd(), 0.898146, epsilon = 1e-6);
    }

    #[test]
    fn estimate_params_insufficient() {
        assert_eq!(
            estimate_normal_params(&[]),
            Err(StatsError::InsufficientData { n: 0, min: 2 })
        );
        assert_eq!(
            estimate_normal_params(&[1.0]),
            Err(StatsError::InsufficientData { n: 1, min: 2 })
        );
    }

    #[test]
    fn estimate_params_non_finite() {
        assert_eq!(
            estimate_normal_params(&[1.0, f64::NAN]),
            Err(StatsError::NonFiniteData)
        );
    }
}
