//! Distribution functions used for p-values and interval quantiles.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::StatsError;

fn standard_normal() -> Normal {
    // Parameters are constants; construction cannot fail.
    Normal::standard()
}

/// Standard normal CDF.
pub fn normal_cdf(x: f64) -> f64 {
    standard_normal().cdf(x)
}

/// Standard normal quantile (inverse CDF) at probability `p`.
///
/// # Errors
///
/// Returns [`StatsError::InvalidConfig`] unless `0 < p < 1`.
pub fn normal_quantile(p: f64) -> Result<f64, StatsError> {
    if !(p > 0.0 && p < 1.0) {
        return Err(StatsError::InvalidConfig {
            reason: format!("probability must lie in (0, 1), got {p}"),
        });
    }
    Ok(standard_normal().inverse_cdf(p))
}

/// Two-sided critical value `z_{(1 + confidence) / 2}` for a confidence
/// level such as 0.95.
///
/// # Errors
///
/// Returns [`StatsError::InvalidConfig`] unless `0 < confidence < 1`.
pub fn two_sided_z(confidence: f64) -> Result<f64, StatsError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(StatsError::InvalidConfig {
            reason: format!("confidence level must lie in (0, 1), got {confidence}"),
        });
    }
    normal_quantile(0.5 + confidence / 2.0)
}

/// Survival function of the Kolmogorov distribution, i.e.
/// `P(sup |B(t)| > x)` for a standard Brownian bridge `B`.
///
/// ```text
/// Q(x) = 2 * sum_{k>=1} (-1)^(k-1) * exp(-2 k^2 x^2)
/// ```
pub fn kolmogorov_sf(x: f64) -> f64 {
    if !x.is_finite() {
        return if x > 0.0 { 0.0 } else { 1.0 };
    }
    // Below ~0.2 the alternating series converges too slowly and Q(x) is 1
    // to double precision anyway.
    if x < 0.2 {
        return 1.0;
    }
    let mut sum = 0.0;
    for k in 1..=100 {
        let kf = k as f64;
        let term = (-2.0 * kf * kf * x * x).exp();
        if k % 2 == 1 {
            sum += term;
        } else {
            sum -= term;
        }
        if term < 1e-16 {
            break;
        }
    }
    (2.0 * sum).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn z_95() {
        assert_abs_diff_eq!(two_sided_z(0.95).unwrap(), 1.959964, epsilon = 1e-5);
    }

    #[test]
    fn z_invalid_levels() {
        assert!(two_sided_z(0.0).is_err());
        assert!(two_sided_z(1.0).is_err());
        assert!(two_sided_z(f64::NAN).is_err());
    }

    #[test]
    fn normal_cdf_symmetry() {
        assert_abs_diff_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(normal_cdf(1.3) + normal_cdf(-1.3), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn kolmogorov_known_values() {
        // Classic critical values: Q(1.3581) = 0.05, Q(1.6276) = 0.01
        assert_abs_diff_eq!(kolmogorov_sf(1.3581), 0.05, epsilon = 1e-3);
        assert_abs_diff_eq!(kolmogorov_sf(1.6276), 0.01, epsilon = 1e-3);
    }

    #[test]
    fn kolmogorov_limits() {
        assert_eq!(kolmogorov_sf(0.0), 1.0);
        assert_eq!(kolmogorov_sf(f64::INFINITY), 0.0);
        assert!(kolmogorov_sf(5.0) < 1e-15);
    }
}
