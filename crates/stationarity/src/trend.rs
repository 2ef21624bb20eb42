//! Polynomial trends in the time index.
//!
//! Time is scaled to `u = t / (len - 1)` so that columns of the design stay
//! well conditioned; the same scaling extrapolates past the sample.

use condor_stats::{InformationCriterion, StatsError, least_squares, polynomial_design};
use tracing::debug;

use crate::error::StationarityError;

/// Scores within this distance are treated as equal.
const DEGREE_TIE_TOL: f64 = 1e-9;

/// Residual sum of squares, relative to the sum of squares of the series,
/// below which a trend is treated as an exact fit.
const EXACT_FIT_TOL: f64 = 1e-20;

/// Selects the polynomial trend degree in `0..=max_degree` minimising
/// `criterion` on the trend-fit residuals; ties go to the lower degree.
///
/// Degrees whose design would leave no residual degrees of freedom are not
/// considered.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StationarityError::InsufficientData`] | fewer than 3 values |
/// | [`StationarityError::Stats`] | non-finite values |
pub fn determine_optimal_degree(
    series: &[f64],
    max_degree: usize,
    criterion: InformationCriterion,
) -> Result<usize, StationarityError> {
    let n = series.len();
    if n < 3 {
        return Err(StationarityError::InsufficientData { n, min: 3 });
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(StatsError::NonFiniteData.into());
    }

    let energy: f64 = series.iter().map(|v| v * v).sum();
    let mut best: Option<(usize, f64)> = None;
    for degree in 0..=max_degree {
        // Coefficients plus the residual variance.
        let k = degree + 2;
        if n <= k {
            break;
        }
        let fit = match least_squares(&polynomial_design(n, degree), series) {
            Ok(fit) => fit,
            Err(StatsError::Singular { .. }) => break,
            Err(e) => return Err(e.into()),
        };
        // Exact fits score -inf so that every higher degree ties with them.
        let log_lik = if fit.rss() <= EXACT_FIT_TOL * energy {
            f64::INFINITY
        } else {
            fit.log_likelihood()
        };
        let score = criterion.score(log_lik, k, n);
        debug!(degree, score, "trend degree candidate");
        if best.is_none_or(|(_, b)| score < b - DEGREE_TIE_TOL) {
            best = Some((degree, score));
        }
    }
    Ok(best.map_or(0, |(d, _)| d))
}

/// Least-squares polynomial trend coefficients (ascending powers of the
/// scaled time index).
pub fn fit_trend(series: &[f64], degree: usize) -> Result<Vec<f64>, StationarityError> {
    let n = series.len();
    if n <= degree {
        return Err(StationarityError::InsufficientData { n, min: degree + 1 });
    }
    let fit = least_squares(&polynomial_design(n, degree), series)?;
    Ok(fit.coefficients().to_vec())
}

/// Evaluates a trend fitted on `len` points at index `t`; `t >= len`
/// extrapolates.
pub fn trend_value(coefficients: &[f64], len: usize, t: usize) -> f64 {
    let scale = if len > 1 { (len - 1) as f64 } else { 1.0 };
    let u = t as f64 / scale;
    coefficients.iter().rev().fold(0.0, |acc, c| acc * u + c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn noisy(f: impl Fn(f64) -> f64, n: usize, sd: f64, seed: u64) -> Vec<f64> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, sd).unwrap();
        (0..n)
            .map(|t| f(t as f64) + normal.sample(&mut rng))
            .collect()
    }

    #[test]
    fn picks_linear_for_linear_trend() {
        let data = noisy(|t| 5.0 + 0.2 * t, 150, 1.0, 1);
        let deg = determine_optimal_degree(&data, 4, InformationCriterion::Bic).unwrap();
        assert_eq!(deg, 1);
    }

    #[test]
    fn picks_zero_for_noise() {
        let data = noisy(|_| 3.0, 150, 1.0, 2);
        let deg = determine_optimal_degree(&data, 4, InformationCriterion::Bic).unwrap();
        assert_eq!(deg, 0);
    }

    #[test]
    fn exact_fits_tie_to_lower_degree() {
        // A perfect line is fitted exactly by degree 1 and every higher degree.
        let data: Vec<f64> = (0..30).map(|t| 1.0 + 2.0 * t as f64).collect();
        let deg = determine_optimal_degree(&data, 3, InformationCriterion::Aic).unwrap();
        assert_eq!(deg, 1);
    }

    #[test]
    fn trend_value_reproduces_fit() {
        let data: Vec<f64> = (0..11).map(|t| 2.0 - 0.5 * t as f64).collect();
        let coeffs = fit_trend(&data, 1).unwrap();
        for (t, v) in data.iter().enumerate() {
            assert_abs_diff_eq!(trend_value(&coeffs, data.len(), t), v, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(trend_value(&coeffs, data.len(), 12), -4.0, epsilon = 1e-9);
    }

    #[test]
    fn too_short() {
        assert!(matches!(
            determine_optimal_degree(&[1.0, 2.0], 2, InformationCriterion::Bic),
            Err(StationarityError::InsufficientData { n: 2, min: 3 })
        ));
    }
}
