//! Robust locally weighted linear regression (Cleveland 1979).
//!
//! Points are indexed by position, so the series is assumed evenly spaced.
//! Each fitted value comes from a weighted straight-line fit over the
//! `ceil(fraction * n)` nearest points with tricube distance weights.
//! Robustifying passes then down-weight points with large residuals using
//! bisquare weights on residuals scaled by six times their median absolute
//! value.

use condor_stats::median;
use tracing::trace;

use crate::error::SmoothError;

/// Smallest window a local line can be fitted on.
const MIN_WINDOW: usize = 3;

/// Configuration for [`smooth_lowess`].
///
/// # Example
///
/// ```
/// use condor_smooth::LowessConfig;
///
/// let config = LowessConfig::new(0.5).with_iterations(1);
/// assert!(config.validate().is_ok());
/// assert_eq!(LowessConfig::default().fraction(), 0.3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LowessConfig {
    /// Share of the series in each local window, in `(0, 1]`.
    fraction: f64,
    /// Number of robustifying passes.
    iterations: usize,
}

impl LowessConfig {
    /// Creates a configuration with the given window fraction.
    ///
    /// Default `iterations = 2`.
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction,
            iterations: 2,
        }
    }

    /// Sets the number of robustifying passes.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Returns the window fraction.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Returns the number of robustifying passes.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Window size for a series of `n` points.
    pub fn window(&self, n: usize) -> usize {
        ((self.fraction * n as f64).ceil() as usize).min(n)
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), SmoothError> {
        if !(self.fraction > 0.0 && self.fraction <= 1.0) {
            return Err(SmoothError::InvalidConfig {
                reason: format!("LOWESS fraction must lie in (0, 1], got {}", self.fraction),
            });
        }
        Ok(())
    }
}

impl Default for LowessConfig {
    fn default() -> Self {
        Self::new(0.3)
    }
}

/// Smooths `series` with robust LOWESS.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SmoothError::InvalidConfig`] | fraction outside `(0, 1]` |
/// | [`SmoothError::InsufficientData`] | the local window holds fewer than 3 points |
/// | [`SmoothError::Stats`] | non-finite values |
#[tracing::instrument(skip(series, config), fields(n = series.len()))]
pub fn smooth_lowess(series: &[f64], config: &LowessConfig) -> Result<Vec<f64>, SmoothError> {
    config.validate()?;
    if series.iter().any(|v| !v.is_finite()) {
        return Err(condor_stats::StatsError::NonFiniteData.into());
    }
    let n = series.len();
    let window = config.window(n);
    if window < MIN_WINDOW {
        return Err(SmoothError::InsufficientData {
            n: window,
            min: MIN_WINDOW,
        });
    }

    let mut robustness = vec![1.0; n];
    let mut fitted = local_fits(series, window, &robustness);

    for pass in 0..config.iterations() {
        let residuals: Vec<f64> = series
            .iter()
            .zip(&fitted)
            .map(|(y, f)| y - f)
            .collect();
        let mut abs_res: Vec<f64> = residuals.iter().map(|e| e.abs()).collect();
        abs_res.sort_by(|a, b| a.total_cmp(b));
        let magnitude = series.iter().fold(1.0_f64, |m, v| m.max(v.abs()));
        if abs_res.last().is_none_or(|max| *max <= f64::EPSILON * magnitude) {
            break;
        }
        let scale = (6.0 * median(&abs_res)).max(f64::MIN_POSITIVE);
        trace!(pass, scale, "robustifying pass");
        for (w, e) in robustness.iter_mut().zip(&residuals) {
            *w = bisquare(e / scale);
        }
        fitted = local_fits(series, window, &robustness);
    }

    Ok(fitted)
}

/// Population variance of `series - smoothed`.
pub fn residual_variance(series: &[f64], smoothed: &[f64]) -> Result<f64, SmoothError> {
    if series.len() != smoothed.len() {
        return Err(SmoothError::LengthMismatch {
            expected: series.len(),
            got: smoothed.len(),
        });
    }
    if series.is_empty() {
        return Err(SmoothError::InsufficientData { n: 0, min: 1 });
    }
    let resid: Vec<f64> = series.iter().zip(smoothed).map(|(y, s)| y - s).collect();
    let n = resid.len() as f64;
    let m = resid.iter().sum::<f64>() / n;
    Ok(resid.iter().map(|e| (e - m) * (e - m)).sum::<f64>() / n)
}

fn local_fits(y: &[f64], window: usize, robustness: &[f64]) -> Vec<f64> {
    let n = y.len();
    let mut out = Vec::with_capacity(n);
    let mut lo = 0;
    for i in 0..n {
        // Slide the window right while that brings it closer to i.
        while lo + window < n && (lo + window - i) < (i - lo) {
            lo += 1;
        }
        let hi = lo + window - 1;
        let h = (i - lo).max(hi - i) as f64;
        out.push(weighted_line_at(y, lo, hi, i, h, robustness));
    }
    out
}

fn weighted_line_at(y: &[f64], lo: usize, hi: usize, i: usize, h: f64, rob: &[f64]) -> f64 {
    let xi = i as f64;
    let mut sw = 0.0;
    let mut sx = 0.0;
    let mut sy = 0.0;
    let mut weights = Vec::with_capacity(hi - lo + 1);
    for j in lo..=hi {
        let d = (j as f64 - xi).abs() / h;
        let w = tricube(d) * rob[j];
        weights.push(w);
        sw += w;
        sx += w * j as f64;
        sy += w * y[j];
    }
    if sw <= 0.0 {
        return y[i];
    }
    let mx = sx / sw;
    let my = sy / sw;
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (off, w) in weights.iter().enumerate() {
        let dx = (lo + off) as f64 - mx;
        sxx += w * dx * dx;
        sxy += w * dx * (y[lo + off] - my);
    }
    if sxx <= 1e-12 * sw {
        return my;
    }
    my + sxy / sxx * (xi - mx)
}

fn tricube(d: f64) -> f64 {
    if d >= 1.0 {
        0.0
    } else {
        let t = 1.0 - d * d * d;
        t * t * t
    }
}

fn bisquare(u: f64) -> f64 {
    if u.abs() >= 1.0 {
        0.0
    } else {
        let t = 1.0 - u * u;
        t * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    #[test]
    fn reproduces_straight_line() {
        let y: Vec<f64> = (0..50).map(|t| 3.0 - 0.25 * t as f64).collect();
        let s = smooth_lowess(&y, &LowessConfig::default()).unwrap();
        for (a, b) in s.iter().zip(&y) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-9);
        }
    }

    #[test]
    fn reduces_noise() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let truth: Vec<f64> = (0..200).map(|t| (t as f64 / 30.0).sin() * 5.0).collect();
        let y: Vec<f64> = truth.iter().map(|v| v + normal.sample(&mut rng)).collect();
        let s = smooth_lowess(&y, &LowessConfig::new(0.15)).unwrap();
        let err_raw: f64 = y.iter().zip(&truth).map(|(a, b)| (a - b).powi(2)).sum();
        let err_s: f64 = s.iter().zip(&truth).map(|(a, b)| (a - b).powi(2)).sum();
        assert!(err_s < 0.5 * err_raw, "raw {err_raw}, smoothed {err_s}");
    }

    #[test]
    fn robust_to_single_outlier() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(8);
        let normal = Normal::new(0.0, 1.0).unwrap();
        let mut y: Vec<f64> = (0..200)
            .map(|t| 0.1 * t as f64 + normal.sample(&mut rng))
            .collect();
        y[100] += 100.0;
        let robust = smooth_lowess(&y, &LowessConfig::default()).unwrap();
        let plain = smooth_lowess(&y, &LowessConfig::default().with_iterations(0)).unwrap();
        assert!((robust[100] - 10.0).abs() < 1.0, "robust[100] = {}", robust[100]);
        assert!((plain[100] - 10.0).abs() > (robust[100] - 10.0).abs());
    }

    #[test]
    fn deterministic() {
        let y: Vec<f64> = (0..60).map(|t| ((t * 7919) % 13) as f64).collect();
        let cfg = LowessConfig::default();
        assert_eq!(smooth_lowess(&y, &cfg).unwrap(), smooth_lowess(&y, &cfg).unwrap());
    }

    #[test]
    fn invalid_fraction() {
        for f in [0.0, 1.5, f64::NAN] {
            assert!(matches!(
                smooth_lowess(&[1.0; 10], &LowessConfig::new(f)),
                Err(SmoothError::InvalidConfig { .. })
            ));
        }
    }

    #[test]
    fn window_too_small() {
        let err = smooth_lowess(&[1.0, 2.0, 3.0, 4.0], &LowessConfig::new(0.3)).unwrap_err();
        assert_eq!(err, SmoothError::InsufficientData { n: 2, min: 3 });
    }

    #[test]
    fn residual_variance_population() {
        let v = residual_variance(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0]).unwrap();
        assert_abs_diff_eq!(v, 2.0 / 3.0, epsilon = 1e-12);
    }
}
