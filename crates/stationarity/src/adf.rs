//! Augmented Dickey-Fuller unit-root test.
//!
//! ```text
//! dy_t = alpha [+ delta * t] + gamma * y_{t-1} + sum_{i=1..k} beta_i * dy_{t-i} + e_t
//! ```
//!
//! The lag order `k` is chosen by AIC over `0..=max_lag` on a common
//! estimation sample, then the regression is re-estimated on the longest
//! sample the chosen `k` allows. The t-statistic of `gamma` is mapped to a
//! p-value with MacKinnon's (1994) response surface for the deterministic
//! terms in the regression.

use condor_stats::{InformationCriterion, StatsError, least_squares, normal_cdf};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StationarityConfig;
use crate::error::StationarityError;

/// Fewest observations the test regression accepts.
pub const MIN_OBSERVATIONS: usize = 8;

/// Residual sum of squares, relative to the sum of squared differences,
/// below which the regression is treated as an exact fit.
const PERFECT_FIT_TOL: f64 = 1e-20;

/// Relative spread below which a series is treated as deterministic.
const CONSTANT_TOL: f64 = 1e-12;

/// MacKinnon (1994) response surface for one regressor.
struct ResponseSurface {
    tau_max: f64,
    tau_min: f64,
    tau_star: f64,
    small_p: [f64; 3],
    large_p: [f64; 4],
}

const CONSTANT_SURFACE: ResponseSurface = ResponseSurface {
    tau_max: 2.74,
    tau_min: -18.83,
    tau_star: -1.61,
    small_p: [2.1659, 1.4412, 0.038269],
    large_p: [1.7339, 0.93202, -0.12745, -0.010368],
};

const TREND_SURFACE: ResponseSurface = ResponseSurface {
    tau_max: 0.7,
    tau_min: -16.18,
    tau_star: -2.89,
    small_p: [3.2512, 1.6047, 0.049588],
    large_p: [2.5261, 0.61654, -0.37956, -0.060285],
};

/// Deterministic terms of the test regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deterministic {
    /// Intercept only.
    #[default]
    Constant,
    /// Intercept and linear time trend.
    ConstantTrend,
}

impl Deterministic {
    fn columns(self) -> usize {
        match self {
            Self::Constant => 1,
            Self::ConstantTrend => 2,
        }
    }

    fn surface(self) -> &'static ResponseSurface {
        match self {
            Self::Constant => &CONSTANT_SURFACE,
            Self::ConstantTrend => &TREND_SURFACE,
        }
    }

    /// Whether `series` is exactly the deterministic part (a constant, or
    /// a straight line).
    fn is_exact(self, series: &[f64]) -> bool {
        let n = series.len();
        let first = series[0];
        let slope = match self {
            Self::Constant => 0.0,
            Self::ConstantTrend => (series[n - 1] - first) / (n - 1) as f64,
        };
        let scale = series.iter().fold(1.0_f64, |m, v| m.max(v.abs()));
        series
            .iter()
            .enumerate()
            .all(|(t, v)| (v - first - slope * t as f64).abs() <= CONSTANT_TOL * scale)
    }
}

/// Outcome of [`test_stationarity`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationarityTest {
    /// t-statistic of the lagged level coefficient.
    pub statistic: f64,
    /// Approximate p-value of the unit-root null.
    pub p_value: f64,
    /// Number of lagged differences in the chosen regression.
    pub lags: usize,
    /// Observations used by the final regression.
    pub n_obs: usize,
    /// `p_value < significance`.
    pub is_stationary: bool,
}

/// Runs the ADF test with a constant on `series`.
///
/// A series with zero variance is reported stationary with statistic
/// `-inf` and p-value 0.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StationarityError::InsufficientData`] | fewer than [`MIN_OBSERVATIONS`] values |
/// | [`StationarityError::Stats`] | non-finite values, or no lag order yields a solvable regression |
/// | [`StationarityError::InvalidConfig`] | configuration fails validation |
#[tracing::instrument(skip(series, config), fields(n = series.len()))]
pub fn test_stationarity(
    series: &[f64],
    config: &StationarityConfig,
) -> Result<StationarityTest, StationarityError> {
    adf_test(series, config, Deterministic::Constant)
}

/// Runs the ADF test with a constant and a linear time trend, so that
/// rejecting the unit root means `series` is stationary around a line.
///
/// An exactly linear series is reported stationary with statistic `-inf`.
///
/// # Errors
///
/// As [`test_stationarity`].
#[tracing::instrument(skip(series, config), fields(n = series.len()))]
pub fn test_trend_stationarity(
    series: &[f64],
    config: &StationarityConfig,
) -> Result<StationarityTest, StationarityError> {
    adf_test(series, config, Deterministic::ConstantTrend)
}

fn adf_test(
    series: &[f64],
    config: &StationarityConfig,
    deterministic: Deterministic,
) -> Result<StationarityTest, StationarityError> {
    config.validate()?;
    let n = series.len();
    if n < MIN_OBSERVATIONS {
        return Err(StationarityError::InsufficientData {
            n,
            min: MIN_OBSERVATIONS,
        });
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(StatsError::NonFiniteData.into());
    }

    if deterministic.is_exact(series) {
        debug!(?deterministic, "deterministic series reported stationary");
        return Ok(StationarityTest {
            statistic: f64::NEG_INFINITY,
            p_value: 0.0,
            lags: 0,
            n_obs: n - 1,
            is_stationary: true,
        });
    }

    let dy: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let max_lag = lag_bound(n, config.max_lag());
    let det = deterministic.columns();

    // Lag selection on the common sample starting at `max_lag`.
    let mut best: Option<(usize, f64)> = None;
    let mut last_err = None;
    for k in 0..=max_lag {
        match adf_regression(series, &dy, k, max_lag, deterministic) {
            Ok(fit) => {
                let aic =
                    InformationCriterion::Aic.score(fit.log_likelihood(), k + det + 1, fit.n_obs());
                if best.is_none_or(|(_, b)| aic < b) {
                    best = Some((k, aic));
                }
            }
            Err(e) => last_err = Some(e),
        }
    }
    let Some((lags, _)) = best else {
        return Err(last_err.unwrap_or(StatsError::EmptyData).into());
    };

    let fit = adf_regression(series, &dy, lags, lags, deterministic)?;
    let gamma = fit.coefficients()[det];
    let dy_ss: f64 = dy[lags..].iter().map(|v| v * v).sum();
    let statistic = match fit.std_error(det) {
        Some(se) if fit.rss() > PERFECT_FIT_TOL * dy_ss && se.is_finite() => gamma / se,
        // Perfect fit: the sign of gamma decides.
        _ if gamma < -1e-8 => f64::NEG_INFINITY,
        _ => f64::INFINITY,
    };
    let p_value = mackinnon_p_value(statistic, deterministic);

    debug!(statistic, p_value, lags, ?deterministic, "ADF test");
    Ok(StationarityTest {
        statistic,
        p_value,
        lags,
        n_obs: fit.n_obs(),
        is_stationary: p_value < config.significance(),
    })
}

/// Schwert's rule `floor(12 * (n / 100)^(1/4))`, capped so the regression
/// keeps residual degrees of freedom.
fn lag_bound(n: usize, fixed: Option<usize>) -> usize {
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).floor() as usize;
    let cap = n.saturating_sub(6) / 2;
    fixed.unwrap_or(schwert).min(cap)
}

/// Fits the ADF regression with `k` lagged differences on rows
/// `start..dy.len()` (indices into `dy`).
fn adf_regression(
    y: &[f64],
    dy: &[f64],
    k: usize,
    start: usize,
    deterministic: Deterministic,
) -> Result<condor_stats::LeastSquares, StatsError> {
    let rows = dy.len().saturating_sub(start);
    let det = deterministic.columns();
    let design = Array2::from_shape_fn((rows, k + det + 1), |(r, c)| {
        let t = start + r;
        match c {
            0 => 1.0,
            c if c < det => t as f64,
            c if c == det => y[t],
            lag => dy[t - (lag - det)],
        }
    });
    least_squares(&design, &dy[start..])
}

/// MacKinnon (1994) approximate p-value of an ADF statistic whose
/// regression carries `deterministic` terms.
pub fn mackinnon_p_value(statistic: f64, deterministic: Deterministic) -> f64 {
    let surface = deterministic.surface();
    if statistic.is_nan() || statistic > surface.tau_max {
        return 1.0;
    }
    if statistic < surface.tau_min {
        return 0.0;
    }
    let coeffs: &[f64] = if statistic <= surface.tau_star {
        &surface.small_p
    } else {
        &surface.large_p
    };
    let z = coeffs.iter().rev().fold(0.0, |acc, c| acc * statistic + c);
    normal_cdf(z)
}
