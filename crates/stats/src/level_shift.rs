//! Level-shift (structural break in mean) detection.
//!
//! Binary segmentation driven by a CUSUM statistic. Each candidate split is
//! scored by
//!
//! ```text
//! T = max_k |S_k| / sqrt(n * lrv),   S_k = sum_{i<k} (x_i - mean(x))
//! ```
//!
//! where `lrv` is an AR(1)-prewhitened long-run variance of the residuals
//! about the two segment means. Under the no-shift null `T` converges to the
//! supremum of a Brownian bridge, so the p-value comes from the Kolmogorov
//! distribution.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::descriptive::mean;
use crate::distribution::kolmogorov_sf;
use crate::error::StatsError;

/// Clamp for the prewhitening AR(1) coefficient.
const MAX_PREWHITEN_RHO: f64 = 0.97;

/// Configuration for [`detect_level_shifts`].
#[derive(Debug, Clone, PartialEq)]
pub struct LevelShiftConfig {
    significance: f64,
    min_segment: usize,
}

impl LevelShiftConfig {
    /// Creates a configuration with the given significance level.
    ///
    /// Default minimum segment length is 10 observations.
    pub fn new(significance: f64) -> Self {
        Self {
            significance,
            min_segment: 10,
        }
    }

    /// Sets the minimum number of observations on each side of a shift.
    pub fn with_min_segment(mut self, min_segment: usize) -> Self {
        self.min_segment = min_segment;
        self
    }

    /// Significance level a split must beat.
    pub fn significance(&self) -> f64 {
        self.significance
    }

    /// Minimum segment length.
    pub fn min_segment(&self) -> usize {
        self.min_segment
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), StatsError> {
        if !(self.significance > 0.0 && self.significance < 1.0) {
            return Err(StatsError::InvalidConfig {
                reason: format!(
                    "level shift significance must lie in (0, 1), got {}",
                    self.significance
                ),
            });
        }
        if self.min_segment < 2 {
            return Err(StatsError::InvalidConfig {
                reason: format!("min_segment must be >= 2, got {}", self.min_segment),
            });
        }
        Ok(())
    }
}

impl Default for LevelShiftConfig {
    fn default() -> Self {
        Self::new(0.01)
    }
}

/// A detected shift in the series mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelShift {
    /// Index of the first observation of the new regime.
    pub index: usize,
    /// Mean after the shift minus mean before it (within the tested segment).
    pub magnitude: f64,
    /// Approximate p-value of the CUSUM statistic.
    pub p_value: f64,
}

/// Scans `series` for statistically significant mean shifts.
///
/// Returns shifts ordered by index. A series shorter than twice the minimum
/// segment length, or one with zero variance, has no detectable shifts.
/// The series itself is never modified.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StatsError::EmptyData`] | `series` is empty |
/// | [`StatsError::NonFiniteData`] | NaN or infinite values |
/// | [`StatsError::InvalidConfig`] | configuration fails validation |
pub fn detect_level_shifts(
    series: &[f64],
    config: &LevelShiftConfig,
) -> Result<Vec<LevelShift>, StatsError> {
    config.validate()?;
    if series.is_empty() {
        return Err(StatsError::EmptyData);
    }
    if series.iter().any(|x| !x.is_finite()) {
        return Err(StatsError::NonFiniteData);
    }

    let min_seg = config.min_segment();
    let mut shifts = Vec::new();
    let mut stack = vec![(0usize, series.len())];

    while let Some((start, end)) = stack.pop() {
        let segment = &series[start..end];
        let Some(split) = best_split(segment, min_seg) else {
            continue;
        };
        trace!(
            start,
            end,
            index = start + split.index,
            p_value = split.p_value,
            "level shift candidate"
        );
        if split.p_value < config.significance() {
            shifts.push(LevelShift {
                index: start + split.index,
                magnitude: split.magnitude,
                p_value: split.p_value,
            });
            stack.push((start, start + split.index));
            stack.push((start + split.index, end));
        }
    }

    shifts.sort_by_key(|s| s.index);
    Ok(shifts)
}

/// Most likely single split of `x`, or `None` if the segment is too short
/// or flat.
fn best_split(x: &[f64], min_seg: usize) -> Option<LevelShift> {
    let n = x.len();
    if n < 2 * min_seg {
        return None;
    }
    let m = mean(x);

    let mut cusum = 0.0;
    let mut best_k = 0;
    let mut best_abs = -1.0;
    for (i, &xi) in x.iter().enumerate().take(n - min_seg) {
        cusum += xi - m;
        let k = i + 1;
        if k >= min_seg && cusum.abs() > best_abs {
            best_abs = cusum.abs();
            best_k = k;
        }
    }
    if best_k == 0 {
        return None;
    }

    let left_mean = mean(&x[..best_k]);
    let right_mean = mean(&x[best_k..]);
    let resid: Vec<f64> = x
        .iter()
        .enumerate()
        .map(|(i, &v)| if i < best_k { v - left_mean } else { v - right_mean })
        .collect();
    let lrv = prewhitened_long_run_variance(&resid);
    if !(lrv > 0.0) {
        return None;
    }

    let stat = best_abs / (n as f64 * lrv).sqrt();
    Some(LevelShift {
        index: best_k,
        magnitude: right_mean - left_mean,
        p_value: kolmogorov_sf(stat),
    })
}

/// Long-run variance `sigma_u^2 / (1 - rho)^2` after AR(1) prewhitening of
/// mean-zero residuals.
fn prewhitened_long_run_variance(resid: &[f64]) -> f64 {
    let n = resid.len();
    if n < 3 {
        return 0.0;
    }
    let gamma0: f64 = resid.iter().map(|e| e * e).sum::<f64>();
    if gamma0 <= 0.0 {
        return 0.0;
    }
    let gamma1: f64 = resid[1..]
        .iter()
        .zip(resid.iter())
        .map(|(a, b)| a * b)
        .sum::<f64>();
    let rho = (gamma1 / gamma0).clamp(-MAX_PREWHITEN_RHO, MAX_PREWHITEN_RHO);
    let innovations: f64 = resid[1..]
        .iter()
        .zip(resid.iter())
        .map(|(a, b)| {
            let u = a - rho * b;
            u * u
        })
        .sum::<f64>();
    let sigma_u2 = innovations / (n - 1) as f64;
    sigma_u2 / ((1.0 - rho) * (1.0 - rho))
}
