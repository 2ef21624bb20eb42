//! Confidence and prediction regions.

use condor_stats::two_sided_z;
use serde::{Deserialize, Serialize};

use crate::error::SmoothError;

/// A closed band `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

impl Interval {
    /// Band `center ± half_width`.
    pub fn around(center: f64, half_width: f64) -> Self {
        Self {
            lower: center - half_width,
            upper: center + half_width,
        }
    }

    /// `upper - lower`.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `x` lies within the band.
    pub fn contains(&self, x: f64) -> bool {
        self.lower <= x && x <= self.upper
    }
}

fn check_variance(index: usize, value: f64) -> Result<(), SmoothError> {
    if !value.is_finite() || value < 0.0 {
        return Err(SmoothError::InvalidVariance { index, value });
    }
    Ok(())
}

/// Per-point band `smoothed ± z * sigma` around a smoothed curve.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SmoothError::InvalidVariance`] | negative or non-finite variance |
/// | [`SmoothError::Stats`] | confidence outside `(0, 1)` |
pub fn calculate_confidence_region(
    smoothed: &[f64],
    residual_variance: f64,
    confidence: f64,
) -> Result<Vec<Interval>, SmoothError> {
    check_variance(0, residual_variance)?;
    let margin = two_sided_z(confidence)? * residual_variance.sqrt();
    Ok(smoothed.iter().map(|&s| Interval::around(s, margin)).collect())
}

/// Per-point prediction band `smoothed ± z * sigma * sqrt(1 + 1/n)` for a
/// new observation, where `n` is the number of residuals behind `sigma`.
///
/// # Errors
///
/// As [`calculate_confidence_region`], plus
/// [`SmoothError::InsufficientData`] when `n == 0`.
pub fn smoothing_prediction_region(
    smoothed: &[f64],
    residual_variance: f64,
    n: usize,
    confidence: f64,
) -> Result<Vec<Interval>, SmoothError> {
    if n == 0 {
        return Err(SmoothError::InsufficientData { n, min: 1 });
    }
    check_variance(0, residual_variance)?;
    let inflation = (1.0 + 1.0 / n as f64).sqrt();
    let margin = two_sided_z(confidence)? * residual_variance.sqrt() * inflation;
    Ok(smoothed.iter().map(|&s| Interval::around(s, margin)).collect())
}

/// Prediction band per forecast step.
///
/// The half-width at step `h` is `z * sqrt(max_{j<=h} v_j)`, so the width
/// never decreases with the horizon even if the supplied variances do.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`SmoothError::LengthMismatch`] | `step_variances.len() != points.len()` |
/// | [`SmoothError::InvalidVariance`] | negative or non-finite variance |
/// | [`SmoothError::Stats`] | confidence outside `(0, 1)` |
pub fn calculate_prediction_region(
    points: &[f64],
    step_variances: &[f64],
    confidence: f64,
) -> Result<Vec<Interval>, SmoothError> {
    if points.len() != step_variances.len() {
        return Err(SmoothError::LengthMismatch {
            expected: points.len(),
            got: step_variances.len(),
        });
    }
    let z = two_sided_z(confidence)?;
    let mut running = 0.0_f64;
    points
        .iter()
        .zip(step_variances)
        .enumerate()
        .map(|(i, (&p, &v))| {
            check_variance(i, v)?;
            running = running.max(v);
            Ok(Interval::around(p, z * running.sqrt()))
        })
        .collect()
}

/// Widens bands symmetrically in place so widths never decrease along the
/// sequence. Needed after non-linear back-transforms such as `exp`.
pub fn enforce_monotone_width(intervals: &mut [Interval]) {
    let mut min_width = 0.0_f64;
    for iv in intervals.iter_mut() {
        let w = iv.width();
        if w < min_width {
            let pad = (min_width - w) / 2.0;
            iv.lower -= pad;
            iv.upper += pad;
        }
        min_width = min_width.max(iv.width());
    }
}
