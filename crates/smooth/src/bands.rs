//! Smoothed trend with confidence and prediction bands.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SmoothError;
use crate::lowess::{LowessConfig, residual_variance, smooth_lowess};
use crate::region::{Interval, calculate_confidence_region, smoothing_prediction_region};

/// Output of [`trend_bands`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBands {
    /// LOWESS curve.
    pub smoothed: Vec<f64>,
    /// Population variance of the residuals about the curve.
    pub residual_variance: f64,
    /// Band for the curve itself.
    pub confidence: Vec<Interval>,
    /// Band for a new observation at each point.
    pub prediction: Vec<Interval>,
}

/// Smooths `values` and attaches confidence and prediction bands at
/// `confidence`.
pub fn trend_bands(
    values: &[f64],
    config: &LowessConfig,
    confidence: f64,
) -> Result<TrendBands, SmoothError> {
    let smoothed = smooth_lowess(values, config)?;
    let variance = residual_variance(values, &smoothed)?;
    let conf = calculate_confidence_region(&smoothed, variance, confidence)?;
    let pred = smoothing_prediction_region(&smoothed, variance, values.len(), confidence)?;
    info!(n = values.len(), residual_variance = variance, "trend bands");
    Ok(TrendBands {
        smoothed,
        residual_variance: variance,
        confidence: conf,
        prediction: pred,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_nest() {
        let values: Vec<f64> = (0..60)
            .map(|t| 50.0 + (t as f64 / 5.0).sin() * 3.0 + ((t * 37) % 11) as f64 * 0.1)
            .collect();
        let tb = trend_bands(&values, &LowessConfig::default(), 0.95).unwrap();
        assert_eq!(tb.smoothed.len(), 60);
        assert!(tb.residual_variance > 0.0);
        for (c, p) in tb.confidence.iter().zip(&tb.prediction) {
            assert!(p.lower < c.lower && c.upper < p.upper);
        }
    }
}
