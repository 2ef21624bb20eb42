//! Forecast prediction intervals.

use condor_smooth::{Interval, calculate_prediction_region};

use crate::error::ArimaxError;
use crate::fit::ArimaxFit;

/// Prediction band around `points` (the output of
/// [`arimax_forecast`](crate::arimax_forecast)).
///
/// The variance at step `h` is the model's forecast-error variance,
/// floored at `smoothing_variance` (the residual variance of the smoothing
/// stage) rather than summed with it. The band never narrows with the
/// horizon.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`ArimaxError::InvalidConfig`] | negative or non-finite `smoothing_variance` |
/// | [`ArimaxError::Smooth`] | confidence outside `(0, 1)` or invalid step variance |
pub fn calculate_forecast_prediction_interval(
    fit: &ArimaxFit,
    points: &[f64],
    confidence: f64,
    smoothing_variance: f64,
) -> Result<Vec<Interval>, ArimaxError> {
    if !smoothing_variance.is_finite() || smoothing_variance < 0.0 {
        return Err(ArimaxError::InvalidConfig {
            reason: format!("smoothing variance must be non-negative, got {smoothing_variance}"),
        });
    }
    let variances: Vec<f64> = fit
        .forecast_variances(points.len())
        .into_iter()
        .map(|v| v.max(smoothing_variance))
        .collect();
    Ok(calculate_prediction_region(points, &variances, confidence)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ModelData;
    use crate::forecast::arimax_forecast;
    use crate::spec::ArimaxSpec;
    use approx::assert_abs_diff_eq;
    use condor_stats::InformationCriterion;

    fn fitted() -> ArimaxFit {
        let y: Vec<f64> = (0..120)
            .map(|t| 20.0 + ((t * 37) % 19) as f64 * 0.3 + (t as f64 / 4.0).sin())
            .collect();
        let data = ModelData::univariate(y).unwrap();
        ArimaxSpec::new(1, 0, 0)
            .fit(&data, InformationCriterion::Bic)
            .unwrap()
    }

    #[test]
    fn first_step_matches_sigma() {
        let fit = fitted();
        let points = arimax_forecast(&fit, 15, &[]).unwrap();
        let bands = calculate_forecast_prediction_interval(&fit, &points, 0.95, 0.0).unwrap();
        assert_eq!(bands.len(), 15);
        assert_abs_diff_eq!(
            bands[0].width(),
            2.0 * 1.959964 * fit.sigma2().sqrt(),
            epsilon = 1e-4
        );
        for w in bands.windows(2) {
            assert!(w[1].width() >= w[0].width());
        }
    }

    #[test]
    fn smoothing_variance_is_a_floor() {
        let fit = fitted();
        let sigma2 = fit.sigma2();
        let points = arimax_forecast(&fit, 5, &[]).unwrap();
        let model_only = calculate_forecast_prediction_interval(&fit, &points, 0.9, 0.0).unwrap();
        let below = calculate_forecast_prediction_interval(&fit, &points, 0.9, 0.5 * sigma2).unwrap();
        let above = calculate_forecast_prediction_interval(&fit, &points, 0.9, 100.0 * sigma2).unwrap();

        assert_abs_diff_eq!(below[0].width(), model_only[0].width(), epsilon = 1e-9);
        assert!(above[0].width() > model_only[0].width());
        assert_abs_diff_eq!(
            above[0].width(),
            2.0 * 1.644854 * (100.0 * sigma2).sqrt(),
            epsilon = 1e-4
        );
        assert!(calculate_forecast_prediction_interval(&fit, &points, 0.9, -1.0).is_err());
    }
}
