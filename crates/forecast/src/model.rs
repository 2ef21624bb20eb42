//! Single-model lifecycle: fit once, forecast, then attach intervals.

use condor_arimax::{
    ArimaxFit, ModelData, SearchConfig, arimax_forecast, auto_arimax_optimizer,
    calculate_forecast_prediction_interval,
};
use condor_smooth::{Interval, enforce_monotone_width};
use condor_stationarity::TransformedSeries;
use tracing::debug;

use crate::error::ForecastError;

/// One transformed target with its regressors and, after [`fit`](Self::fit),
/// the selected model.
///
/// Forecasts and intervals are returned in original units; the model-space
/// points of the last forecast are kept for the interval.
#[derive(Debug, Clone)]
pub struct ForecastArimax {
    target: TransformedSeries,
    exog: Vec<Vec<f64>>,
    search: SearchConfig,
    fit: Option<ArimaxFit>,
    points: Option<Vec<f64>>,
}

impl ForecastArimax {
    /// `exog` holds one aligned regressor per exogenous series, each as long
    /// as the target.
    pub fn new(target: TransformedSeries, exog: Vec<Vec<f64>>, search: SearchConfig) -> Self {
        Self {
            target,
            exog,
            search,
            fit: None,
            points: None,
        }
    }

    /// The target after its pre-model transforms.
    pub fn target(&self) -> &TransformedSeries {
        &self.target
    }

    /// The selected model, if fitted.
    pub fn model(&self) -> Option<&ArimaxFit> {
        self.fit.as_ref()
    }

    /// Runs the order search and keeps the winner. Refitting replaces the
    /// previous model and drops any stored forecast.
    ///
    /// # Errors
    ///
    /// [`ForecastError::Arimax`] with the optimizer's error, e.g.
    /// [`ArimaxError::NoViableModel`](condor_arimax::ArimaxError::NoViableModel)
    /// when no candidate could be fitted.
    pub fn fit(&mut self) -> Result<&ArimaxFit, ForecastError> {
        let data = ModelData::new(self.target.values().to_vec(), self.exog.clone())?;
        let fit = auto_arimax_optimizer(&data, &self.search)?;
        self.points = None;
        Ok(self.fit.insert(fit))
    }

    /// Forecasts `horizon` steps in original units.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ForecastError::NotFitted`] | called before [`fit`](Self::fit) |
    /// | [`ForecastError::Arimax`] | future regressors do not match the model |
    /// | [`ForecastError::Stationarity`] | back-transform fails |
    pub fn forecast(
        &mut self,
        horizon: usize,
        future_exog: &[Vec<f64>],
    ) -> Result<Vec<f64>, ForecastError> {
        let fit = self.fit.as_ref().ok_or(ForecastError::NotFitted)?;
        let points = arimax_forecast(fit, horizon, future_exog)?;
        let original = self.target.invert_forecast(&points)?;
        debug!(horizon, spec = %fit.spec(), "forecast produced");
        self.points = Some(points);
        Ok(original)
    }

    /// Prediction interval for the last forecast, in original units.
    ///
    /// Bounds are computed in model space, back-transformed one by one and
    /// then widened where needed so the width never shrinks with the
    /// horizon.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ForecastError::NotFitted`] | called before [`fit`](Self::fit) |
    /// | [`ForecastError::MissingForecast`] | no forecast since the last fit |
    /// | [`ForecastError::Arimax`] | invalid confidence or smoothing variance |
    pub fn prediction_interval(
        &self,
        confidence: f64,
        smoothing_variance: f64,
    ) -> Result<Vec<Interval>, ForecastError> {
        let fit = self.fit.as_ref().ok_or(ForecastError::NotFitted)?;
        let points = self.points.as_ref().ok_or(ForecastError::MissingForecast)?;
        let bands =
            calculate_forecast_prediction_interval(fit, points, confidence, smoothing_variance)?;
        let lower: Vec<f64> = bands.iter().map(|b| b.lower).collect();
        let upper: Vec<f64> = bands.iter().map(|b| b.upper).collect();
        let lower = self.target.invert_forecast(&lower)?;
        let upper = self.target.invert_forecast(&upper)?;
        let mut intervals: Vec<Interval> = lower
            .into_iter()
            .zip(upper)
            .map(|(l, u)| Interval {
                lower: l.min(u),
                upper: l.max(u),
            })
            .collect();
        enforce_monotone_width(&mut intervals);
        Ok(intervals)
    }
}
