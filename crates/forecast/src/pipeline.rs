//! Per-series orchestration.

use chrono::NaiveDate;
use condor_io::Series;
use condor_smooth::{Interval, TrendBands, residual_variance, smooth_lowess, trend_bands};
use condor_stationarity::{generate_transfer_function, transform_target};
use tracing::{debug, info};

use crate::batch::SeriesInput;
use crate::classify::{ClassificationReport, classify};
use crate::config::{EngineConfig, HORIZON};
use crate::error::ForecastError;
use crate::model::ForecastArimax;
use crate::record::{ForecastDay, ForecastRecord, Provenance};
use crate::strategy::TransformStrategy;

/// Regressors derived from the exogenous series of one input.
struct Regressors {
    history: Vec<Vec<f64>>,
    future: Vec<Vec<f64>>,
    lags: Vec<usize>,
}

/// Runs the full chain for one series: classify, transform, align
/// exogenous series, select and fit a model, forecast [`HORIZON`] days and
/// attach a prediction interval.
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use condor_forecast::{EngineConfig, SeriesInput, StockDataForecast};
/// use condor_io::Series;
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let pairs = (0..120).map(|i| (start + chrono::Days::new(i), 100.0 + (i as f64).sin()));
/// let input = SeriesInput::new(Series::from_pairs("ACME", pairs).unwrap());
///
/// let engine = StockDataForecast::new(EngineConfig::new()).unwrap();
/// let record = engine.run(&input).unwrap();
/// assert_eq!(record.days().len(), 15);
/// ```
#[derive(Debug, Clone)]
pub struct StockDataForecast {
    config: EngineConfig,
}

impl StockDataForecast {
    /// Creates an engine after validating `config`.
    ///
    /// # Errors
    ///
    /// As [`EngineConfig::validate`].
    pub fn new(config: EngineConfig) -> Result<Self, ForecastError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classifies a raw series with this engine's settings.
    ///
    /// # Errors
    ///
    /// As [`classify`].
    pub fn classify(&self, series: &Series) -> Result<ClassificationReport, ForecastError> {
        classify(series.values(), &self.config.classifier())
    }

    /// LOWESS trend of a raw series with confidence and prediction bands.
    ///
    /// # Errors
    ///
    /// [`ForecastError::Smooth`] when the series is too short for the
    /// smoothing window.
    pub fn trends(&self, series: &Series) -> Result<TrendBands, ForecastError> {
        Ok(trend_bands(
            series.values(),
            self.config.lowess(),
            self.config.confidence(),
        )?)
    }

    /// Forecasts one series. When exogenous series start later than the
    /// target, the target history is first cut to start with the latest of
    /// them.
    ///
    /// # Errors
    ///
    /// Any stage error; see [`ForecastError::skip_reason`] for the short
    /// reasons recorded by [`run_batch`](crate::run_batch).
    #[tracing::instrument(skip(self, input), fields(series = input.series.id(), n = input.series.len()))]
    pub fn run(&self, input: &SeriesInput) -> Result<ForecastRecord, ForecastError> {
        // History before the latest exogenous start has no regressor values.
        let trimmed;
        let series = match input.exog.iter().map(Series::first_date).max() {
            Some(start) if start > input.series.first_date() => {
                trimmed = input.series.since(start)?;
                debug!(%start, n = trimmed.len(), "target trimmed to exogenous coverage");
                &trimmed
            }
            _ => &input.series,
        };
        let values = series.values();

        let report = self.classify(series)?;
        let strategy = TransformStrategy::for_label(&report, values, &self.config)?;
        let target = transform_target(values, &strategy.plan)?;

        let regressors = self.regressors(&input.exog, series.dates(), target.values())?;
        let search = self.config.search(
            strategy.d,
            strategy.seasonal,
            regressors.history.len(),
        );

        let mut model = ForecastArimax::new(target, regressors.history, search);
        let fit = model.fit()?;
        let order = fit.spec().to_string();
        let criterion = fit.criterion().name().to_string();
        let score = fit.score();

        let mut points = model.forecast(HORIZON, &regressors.future)?;
        let smoothed = smooth_lowess(model.target().values(), self.config.lowess())?;
        let smoothing_variance = residual_variance(model.target().values(), &smoothed)?;
        let mut bands = model.prediction_interval(self.config.confidence(), smoothing_variance)?;

        if self.config.resmooth() {
            self.resmooth(values, &mut points, &mut bands)?;
        }

        let mut transforms: Vec<String> =
            model.target().steps().iter().map(|s| s.label()).collect();
        if strategy.d > 0 {
            transforms.push(format!("diff({})", strategy.d));
        }
        if let Some(seasonal) = strategy.seasonal {
            transforms.push(format!("sdiff({})", seasonal.period));
        }

        let days = points
            .iter()
            .zip(&bands)
            .map(|(&point, band)| ForecastDay {
                point,
                lower: band.lower,
                upper: band.upper,
            })
            .collect();
        let provenance = Provenance {
            label: report.label,
            transforms,
            order,
            criterion,
            score,
            exogenous_lags: regressors.lags,
            smoothing_applied: self.config.resmooth(),
        };
        let record = ForecastRecord::new(series.id(), series.last_date(), days, provenance)?;
        info!(
            label = %record.provenance().label,
            order = %record.provenance().order,
            "series forecast"
        );
        Ok(record)
    }

    /// Aligns every exogenous series to the target dates, fits its transfer
    /// function against the transformed target and evaluates it over the
    /// history and the horizon.
    fn regressors(
        &self,
        exogenous: &[Series],
        dates: &[NaiveDate],
        target: &[f64],
    ) -> Result<Regressors, ForecastError> {
        let mut out = Regressors {
            history: Vec::with_capacity(exogenous.len()),
            future: Vec::with_capacity(exogenous.len()),
            lags: Vec::with_capacity(exogenous.len()),
        };
        for exog in exogenous {
            let raw = exog.align_to(dates)?;
            let tf = generate_transfer_function(&raw, target, self.config.transfer())?;
            if tf.degree() == 0 {
                debug!(exog = exog.id(), "constant response dropped");
                continue;
            }
            debug!(exog = exog.id(), lag = tf.lag(), degree = tf.degree(), "transfer function");
            out.history
                .push(tf.align(&raw).into_iter().map(|x| tf.evaluate(x)).collect());
            out.future.push(
                tf.extend(&raw, HORIZON)
                    .into_iter()
                    .map(|x| tf.evaluate(x))
                    .collect(),
            );
            out.lags.push(tf.lag());
        }
        Ok(out)
    }

    /// Replaces the points by a LOWESS pass over history plus forecast and
    /// shifts each band by the same amount.
    fn resmooth(
        &self,
        history: &[f64],
        points: &mut [f64],
        bands: &mut [Interval],
    ) -> Result<(), ForecastError> {
        let mut joined = history.to_vec();
        joined.extend_from_slice(points);
        let smoothed = smooth_lowess(&joined, self.config.lowess())?;
        let tail = &smoothed[smoothed.len() - points.len()..];
        for ((p, band), s) in points.iter_mut().zip(bands.iter_mut()).zip(tail) {
            let shift = s - *p;
            *p = *s;
            band.lower += shift;
            band.upper += shift;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn series(values: Vec<f64>) -> Series {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let pairs = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (start + Days::new(i as u64), v));
        Series::from_pairs("TEST", pairs).unwrap()
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(StockDataForecast::new(EngineConfig::new().with_confidence(2.0)).is_err());
    }

    #[test]
    fn resmooth_shifts_bands_with_points() {
        let engine = StockDataForecast::new(EngineConfig::new()).unwrap();
        let history: Vec<f64> = (0..40).map(|t| t as f64).collect();
        let mut points: Vec<f64> = (40..55).map(|t| t as f64 + if t % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let mut bands: Vec<Interval> = points.iter().map(|p| Interval::around(*p, 2.0)).collect();
        engine.resmooth(&history, &mut points, &mut bands).unwrap();
        for (p, b) in points.iter().zip(&bands) {
            assert!((b.upper - p - 2.0).abs() < 1e-9);
            assert!((p - b.lower - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn trends_cover_series() {
        let values: Vec<f64> = (0..60).map(|t| 10.0 + (t as f64 / 6.0).sin()).collect();
        let engine = StockDataForecast::new(EngineConfig::new()).unwrap();
        let bands = engine.trends(&series(values)).unwrap();
        assert_eq!(bands.smoothed.len(), 60);
        assert_eq!(bands.prediction.len(), 60);
    }
}
