//! Rule-based classification of a raw series.

use std::fmt;

use condor_stationarity::{
    StationarityConfig, StationarityTest, test_stationarity, test_trend_stationarity,
};
use condor_stats::{LevelShift, LevelShiftConfig, autocorrelation, detect_level_shifts, two_sided_z};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ForecastError;

/// Degree of the trend removed from trend-stationary series: the linear
/// trend of the unit-root test that admitted them.
pub const TREND_DEGREE: usize = 1;

/// What kind of non-stationarity a series shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Passes the unit-root test as is.
    Stationary,
    /// Needs differencing.
    DifferenceStationary,
    /// Stationary around a polynomial trend.
    TrendStationary,
    /// Stationary between abrupt mean changes.
    LevelShifted,
    /// Dominated by a seasonal cycle of the configured period.
    Seasonal,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stationary => "stationary",
            Self::DifferenceStationary => "difference_stationary",
            Self::TrendStationary => "trend_stationary",
            Self::LevelShifted => "level_shifted",
            Self::Seasonal => "seasonal",
        };
        f.write_str(name)
    }
}

/// Settings for [`classify`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    stationarity: StationarityConfig,
    level_shift: LevelShiftConfig,
    seasonal_period: Option<usize>,
    seasonal_confidence: f64,
}

impl ClassifierConfig {
    /// Defaults: ADF at 0.05, level shifts at 0.01, no seasonal period,
    /// seasonal autocorrelation significance at 95%.
    pub fn new() -> Self {
        Self {
            stationarity: StationarityConfig::new(),
            level_shift: LevelShiftConfig::default(),
            seasonal_period: None,
            seasonal_confidence: 0.95,
        }
    }

    /// Unit-root test settings.
    pub fn with_stationarity(mut self, stationarity: StationarityConfig) -> Self {
        self.stationarity = stationarity;
        self
    }

    /// Level-shift detector settings.
    pub fn with_level_shift(mut self, level_shift: LevelShiftConfig) -> Self {
        self.level_shift = level_shift;
        self
    }

    /// Seasonal period to test, if any.
    pub fn with_seasonal_period(mut self, period: Option<usize>) -> Self {
        self.seasonal_period = period;
        self
    }

    /// Confidence of the seasonal autocorrelation band.
    pub fn with_seasonal_confidence(mut self, confidence: f64) -> Self {
        self.seasonal_confidence = confidence;
        self
    }

    /// Unit-root test settings.
    pub fn stationarity(&self) -> &StationarityConfig {
        &self.stationarity
    }

    /// Seasonal period.
    pub fn seasonal_period(&self) -> Option<usize> {
        self.seasonal_period
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// Assigned label.
    pub label: Classification,
    /// Unit-root test on the raw series.
    pub adf: StationarityTest,
    /// Unit-root test with a linear trend (only for series failing `adf`).
    pub trend_adf: Option<StationarityTest>,
    /// Shifts found (only searched for stationary series).
    pub level_shifts: Vec<LevelShift>,
    /// Detrending degree (only for trend-stationary series).
    pub trend_degree: Option<usize>,
    /// Autocorrelation at the seasonal lag, when a period is configured.
    pub seasonal_autocorrelation: Option<f64>,
}

/// Whether the lag-`period` autocorrelation is significant and stronger
/// than the lag-1 autocorrelation.
fn seasonal_signal(
    values: &[f64],
    period: usize,
    confidence: f64,
) -> Result<(Option<f64>, bool), ForecastError> {
    let Some(r_s) = autocorrelation(values, period) else {
        return Ok((None, false));
    };
    let band = two_sided_z(confidence)? / (values.len() as f64).sqrt();
    let r_1 = autocorrelation(values, 1).unwrap_or(0.0);
    Ok((Some(r_s), r_s.abs() > band && r_s.abs() > r_1.abs()))
}

/// Labels `values`. Pure and deterministic.
///
/// 1. Stationary under ADF: seasonal if the configured period shows a
///    significant autocorrelation exceeding the lag-1 one; else
///    level-shifted if any shift is detected; else stationary.
/// 2. Otherwise the raw series is retested with a constant and a linear
///    trend in the test regression: trend-stationary (degree
///    [`TREND_DEGREE`]) if the unit root is rejected, else
///    difference-stationary.
///
/// # Errors
///
/// Propagates unit-root test and level-shift failures, e.g.
/// [`StationarityError::InsufficientData`](condor_stationarity::StationarityError::InsufficientData)
/// for very short series.
#[tracing::instrument(skip(values, config), fields(n = values.len()))]
pub fn classify(
    values: &[f64],
    config: &ClassifierConfig,
) -> Result<ClassificationReport, ForecastError> {
    let adf = test_stationarity(values, &config.stationarity)?;

    let report = if adf.is_stationary {
        let (seasonal_autocorrelation, seasonal) = match config.seasonal_period {
            Some(period) => seasonal_signal(values, period, config.seasonal_confidence)?,
            None => (None, false),
        };
        let level_shifts = if seasonal {
            Vec::new()
        } else {
            detect_level_shifts(values, &config.level_shift)?
        };
        let label = if seasonal {
            Classification::Seasonal
        } else if !level_shifts.is_empty() {
            Classification::LevelShifted
        } else {
            Classification::Stationary
        };
        ClassificationReport {
            label,
            adf,
            trend_adf: None,
            level_shifts,
            trend_degree: None,
            seasonal_autocorrelation,
        }
    } else {
        let trend_adf = test_trend_stationarity(values, &config.stationarity)?;
        let (label, trend_degree) = if trend_adf.is_stationary {
            (Classification::TrendStationary, Some(TREND_DEGREE))
        } else {
            (Classification::DifferenceStationary, None)
        };
        ClassificationReport {
            label,
            adf,
            trend_adf: Some(trend_adf),
            level_shifts: Vec::new(),
            trend_degree,
            seasonal_autocorrelation: None,
        }
    };

    info!(label = %report.label, p_value = report.adf.p_value, "series classified");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn white_noise(n: usize, seed: u64) -> Vec<f64> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let normal = Normal::new(0.0, 1.0).unwrap();
        (0..n).map(|_| normal.sample(&mut rng)).collect()
    }

    #[test]
    fn noise_is_stationary() {
        let values: Vec<f64> = white_noise(300, 1).iter().map(|e| 50.0 + e).collect();
        let report = classify(&values, &ClassifierConfig::new()).unwrap();
        assert_eq!(report.label, Classification::Stationary);
        assert!(report.trend_degree.is_none());
    }

    fn random_walk(n: usize, seed: u64) -> Vec<f64> {
        white_noise(n, seed)
            .iter()
            .scan(100.0, |acc, e| {
                *acc += e;
                Some(*acc)
            })
            .collect()
    }

    #[test]
    fn random_walks_are_difference_stationary() {
        let cfg = ClassifierConfig::new();
        let mut labels = Vec::new();
        for seed in 0..40 {
            let report = classify(&random_walk(200, 100 + seed), &cfg).unwrap();
            if report.label == Classification::DifferenceStationary {
                assert!(report.trend_degree.is_none());
                assert!(report.trend_adf.is_some_and(|t| !t.is_stationary));
            }
            labels.push(report.label);
        }
        let differenced = labels
            .iter()
            .filter(|&&l| l == Classification::DifferenceStationary)
            .count();
        // Two 5% tests can each reject a unit root by chance.
        assert!(differenced >= 30, "only {differenced} of 40: {labels:?}");
        assert!(
            labels
                .iter()
                .filter(|&&l| l == Classification::TrendStationary)
                .count()
                <= 6,
            "{labels:?}"
        );
    }

    #[test]
    fn noise_around_line_is_trend_stationary() {
        let values: Vec<f64> = white_noise(300, 6)
            .iter()
            .enumerate()
            .map(|(t, e)| 10.0 + 0.1 * t as f64 + e)
            .collect();
        let report = classify(&values, &ClassifierConfig::new()).unwrap();
        if !report.adf.is_stationary {
            assert_eq!(report.label, Classification::TrendStationary);
            assert_eq!(report.trend_degree, Some(TREND_DEGREE));
        }
    }

    #[test]
    fn step_is_level_shifted() {
        let values: Vec<f64> = white_noise(300, 3)
            .iter()
            .enumerate()
            .map(|(t, e)| if t < 150 { 10.0 } else { 13.0 } + 0.5 * e)
            .collect();
        let report = classify(&values, &ClassifierConfig::new()).unwrap();
        if report.adf.is_stationary {
            assert_eq!(report.label, Classification::LevelShifted);
            assert!(!report.level_shifts.is_empty());
        }
    }

    #[test]
    fn weekly_cycle_is_seasonal() {
        let pattern = [0.0, 3.0, 5.0, 3.0, 0.0, -4.0, -7.0];
        let values: Vec<f64> = white_noise(280, 4)
            .iter()
            .enumerate()
            .map(|(t, e)| 20.0 + pattern[t % 7] + 0.3 * e)
            .collect();
        let cfg = ClassifierConfig::new().with_seasonal_period(Some(7));
        let report = classify(&values, &cfg).unwrap();
        assert_eq!(report.label, Classification::Seasonal);
        assert!(report.seasonal_autocorrelation.is_some_and(|r| r > 0.5));
    }

    #[test]
    fn constant_series_is_stationary() {
        let report = classify(&[4.0; 60], &ClassifierConfig::new()).unwrap();
        assert_eq!(report.label, Classification::Stationary);
    }

    #[test]
    fn classification_is_deterministic() {
        let values = white_noise(120, 5);
        let cfg = ClassifierConfig::new();
        assert_eq!(classify(&values, &cfg).unwrap(), classify(&values, &cfg).unwrap());
    }

    #[test]
    fn display_is_snake_case() {
        assert_eq!(
            Classification::DifferenceStationary.to_string(),
            "difference_stationary"
        );
    }
}
