//! Error types for the condor-forecast crate.

use condor_arimax::ArimaxError;
use condor_io::IoError;
use condor_smooth::SmoothError;
use condor_stationarity::StationarityError;
use condor_stats::StatsError;

/// Error type for classification, the single-model lifecycle and the
/// per-series pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    /// Returned when forecasting or intervals are requested before `fit()`.
    #[error("model has not been fitted")]
    NotFitted,

    /// Returned when an interval is requested before any forecast.
    #[error("no forecast has been produced yet")]
    MissingForecast,

    /// Returned when an input series cannot be forecast as given.
    #[error("invalid series: {reason}")]
    InvalidSeries {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when an engine parameter is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Propagated from a statistical primitive.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Propagated from the stationarity layer.
    #[error(transparent)]
    Stationarity(#[from] StationarityError),

    /// Propagated from the smoothing layer.
    #[error(transparent)]
    Smooth(#[from] SmoothError),

    /// Propagated from the optimizer.
    #[error(transparent)]
    Arimax(#[from] ArimaxError),

    /// Propagated from series construction.
    #[error(transparent)]
    Io(#[from] IoError),
}

impl ForecastError {
    /// Short machine-readable reason used when a series is skipped.
    pub fn skip_reason(&self) -> &'static str {
        match self {
            Self::Stationarity(StationarityError::NonStationarizable { .. }) => {
                "non_stationarizable"
            }
            Self::Arimax(ArimaxError::NoViableModel { .. }) => "no_viable_model",
            Self::Stats(StatsError::InsufficientData { .. } | StatsError::EmptyData)
            | Self::Stationarity(StationarityError::InsufficientData { .. })
            | Self::Smooth(SmoothError::InsufficientData { .. })
            | Self::Arimax(ArimaxError::InsufficientData { .. }) => "insufficient_data",
            Self::InvalidSeries { .. } | Self::Io(_) => "invalid_series",
            Self::InvalidConfig { .. }
            | Self::Stats(StatsError::InvalidConfig { .. })
            | Self::Stationarity(StationarityError::InvalidConfig { .. })
            | Self::Smooth(SmoothError::InvalidConfig { .. })
            | Self::Arimax(ArimaxError::InvalidConfig { .. }) => "invalid_config",
            Self::NotFitted | Self::MissingForecast => "not_fitted",
            _ => "numerical_failure",
        }
    }
}
