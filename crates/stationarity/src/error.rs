//! Error types for the condor-stationarity crate.

use condor_stats::StatsError;

/// Error type for all fallible operations in the condor-stationarity crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StationarityError {
    /// Returned when the series is too short for the requested test or transform.
    #[error("insufficient data: got {n} observations, need at least {min}")]
    InsufficientData {
        /// Number of observations provided.
        n: usize,
        /// Minimum number of observations required.
        min: usize,
    },

    /// Returned when differencing up to the cap never produced a stationary series.
    #[error("series is still non-stationary after {max_diff} differences")]
    NonStationarizable {
        /// Differencing cap that was reached.
        max_diff: usize,
    },

    /// Returned when a transform cannot be applied or inverted.
    #[error("invalid transform: {reason}")]
    InvalidTransform {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a configuration parameter is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Propagated from a statistical primitive.
    #[error(transparent)]
    Stats(#[from] StatsError),
}
