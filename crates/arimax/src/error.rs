//! Error types for the condor-arimax crate.

use condor_smooth::SmoothError;
use condor_stationarity::StationarityError;
use condor_stats::StatsError;

/// Error type for all fallible operations in the condor-arimax crate.
///
/// Per-candidate failures ([`ArimaxError::Convergence`]) are absorbed by the
/// search; only [`ArimaxError::NoViableModel`] and input validation errors
/// escape [`auto_arimax_optimizer`](crate::auto_arimax_optimizer).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArimaxError {
    /// Returned when the (differenced) sample is too short for the model.
    #[error("insufficient data: got {n} observations, need at least {min}")]
    InsufficientData {
        /// Number of observations available.
        n: usize,
        /// Minimum number of observations required.
        min: usize,
    },

    /// Returned when the target or a regressor contains NaN or infinity.
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when the differenced target has zero variance.
    #[error("input data is constant (zero variance)")]
    ConstantData,

    /// Returned when a single candidate could not be fitted.
    #[error("fit of {spec} failed: {reason}")]
    Convergence {
        /// Display form of the candidate.
        spec: String,
        /// What went wrong.
        reason: String,
    },

    /// Returned when every candidate failed to fit.
    #[error("no viable model among {n_candidates} candidates")]
    NoViableModel {
        /// Number of candidates that were tried.
        n_candidates: usize,
    },

    /// Returned when regressors do not match the model or the target.
    #[error("exogenous mismatch: {reason}")]
    ExogMismatch {
        /// Description of the mismatch.
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

    /// Propagated from the transformation layer.
    #[error(transparent)]
    Stationarity(#[from] StationarityError),

    /// Propagated from the interval layer.
    #[error(transparent)]
    Smooth(#[from] SmoothError),
}
