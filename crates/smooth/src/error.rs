//! Error types for the condor-smooth crate.

use condor_stats::StatsError;

/// Error type for all fallible operations in the condor-smooth crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SmoothError {
    /// Returned when there are too few points to smooth.
    #[error("insufficient data: got {n} points, need at least {min}")]
    InsufficientData {
        /// Number of points available.
        n: usize,
        /// Minimum number of points required.
        min: usize,
    },

    /// Returned when a configuration parameter is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a variance is negative or non-finite.
    #[error("invalid variance {value} at index {index}")]
    InvalidVariance {
        /// Position of the offending variance.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when paired inputs differ in length.
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Propagated from a statistical primitive.
    #[error(transparent)]
    Stats(#[from] StatsError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_insufficient_data() {
        let err = SmoothError::InsufficientData { n: 2, min: 3 };
        assert_eq!(
            err.to_string(),
            "insufficient data: got 2 points, need at least 3"
        );
    }

    #[test]
    fn error_invalid_variance() {
        let err = SmoothError::InvalidVariance {
            index: 4,
            value: -1.0,
        };
        assert_eq!(err.to_string(), "invalid variance -1 at index 4");
    }

    #[test]
    fn error_length_mismatch() {
        let err = SmoothError::LengthMismatch {
            expected: 15,
            got: 14,
        };
        assert_eq!(err.to_string(), "length mismatch: expected 15, got 14");
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<SmoothError>();
    }
}
