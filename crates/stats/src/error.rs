//! Error types for the condor-stats crate.

/// Error type for all fallible operations in the condor-stats crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    /// Returned when the input data is empty.
    #[error("input data is empty")]
    EmptyData,

    /// Returned when the input has fewer observations than the estimator needs.
    #[error("insufficient data: got {n} observations, need at least {min}")]
    InsufficientData {
        /// Number of observations provided.
        n: usize,
        /// Minimum number of observations required.
        min: usize,
    },

    /// Returned when the input contains NaN or infinite values.
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when paired inputs differ in length.
    #[error("length mismatch: expected {expected}, got {got}")]
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when a least-squares design matrix is rank deficient.
    #[error("design matrix is singular (column {column} is collinear)")]
    Singular {
        /// Index of the first column found to be linearly dependent.
        column: usize,
    },

    /// Returned when a configuration parameter is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_empty_data() {
        assert_eq!(StatsError::EmptyData.to_string(), "input data is empty");
    }

    #[test]
    fn error_insufficient_data() {
        let err = StatsError::InsufficientData { n: 1, min: 2 };
        assert_eq!(
            err.to_string(),
            "insufficient data: got 1 observations, need at least 2"
        );
    }

    #[test]
    fn error_non_finite() {
        assert_eq!(
            StatsError::NonFiniteData.to_string(),
            "input data contains non-finite values"
        );
    }

    #[test]
    fn error_length_mismatch() {
        let err = StatsError::LengthMismatch {
            expected: 4,
            got: 3,
        };
        assert_eq!(err.to_string(), "length mismatch: expected 4, got 3");
    }

    #[test]
    fn error_singular() {
        let err = StatsError::Singular { column: 2 };
        assert_eq!(
            err.to_string(),
            "design matrix is singular (column 2 is collinear)"
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<StatsError>();
    }
}
