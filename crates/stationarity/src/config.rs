//! Configuration for unit-root testing and differencing.

use crate::error::StationarityError;

/// Configuration for [`test_stationarity`](crate::test_stationarity) and
/// [`make_stationary`](crate::make_stationary).
///
/// # Example
///
/// ```
/// use condor_stationarity::StationarityConfig;
///
/// let config = StationarityConfig::new()
///     .with_significance(0.01)
///     .with_max_diff(1);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_lag(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StationarityConfig {
    /// p-value threshold below which the unit root is rejected.
    significance: f64,
    /// Maximum number of regular differences `make_stationary` may apply.
    max_diff: usize,
    /// Fixed upper bound for the ADF lag search; `None` uses Schwert's rule.
    max_lag: Option<usize>,
}

impl StationarityConfig {
    /// Creates a configuration with the defaults.
    ///
    /// Defaults: `significance = 0.05`, `max_diff = 2`, `max_lag = None`.
    pub fn new() -> Self {
        Self {
            significance: 0.05,
            max_diff: 2,
            max_lag: None,
        }
    }

    /// Sets the significance threshold.
    pub fn with_significance(mut self, significance: f64) -> Self {
        self.significance = significance;
        self
    }

    /// Sets the differencing cap.
    pub fn with_max_diff(mut self, max_diff: usize) -> Self {
        self.max_diff = max_diff;
        self
    }

    /// Fixes the upper bound of the ADF lag search.
    pub fn with_max_lag(mut self, max_lag: usize) -> Self {
        self.max_lag = Some(max_lag);
        self
    }

    /// Returns the significance threshold.
    pub fn significance(&self) -> f64 {
        self.significance
    }

    /// Returns the differencing cap.
    pub fn max_diff(&self) -> usize {
        self.max_diff
    }

    /// Returns the fixed lag bound, if any.
    pub fn max_lag(&self) -> Option<usize> {
        self.max_lag
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), StationarityError> {
        if !(self.significance > 0.0 && self.significance < 1.0) {
            return Err(StationarityError::InvalidConfig {
                reason: format!(
                    "significance must lie in (0, 1), got {}",
                    self.significance
                ),
            });
        }
        Ok(())
    }
}

impl Default for StationarityConfig {
    fn default() -> Self {
        Self::new()
    }
}
