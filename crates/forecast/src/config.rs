//! Engine configuration threaded through every stage.

use condor_arimax::{CandidateConfig, SearchConfig, SeasonalSearch};
use condor_smooth::LowessConfig;
use condor_stationarity::{StationarityConfig, TransferConfig};
use condor_stats::{InformationCriterion, LevelShiftConfig};

use crate::classify::ClassifierConfig;
use crate::error::ForecastError;

/// Number of days every forecast covers.
pub const HORIZON: usize = 15;

/// Every tunable of the forecast engine.
///
/// Defaults: `max_diff = 2`, `max_p = max_q = 5`, confidence 0.95, LOWESS
/// fraction 0.3 with 2 robustifying passes, BIC, ADF significance 0.05, no
/// seasonal period, no re-smoothing, log transform enabled, transfer
/// `max_lag = 10`.
///
/// # Example
///
/// ```
/// use condor_forecast::EngineConfig;
///
/// let config = EngineConfig::new().with_max_p(2).with_confidence(0.9);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.max_p(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    stationarity: StationarityConfig,
    level_shift: LevelShiftConfig,
    max_p: usize,
    max_q: usize,
    criterion: InformationCriterion,
    tie_tolerance: f64,
    confidence: f64,
    lowess: LowessConfig,
    seasonal_period: Option<usize>,
    resmooth: bool,
    log_transform: bool,
    transfer: TransferConfig,
}

impl EngineConfig {
    /// Creates a configuration with the defaults listed above.
    pub fn new() -> Self {
        Self {
            stationarity: StationarityConfig::new(),
            level_shift: LevelShiftConfig::default(),
            max_p: 5,
            max_q: 5,
            criterion: InformationCriterion::Bic,
            tie_tolerance: 1e-6,
            confidence: 0.95,
            lowess: LowessConfig::default(),
            seasonal_period: None,
            resmooth: false,
            log_transform: true,
            transfer: TransferConfig::default(),
        }
    }

    /// Sets unit-root test significance and the differencing cap.
    pub fn with_stationarity(mut self, stationarity: StationarityConfig) -> Self {
        self.stationarity = stationarity;
        self
    }

    /// Sets the level-shift detector.
    pub fn with_level_shift(mut self, level_shift: LevelShiftConfig) -> Self {
        self.level_shift = level_shift;
        self
    }

    /// Largest AR order searched.
    pub fn with_max_p(mut self, max_p: usize) -> Self {
        self.max_p = max_p;
        self
    }

    /// Largest MA order searched.
    pub fn with_max_q(mut self, max_q: usize) -> Self {
        self.max_q = max_q;
        self
    }

    /// Model ranking criterion.
    pub fn with_criterion(mut self, criterion: InformationCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Score difference below which candidates tie.
    pub fn with_tie_tolerance(mut self, tie_tolerance: f64) -> Self {
        self.tie_tolerance = tie_tolerance;
        self
    }

    /// Prediction-interval coverage.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Smoothing parameters.
    pub fn with_lowess(mut self, lowess: LowessConfig) -> Self {
        self.lowess = lowess;
        self
    }

    /// Seasonal period in observations.
    pub fn with_seasonal_period(mut self, period: Option<usize>) -> Self {
        self.seasonal_period = period;
        self
    }

    /// Re-smooth forecast points with LOWESS after forecasting.
    pub fn with_resmooth(mut self, resmooth: bool) -> Self {
        self.resmooth = resmooth;
        self
    }

    /// Allow the log transform for positive difference-stationary series.
    pub fn with_log_transform(mut self, log_transform: bool) -> Self {
        self.log_transform = log_transform;
        self
    }

    /// Transfer-function estimation for exogenous series.
    pub fn with_transfer(mut self, transfer: TransferConfig) -> Self {
        self.transfer = transfer;
        self
    }

    /// Unit-root test settings.
    pub fn stationarity(&self) -> &StationarityConfig {
        &self.stationarity
    }

    /// Level-shift settings.
    pub fn level_shift(&self) -> &LevelShiftConfig {
        &self.level_shift
    }

    /// Largest AR order.
    pub fn max_p(&self) -> usize {
        self.max_p
    }

    /// Largest MA order.
    pub fn max_q(&self) -> usize {
        self.max_q
    }

    /// Ranking criterion.
    pub fn criterion(&self) -> InformationCriterion {
        self.criterion
    }

    /// Tie tolerance.
    pub fn tie_tolerance(&self) -> f64 {
        self.tie_tolerance
    }

    /// Interval coverage.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Smoothing parameters.
    pub fn lowess(&self) -> &LowessConfig {
        &self.lowess
    }

    /// Seasonal period.
    pub fn seasonal_period(&self) -> Option<usize> {
        self.seasonal_period
    }

    /// Whether forecasts are re-smoothed.
    pub fn resmooth(&self) -> bool {
        self.resmooth
    }

    /// Whether the log transform is allowed.
    pub fn log_transform(&self) -> bool {
        self.log_transform
    }

    /// Transfer-function settings.
    pub fn transfer(&self) -> &TransferConfig {
        &self.transfer
    }

    /// Classifier settings derived from this configuration.
    pub fn classifier(&self) -> ClassifierConfig {
        ClassifierConfig::new()
            .with_stationarity(self.stationarity.clone())
            .with_level_shift(self.level_shift.clone())
            .with_seasonal_period(self.seasonal_period)
    }

    /// Candidate search with fixed `d`, optional seasonal ranges and
    /// `n_exog` regressors.
    pub fn search(
        &self,
        d: usize,
        seasonal: Option<SeasonalSearch>,
        n_exog: usize,
    ) -> SearchConfig {
        let mut candidates = CandidateConfig::new()
            .with_max_p(self.max_p)
            .with_max_q(self.max_q)
            .with_d(d)
            .with_exog(n_exog);
        if let Some(s) = seasonal {
            candidates = candidates.with_seasonal(s);
        }
        SearchConfig::new(candidates)
            .with_criterion(self.criterion)
            .with_tie_tolerance(self.tie_tolerance)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ForecastError::InvalidConfig`] | confidence outside `(0, 1)`, seasonal period below 2, negative tie tolerance |
    /// | wrapped config errors | a nested configuration fails its own validation |
    pub fn validate(&self) -> Result<(), ForecastError> {
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(ForecastError::InvalidConfig {
                reason: format!("confidence must be in (0, 1), got {}", self.confidence),
            });
        }
        if let Some(period) = self.seasonal_period
            && period < 2
        {
            return Err(ForecastError::InvalidConfig {
                reason: format!("seasonal period must be at least 2, got {period}"),
            });
        }
        if !self.tie_tolerance.is_finite() || self.tie_tolerance < 0.0 {
            return Err(ForecastError::InvalidConfig {
                reason: format!(
                    "tie tolerance must be finite and non-negative, got {}",
                    self.tie_tolerance
                ),
            });
        }
        self.stationarity.validate()?;
        self.level_shift.validate()?;
        self.lowess.validate()?;
        self.transfer.validate()?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
