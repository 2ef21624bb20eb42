//! Candidate generation and validity filtering.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ArimaxError;
use crate::spec::ArimaxSpec;

/// Observations required per estimated parameter.
const OBS_PER_PARAM: usize = 3;

/// Seasonal search ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalSearch {
    /// Period in observations (at least 2).
    pub period: usize,
    /// Largest seasonal AR order `P`.
    pub max_p: usize,
    /// Seasonal differencing order `D`.
    pub d: usize,
    /// Largest seasonal MA order `Q`.
    pub max_q: usize,
}

/// Bounds of the order search.
///
/// # Example
///
/// ```
/// use condor_arimax::CandidateConfig;
///
/// let config = CandidateConfig::new().with_max_p(2).with_max_q(1).with_d(1);
/// assert_eq!(config.max_p(), 2);
/// assert_eq!(config.d(), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateConfig {
    max_p: usize,
    max_q: usize,
    d: Option<usize>,
    max_d: usize,
    seasonal: Option<SeasonalSearch>,
    n_exog: usize,
}

impl CandidateConfig {
    /// Defaults: `max_p = max_q = 5`, `d` searched over `0..=2`, no seasonal
    /// part, no regressors.
    pub fn new() -> Self {
        Self {
            max_p: 5,
            max_q: 5,
            d: None,
            max_d: 2,
            seasonal: None,
            n_exog: 0,
        }
    }

    /// Largest AR order.
    pub fn with_max_p(mut self, max_p: usize) -> Self {
        self.max_p = max_p;
        self
    }

    /// Largest MA order.
    pub fn with_max_q(mut self, max_q: usize) -> Self {
        self.max_q = max_q;
        self
    }

    /// Fixes the differencing order.
    pub fn with_d(mut self, d: usize) -> Self {
        self.d = Some(d);
        self
    }

    /// Upper bound of the `d` search when it is not fixed.
    pub fn with_max_d(mut self, max_d: usize) -> Self {
        self.max_d = max_d;
        self
    }

    /// Adds seasonal candidates.
    pub fn with_seasonal(mut self, seasonal: SeasonalSearch) -> Self {
        self.seasonal = Some(seasonal);
        self
    }

    /// Number of exogenous regressors every candidate carries.
    pub fn with_exog(mut self, n_exog: usize) -> Self {
        self.n_exog = n_exog;
        self
    }

    /// Largest AR order.
    pub fn max_p(&self) -> usize {
        self.max_p
    }

    /// Largest MA order.
    pub fn max_q(&self) -> usize {
        self.max_q
    }

    /// Fixed differencing order, if any.
    pub fn d(&self) -> Option<usize> {
        self.d
    }

    /// Upper bound of the `d` search.
    pub fn max_d(&self) -> usize {
        self.max_d
    }

    /// Seasonal ranges.
    pub fn seasonal(&self) -> Option<SeasonalSearch> {
        self.seasonal
    }

    /// Number of regressors.
    pub fn n_exog(&self) -> usize {
        self.n_exog
    }

    /// Validates the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ArimaxError::InvalidConfig`] when the seasonal period is
    /// below 2.
    pub fn validate(&self) -> Result<(), ArimaxError> {
        match self.seasonal {
            Some(s) if s.period < 2 => Err(ArimaxError::InvalidConfig {
                reason: format!("seasonal period must be at least 2, got {}", s.period),
            }),
            _ => Ok(()),
        }
    }
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Cartesian product of the configured order ranges, ordered
/// lexicographically by `(p, d, q, P, Q)`.
pub fn generate_auto_arimax_test_params(config: &CandidateConfig) -> Vec<ArimaxSpec> {
    let ds: Vec<usize> = match config.d {
        Some(d) => vec![d],
        None => (0..=config.max_d).collect(),
    };
    let seasonal: Vec<Option<(usize, usize)>> = match config.seasonal {
        Some(s) => (0..=s.max_p)
            .flat_map(|sp| (0..=s.max_q).map(move |sq| Some((sp, sq))))
            .collect(),
        None => vec![None],
    };

    let mut out = Vec::new();
    for p in 0..=config.max_p {
        for &d in &ds {
            for q in 0..=config.max_q {
                for orders in &seasonal {
                    let mut spec = ArimaxSpec::new(p, d, q).with_exog(config.n_exog);
                    if let (Some((sp, sq)), Some(s)) = (orders, config.seasonal) {
                        spec = spec.with_seasonal(*sp, s.d, *sq, s.period);
                    }
                    out.push(spec);
                }
            }
        }
    }
    out
}

/// Keeps only candidates that carry some dynamics or regressors and whose
/// parameter count the post-differencing sample of `n_obs` observations
/// supports.
pub fn check_generated_arimax_params(candidates: &[ArimaxSpec], n_obs: usize) -> Vec<ArimaxSpec> {
    let kept: Vec<ArimaxSpec> = candidates
        .iter()
        .copied()
        .filter(|spec| spec.n_arma() > 0 || spec.n_exog() > 0)
        .filter(|spec| {
            let available = n_obs.saturating_sub(spec.differencing_loss());
            available >= OBS_PER_PARAM * spec.n_params() && available > spec.max_lag()
        })
        .collect();
    debug!(
        generated = candidates.len(),
        kept = kept.len(),
        n_obs,
        "candidates filtered"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_size() {
        let cfg = CandidateConfig::new().with_d(0);
        let specs = generate_auto_arimax_test_params(&cfg);
        assert_eq!(specs.len(), 36);
        assert_eq!(specs[0], ArimaxSpec::new(0, 0, 0));
        assert_eq!(specs[35], ArimaxSpec::new(5, 0, 5));
    }

    #[test]
    fn unset_d_searches_range() {
        let cfg = CandidateConfig::new().with_max_p(1).with_max_q(1).with_max_d(2);
        let specs = generate_auto_arimax_test_params(&cfg);
        assert_eq!(specs.len(), 2 * 3 * 2);
        assert!(specs.iter().any(|s| s.d() == 2));
    }

    #[test]
    fn seasonal_grid() {
        let cfg = CandidateConfig::new()
            .with_max_p(1)
            .with_max_q(1)
            .with_d(0)
            .with_seasonal(SeasonalSearch {
                period: 7,
                max_p: 1,
                d: 1,
                max_q: 1,
            });
        let specs = generate_auto_arimax_test_params(&cfg);
        assert_eq!(specs.len(), 16);
        assert!(specs.iter().all(|s| s.seasonal().is_some_and(|o| o.d == 1)));
    }

    #[test]
    fn drops_empty_model_without_exog() {
        let specs = [ArimaxSpec::new(0, 1, 0), ArimaxSpec::new(1, 1, 0)];
        let kept = check_generated_arimax_params(&specs, 200);
        assert_eq!(kept, vec![ArimaxSpec::new(1, 1, 0)]);
    }

    #[test]
    fn keeps_empty_model_with_exog() {
        let specs = [ArimaxSpec::new(0, 0, 0).with_exog(1)];
        assert_eq!(check_generated_arimax_params(&specs, 50).len(), 1);
    }

    #[test]
    fn drops_overparameterized() {
        // ARIMA(5,0,5): 10 + intercept + variance = 12 params -> 36 obs
        let specs = [ArimaxSpec::new(5, 0, 5), ArimaxSpec::new(1, 0, 0)];
        let kept = check_generated_arimax_params(&specs, 30);
        assert_eq!(kept, vec![ArimaxSpec::new(1, 0, 0)]);
    }

    #[test]
    fn drops_lag_longer_than_sample() {
        let spec = ArimaxSpec::new(0, 0, 0).with_seasonal(1, 0, 0, 30);
        assert!(check_generated_arimax_params(&[spec], 25).is_empty());
    }

    #[test]
    fn rejects_short_period() {
        let cfg = CandidateConfig::new().with_seasonal(SeasonalSearch {
            period: 1,
            max_p: 1,
            d: 0,
            max_q: 1,
        });
        assert!(cfg.validate().is_err());
    }
}
