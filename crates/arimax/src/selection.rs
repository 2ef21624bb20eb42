//! Parallel candidate fitting and model selection.

use std::cmp::Ordering;

use condor_stats::InformationCriterion;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::candidates::{
    CandidateConfig, check_generated_arimax_params, generate_auto_arimax_test_params,
};
use crate::data::ModelData;
use crate::error::ArimaxError;
use crate::fit::ArimaxFit;
use crate::spec::ArimaxSpec;

/// Result of fitting one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    /// The candidate was fitted.
    Fitted(Box<ArimaxFit>),
    /// The candidate failed; the error is always [`ArimaxError::Convergence`].
    Failed(ArimaxError),
}

impl CandidateOutcome {
    /// The fit, if the candidate succeeded.
    pub fn fit(&self) -> Option<&ArimaxFit> {
        match self {
            Self::Fitted(fit) => Some(&**fit),
            Self::Failed(_) => None,
        }
    }
}

/// Search bounds plus ranking rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    candidates: CandidateConfig,
    criterion: InformationCriterion,
    tie_tolerance: f64,
}

impl SearchConfig {
    /// Ranks by BIC with a score tie tolerance of `1e-6`.
    pub fn new(candidates: CandidateConfig) -> Self {
        Self {
            candidates,
            criterion: InformationCriterion::default(),
            tie_tolerance: 1e-6,
        }
    }

    /// Sets the ranking criterion.
    pub fn with_criterion(mut self, criterion: InformationCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Sets the score difference below which two fits tie.
    pub fn with_tie_tolerance(mut self, tie_tolerance: f64) -> Self {
        self.tie_tolerance = tie_tolerance;
        self
    }

    /// Search bounds.
    pub fn candidates(&self) -> &CandidateConfig {
        &self.candidates
    }

    /// Ranking criterion.
    pub fn criterion(&self) -> InformationCriterion {
        self.criterion
    }

    /// Tie tolerance.
    pub fn tie_tolerance(&self) -> f64 {
        self.tie_tolerance
    }

    /// Validates bounds and tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`ArimaxError::InvalidConfig`] for a negative or non-finite
    /// tolerance or invalid candidate bounds.
    pub fn validate(&self) -> Result<(), ArimaxError> {
        if !self.tie_tolerance.is_finite() || self.tie_tolerance < 0.0 {
            return Err(ArimaxError::InvalidConfig {
                reason: format!(
                    "tie tolerance must be finite and non-negative, got {}",
                    self.tie_tolerance
                ),
            });
        }
        self.candidates.validate()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(CandidateConfig::default())
    }
}

/// Fits every candidate in parallel. The output is in candidate order.
///
/// Individual failures are converted to [`CandidateOutcome::Failed`] with
/// an [`ArimaxError::Convergence`] and never abort the search.
pub fn optimize_arimax_params(
    candidates: &[ArimaxSpec],
    data: &ModelData,
    criterion: InformationCriterion,
) -> Vec<CandidateOutcome> {
    candidates
        .par_iter()
        .map(|spec| match spec.fit(data, criterion) {
            Ok(fit) => CandidateOutcome::Fitted(Box::new(fit)),
            Err(err) => {
                debug!(%spec, error = %err, "candidate failed");
                let err = match err {
                    e @ ArimaxError::Convergence { .. } => e,
                    other => ArimaxError::Convergence {
                        spec: spec.to_string(),
                        reason: other.to_string(),
                    },
                };
                CandidateOutcome::Failed(err)
            }
        })
        .collect()
}

/// Orders `a` before `b` when it scores lower by more than `tol`; otherwise
/// by parameter count, then `d`, then the order tuple.
fn rank(a: &ArimaxFit, b: &ArimaxFit, tol: f64) -> Ordering {
    if (a.score() - b.score()).abs() > tol {
        return a.score().total_cmp(&b.score());
    }
    a.n_params()
        .cmp(&b.n_params())
        .then(a.spec().d().cmp(&b.spec().d()))
        .then(a.spec().order_key().cmp(&b.spec().order_key()))
}

/// Picks the best fitted candidate.
///
/// # Errors
///
/// Returns [`ArimaxError::NoViableModel`] when no candidate was fitted.
pub fn select_best(
    outcomes: &[CandidateOutcome],
    tie_tolerance: f64,
) -> Result<&ArimaxFit, ArimaxError> {
    outcomes
        .iter()
        .filter_map(CandidateOutcome::fit)
        .reduce(|best, fit| match rank(fit, best, tie_tolerance) {
            Ordering::Less => fit,
            _ => best,
        })
        .ok_or(ArimaxError::NoViableModel {
            n_candidates: outcomes.len(),
        })
}

/// Generates, filters, fits and ranks candidates; returns the winner.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`ArimaxError::InvalidConfig`] | invalid search bounds |
/// | [`ArimaxError::NoViableModel`] | no candidate survived filtering and fitting |
#[tracing::instrument(skip(data, config), fields(n = data.len(), n_exog = data.n_exog()))]
pub fn auto_arimax_optimizer(
    data: &ModelData,
    config: &SearchConfig,
) -> Result<ArimaxFit, ArimaxError> {
    config.validate()?;
    let generated = generate_auto_arimax_test_params(config.candidates());
    let candidates = check_generated_arimax_params(&generated, data.len());
    if candidates.is_empty() {
        return Err(ArimaxError::NoViableModel { n_candidates: 0 });
    }

    let outcomes = optimize_arimax_params(&candidates, data, config.criterion());
    let n_failed = outcomes.iter().filter(|o| o.fit().is_none()).count();
    let best = select_best(&outcomes, config.tie_tolerance())?.clone();
    info!(
        spec = %best.spec(),
        criterion = config.criterion().name(),
        score = best.score(),
        candidates = candidates.len(),
        failed = n_failed,
        "model selected"
    );
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_outcomes_have_no_winner() {
        assert_eq!(
            select_best(&[], 1e-6).unwrap_err(),
            ArimaxError::NoViableModel { n_candidates: 0 }
        );
    }

    #[test]
    fn failures_are_wrapped_as_convergence() {
        let data = ModelData::univariate(vec![2.0; 40]).unwrap();
        let outcomes = optimize_arimax_params(
            &[ArimaxSpec::new(1, 0, 0), ArimaxSpec::new(0, 0, 1)],
            &data,
            InformationCriterion::Bic,
        );
        assert_eq!(outcomes.len(), 2);
        for o in &outcomes {
            assert!(matches!(o, CandidateOutcome::Failed(ArimaxError::Convergence { .. })));
        }
    }

    #[test]
    fn negative_tolerance_rejected() {
        let cfg = SearchConfig::default().with_tie_tolerance(-1.0);
        assert!(matches!(cfg.validate(), Err(ArimaxError::InvalidConfig { .. })));
    }
}
