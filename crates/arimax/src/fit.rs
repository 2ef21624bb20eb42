//! Fitted ARIMAX model.

use condor_stats::InformationCriterion;

use crate::params::ArmaCoefficients;
use crate::spec::ArimaxSpec;

/// A fitted ARIMAX model, produced by [`ArimaxSpec::fit`] or the candidate
/// search.
///
/// Besides the estimates, the fit keeps the training series it needs to
/// extend forecasts past the end of the sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ArimaxFit {
    pub(crate) spec: ArimaxSpec,
    pub(crate) criterion: InformationCriterion,
    pub(crate) score: f64,
    pub(crate) log_likelihood: f64,
    pub(crate) sigma2: f64,
    pub(crate) coefficients: ArmaCoefficients,
    pub(crate) intercept: f64,
    pub(crate) exog_coefficients: Vec<f64>,
    /// Regression residuals of the differenced target (ARMA input).
    pub(crate) noise: Vec<f64>,
    /// CSS innovations aligned with `noise`; zero during warm-up.
    pub(crate) innovations: Vec<f64>,
    pub(crate) warm_up: usize,
    pub(crate) target: Vec<f64>,
    pub(crate) exog: Vec<Vec<f64>>,
}

impl ArimaxFit {
    /// The fitted specification.
    pub fn spec(&self) -> ArimaxSpec {
        self.spec
    }

    /// Criterion used for [`score`](Self::score).
    pub fn criterion(&self) -> InformationCriterion {
        self.criterion
    }

    /// Information-criterion value (lower is better).
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Maximized conditional log-likelihood.
    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    /// Innovation variance.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Non-seasonal AR coefficients `phi_1..phi_p`.
    pub fn ar(&self) -> &[f64] {
        &self.coefficients.ar
    }

    /// Non-seasonal MA coefficients `theta_1..theta_q`.
    pub fn ma(&self) -> &[f64] {
        &self.coefficients.ma
    }

    /// Seasonal AR coefficients.
    pub fn seasonal_ar(&self) -> &[f64] {
        &self.coefficients.seasonal_ar
    }

    /// Seasonal MA coefficients.
    pub fn seasonal_ma(&self) -> &[f64] {
        &self.coefficients.seasonal_ma
    }

    /// Intercept of the differenced mean equation, if the model has one.
    pub fn intercept(&self) -> Option<f64> {
        self.spec.has_intercept().then_some(self.intercept)
    }

    /// One coefficient per exogenous regressor.
    pub fn exog_coefficients(&self) -> &[f64] {
        &self.exog_coefficients
    }

    /// Innovations after the AR warm-up.
    pub fn residuals(&self) -> &[f64] {
        &self.innovations[self.warm_up..]
    }

    /// Number of observations behind the likelihood.
    pub fn n_obs(&self) -> usize {
        self.innovations.len() - self.warm_up
    }

    /// Parameter count used by the criterion.
    pub fn n_params(&self) -> usize {
        self.spec.n_params()
    }

    /// Training target.
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Akaike information criterion, whatever criterion ranked the fit.
    pub fn aic(&self) -> f64 {
        InformationCriterion::Aic.score(self.log_likelihood, self.n_params(), self.n_obs())
    }

    /// Bayesian information criterion.
    pub fn bic(&self) -> f64 {
        InformationCriterion::Bic.score(self.log_likelihood, self.n_params(), self.n_obs())
    }
}
