//! Transfer functions linking an exogenous regressor to the target.
//!
//! The exogenous series is assumed to lead the target by `lag` steps. The
//! lag with the strongest cross-correlation is chosen, then a polynomial
//! response `target_t ~ sum_j c_j * x_{t-lag}^j` is fitted with its degree
//! picked by an information criterion.

use condor_stats::{
    InformationCriterion, StatsError, least_squares, mean, pearson_correlation,
};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StationarityError;

/// Configuration for [`generate_transfer_function`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransferConfig {
    max_lag: usize,
    max_degree: usize,
    criterion: InformationCriterion,
}

impl TransferConfig {
    /// Creates a configuration scanning lags `0..=max_lag`.
    ///
    /// Defaults: `max_degree = 3`, `criterion = BIC`.
    pub fn new(max_lag: usize) -> Self {
        Self {
            max_lag,
            max_degree: 3,
            criterion: InformationCriterion::Bic,
        }
    }

    /// Sets the largest polynomial degree considered.
    pub fn with_max_degree(mut self, max_degree: usize) -> Self {
        self.max_degree = max_degree;
        self
    }

    /// Sets the criterion used to pick the degree.
    pub fn with_criterion(mut self, criterion: InformationCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Largest lag scanned.
    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    /// Largest polynomial degree.
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Degree-selection criterion.
    pub fn criterion(&self) -> InformationCriterion {
        self.criterion
    }

    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), StationarityError> {
        if self.max_degree == 0 {
            return Err(StationarityError::InvalidConfig {
                reason: "transfer max_degree must be at least 1".into(),
            });
        }
        Ok(())
    }
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Fitted lag and polynomial response of the target to one regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferFunction {
    lag: usize,
    coefficients: Vec<f64>,
    correlation: f64,
}

impl TransferFunction {
    /// Number of steps the regressor leads the target.
    pub fn lag(&self) -> usize {
        self.lag
    }

    /// Polynomial degree of the response.
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Ascending polynomial coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Cross-correlation at the chosen lag.
    pub fn correlation(&self) -> f64 {
        self.correlation
    }

    /// Response to a regressor value `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    /// Shifts `exogenous` forward by `lag` so that element `t` holds
    /// `x_{t-lag}`. The first `lag` entries repeat the first observation.
    pub fn align(&self, exogenous: &[f64]) -> Vec<f64> {
        let Some(&first) = exogenous.first() else {
            return Vec::new();
        };
        (0..exogenous.len())
            .map(|t| {
                if t < self.lag {
                    first
                } else {
                    exogenous[t - self.lag]
                }
            })
            .collect()
    }

    /// Aligned regressor values for the `horizon` steps after the sample.
    ///
    /// Steps within the lag are known from history; later steps hold the
    /// last observed value.
    pub fn extend(&self, exogenous: &[f64], horizon: usize) -> Vec<f64> {
        let n = exogenous.len();
        let Some(&last) = exogenous.last() else {
            return Vec::new();
        };
        (1..=horizon)
            .map(|h| {
                let idx = (n - 1 + h).checked_sub(self.lag);
                match idx {
                    Some(i) if i < n => exogenous[i],
                    _ => last,
                }
            })
            .collect()
    }
}

/// Estimates the transfer function from `exogenous` to `target`.
///
/// Lags are scanned over `0..=max_lag` (capped so at least 3 pairs
/// remain); the largest absolute correlation wins, ties going to the
/// smaller lag. The polynomial degree in `1..=max_degree` minimising the
/// criterion is kept. A constant regressor yields a degree-0 function.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`StationarityError::Stats`] | length mismatch or non-finite values |
/// | [`StationarityError::InsufficientData`] | fewer than 3 aligned pairs |
/// | [`StationarityError::InvalidConfig`] | configuration fails validation |
#[tracing::instrument(skip(exogenous, target, config), fields(n = target.len()))]
pub fn generate_transfer_function(
    exogenous: &[f64],
    target: &[f64],
    config: &TransferConfig,
) -> Result<TransferFunction, StationarityError> {
    config.validate()?;
    let n = target.len();
    if exogenous.len() != n {
        return Err(StatsError::LengthMismatch {
            expected: n,
            got: exogenous.len(),
        }
        .into());
    }
    if exogenous.iter().chain(target).any(|v| !v.is_finite()) {
        return Err(StatsError::NonFiniteData.into());
    }
    if n < 3 {
        return Err(StationarityError::InsufficientData { n, min: 3 });
    }

    let max_lag = config.max_lag().min(n - 3);
    let mut lag = 0;
    let mut correlation = 0.0_f64;
    for l in 0..=max_lag {
        if let Some(r) = pearson_correlation(&exogenous[..n - l], &target[l..])
            && r.abs() > correlation.abs()
        {
            lag = l;
            correlation = r;
        }
    }

    let x = &exogenous[..n - lag];
    let y = &target[lag..];
    let m = y.len();

    let mut best: Option<(Vec<f64>, f64)> = None;
    for degree in 1..=config.max_degree() {
        let k = degree + 2;
        if m <= k {
            break;
        }
        let design = Array2::from_shape_fn((m, degree + 1), |(i, j)| x[i].powi(j as i32));
        let fit = match least_squares(&design, y) {
            Ok(fit) => fit,
            Err(StatsError::Singular { .. }) => break,
            Err(e) => return Err(e.into()),
        };
        let score = config.criterion().score(fit.log_likelihood(), k, m);
        if best.as_ref().is_none_or(|(_, b)| score < *b - 1e-9) {
            best = Some((fit.coefficients().to_vec(), score));
        }
    }
    let coefficients = best.map_or_else(|| vec![mean(y)], |(c, _)| c);

    debug!(lag, correlation, degree = coefficients.len() - 1, "transfer function");
    Ok(TransferFunction {
        lag,
        coefficients,
        correlation,
    })
}
