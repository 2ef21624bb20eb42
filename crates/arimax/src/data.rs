//! Validated target and regressor matrix.

use crate::error::ArimaxError;

/// A target series with aligned exogenous regressors.
///
/// Every regressor has the same length as the target and all values are
/// finite.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelData {
    target: Vec<f64>,
    exog: Vec<Vec<f64>>,
}

impl ModelData {
    /// Validates and wraps `target` and `exog` (one vector per regressor).
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ArimaxError::InsufficientData`] | empty target |
    /// | [`ArimaxError::NonFiniteData`] | NaN or infinite value anywhere |
    /// | [`ArimaxError::ExogMismatch`] | a regressor length differs from the target |
    pub fn new(target: Vec<f64>, exog: Vec<Vec<f64>>) -> Result<Self, ArimaxError> {
        if target.is_empty() {
            return Err(ArimaxError::InsufficientData { n: 0, min: 1 });
        }
        if let Some((i, x)) = exog.iter().enumerate().find(|(_, x)| x.len() != target.len()) {
            return Err(ArimaxError::ExogMismatch {
                reason: format!(
                    "regressor {i} has {} values, target has {}",
                    x.len(),
                    target.len()
                ),
            });
        }
        if target.iter().chain(exog.iter().flatten()).any(|v| !v.is_finite()) {
            return Err(ArimaxError::NonFiniteData);
        }
        Ok(Self { target, exog })
    }

    /// Target-only data.
    pub fn univariate(target: Vec<f64>) -> Result<Self, ArimaxError> {
        Self::new(target, Vec::new())
    }

    /// Target values.
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Regressors, one vector per column.
    pub fn exog(&self) -> &[Vec<f64>] {
        &self.exog
    }

    /// Number of regressors.
    pub fn n_exog(&self) -> usize {
        self.exog.len()
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.target.len()
    }

    /// Always `false`; construction rejects an empty target.
    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }
}
