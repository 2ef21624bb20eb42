//! ARIMAX model specification (unfitted).

use std::fmt;

use condor_stats::InformationCriterion;
use serde::{Deserialize, Serialize};

use crate::data::ModelData;
use crate::error::ArimaxError;
use crate::fit::ArimaxFit;

/// Seasonal part `(P, D, Q)[s]` of a specification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonalOrder {
    /// Seasonal AR order `P`.
    pub p: usize,
    /// Seasonal differencing order `D`.
    pub d: usize,
    /// Seasonal MA order `Q`.
    pub q: usize,
    /// Period `s` in observations.
    pub period: usize,
}

/// An unfitted ARIMAX(p,d,q)(P,D,Q)[s] specification with `n_exog`
/// regressors.
///
/// ```mermaid
/// graph LR
///     A["ArimaxSpec::new(p, d, q)"] -->|".with_seasonal(..)"| A
///     A -->|".with_exog(k)"| A
///     A -->|".fit(&data, criterion)?"| B["ArimaxFit"]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaxSpec {
    p: usize,
    d: usize,
    q: usize,
    seasonal: Option<SeasonalOrder>,
    n_exog: usize,
}

impl ArimaxSpec {
    /// Creates a non-seasonal ARIMA(p,d,q) specification without regressors.
    ///
    /// # Example
    ///
    /// ```
    /// use condor_arimax::ArimaxSpec;
    ///
    /// let spec = ArimaxSpec::new(2, 1, 1).with_exog(1);
    /// assert_eq!(spec.to_string(), "ARIMAX(2,1,1)+1x");
    /// ```
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self {
            p,
            d,
            q,
            seasonal: None,
            n_exog: 0,
        }
    }

    /// Adds a seasonal part. A period below 2 removes it.
    pub fn with_seasonal(mut self, p: usize, d: usize, q: usize, period: usize) -> Self {
        self.seasonal = (period >= 2).then_some(SeasonalOrder { p, d, q, period });
        self
    }

    /// Sets the number of exogenous regressors.
    pub fn with_exog(mut self, n_exog: usize) -> Self {
        self.n_exog = n_exog;
        self
    }

    /// Non-seasonal AR order.
    pub fn p(&self) -> usize {
        self.p
    }

    /// Non-seasonal differencing order.
    pub fn d(&self) -> usize {
        self.d
    }

    /// Non-seasonal MA order.
    pub fn q(&self) -> usize {
        self.q
    }

    /// Seasonal part, if any.
    pub fn seasonal(&self) -> Option<SeasonalOrder> {
        self.seasonal
    }

    /// Number of exogenous regressors.
    pub fn n_exog(&self) -> usize {
        self.n_exog
    }

    /// Seasonal `(P, D, Q, s)`, zeros when non-seasonal.
    pub(crate) fn seasonal_parts(&self) -> (usize, usize, usize, usize) {
        self.seasonal
            .map_or((0, 0, 0, 0), |s| (s.p, s.d, s.q, s.period))
    }

    /// Observations consumed by differencing: `d + D * s`.
    pub fn differencing_loss(&self) -> usize {
        let (_, sd, _, s) = self.seasonal_parts();
        self.d + sd * s
    }

    /// Whether the mean equation carries an intercept.
    ///
    /// An intercept is estimated only while the total differencing order is
    /// at most one; with more differencing it would imply a polynomial drift.
    pub fn has_intercept(&self) -> bool {
        let (_, sd, _, _) = self.seasonal_parts();
        self.d + sd <= 1
    }

    /// Number of ARMA coefficients `p + q + P + Q`.
    pub fn n_arma(&self) -> usize {
        let (sp, _, sq, _) = self.seasonal_parts();
        self.p + self.q + sp + sq
    }

    /// Parameter count used by information criteria: ARMA coefficients,
    /// intercept, regressors and the innovation variance.
    pub fn n_params(&self) -> usize {
        self.n_arma() + usize::from(self.has_intercept()) + self.n_exog + 1
    }

    /// Largest lag of the expanded AR and MA polynomials.
    pub fn max_lag(&self) -> usize {
        let (sp, _, sq, s) = self.seasonal_parts();
        (self.p + sp * s).max(self.q + sq * s)
    }

    /// Lexicographic ordering key `(p, d, q, P, D, Q)`.
    pub(crate) fn order_key(&self) -> (usize, usize, usize, usize, usize, usize) {
        let (sp, sd, sq, _) = self.seasonal_parts();
        (self.p, self.d, self.q, sp, sd, sq)
    }

    /// Fits this specification by conditional sum of squares.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`ArimaxError::ExogMismatch`] | regressor count differs from `n_exog` |
    /// | [`ArimaxError::InsufficientData`] | differenced sample shorter than the lags need |
    /// | [`ArimaxError::ConstantData`] | differenced target has zero variance |
    /// | [`ArimaxError::Stats`] | singular regression design |
    /// | [`ArimaxError::Convergence`] | optimizer returned no usable parameters |
    pub fn fit(
        &self,
        data: &ModelData,
        criterion: InformationCriterion,
    ) -> Result<ArimaxFit, ArimaxError> {
        crate::optimizer::fit_arimax(*self, data, criterion)
    }
}

impl fmt::Display for ArimaxSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMAX({},{},{})", self.p, self.d, self.q)?;
        if let Some(s) = self.seasonal {
            write!(f, "({},{},{})[{}]", s.p, s.d, s.q, s.period)?;
        }
        if self.n_exog > 0 {
            write!(f, "+{}x", self.n_exog)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(ArimaxSpec::new(1, 0, 0).to_string(), "ARIMAX(1,0,0)");
        assert_eq!(
            ArimaxSpec::new(1, 1, 1)
                .with_seasonal(1, 1, 0, 7)
                .with_exog(2)
                .to_string(),
            "ARIMAX(1,1,1)(1,1,0)[7]+2x"
        );
    }

    #[test]
    fn short_period_drops_seasonal_part() {
        assert!(ArimaxSpec::new(1, 0, 0).with_seasonal(1, 0, 0, 1).seasonal().is_none());
    }

    #[test]
    fn parameter_count() {
        // 2 ARMA + intercept + 1 exog + variance
        assert_eq!(ArimaxSpec::new(1, 1, 1).with_exog(1).n_params(), 5);
        // d + D = 2: no intercept
        let spec = ArimaxSpec::new(1, 1, 0).with_seasonal(0, 1, 1, 12);
        assert!(!spec.has_intercept());
        assert_eq!(spec.n_params(), 3);
    }

    #[test]
    fn lags_and_loss() {
        let spec = ArimaxSpec::new(2, 1, 1).with_seasonal(1, 1, 1, 7);
        assert_eq!(spec.max_lag(), 9);
        assert_eq!(spec.differencing_loss(), 8);
    }
}
