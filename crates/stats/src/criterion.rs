//! Information criteria for model and degree selection.

use serde::{Deserialize, Serialize};

/// Model-selection score balancing fit against parameter count.
///
/// Lower is better for every variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InformationCriterion {
    /// Akaike: `2k - 2 lnL`.
    Aic,
    /// Small-sample corrected Akaike: `AIC + 2k(k+1) / (n - k - 1)`.
    Aicc,
    /// Bayesian (Schwarz): `k ln(n) - 2 lnL`.
    #[default]
    Bic,
}

impl InformationCriterion {
    /// Scores a fit with log-likelihood `log_likelihood`, `k` estimated
    /// parameters and `n` observations.
    ///
    /// AICc returns `f64::INFINITY` when `n <= k + 1`.
    pub fn score(self, log_likelihood: f64, k: usize, n: usize) -> f64 {
        let kf = k as f64;
        let nf = n as f64;
        let aic = 2.0 * kf - 2.0 * log_likelihood;
        match self {
            Self::Aic => aic,
            Self::Aicc => {
                if n <= k + 1 {
                    f64::INFINITY
                } else {
                    aic + 2.0 * kf * (kf + 1.0) / (nf - kf - 1.0)
                }
            }
            Self::Bic => kf * nf.ln() - 2.0 * log_likelihood,
        }
    }

    /// Short upper-case name, e.g. `"BIC"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Aic => "AIC",
            Self::Aicc => "AICc",
            Self::Bic => "BIC",
        }
    }
}

impl std::fmt::Display for InformationCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn aic_formula() {
        // k = 3, lnL = -100 -> 6 + 200
        assert_relative_eq!(InformationCriterion::Aic.score(-100.0, 3, 50), 206.0);
    }

    #[test]
    fn bic_formula() {
        let expected = 3.0 * 50f64.ln() + 200.0;
        assert_relative_eq!(InformationCriterion::Bic.score(-100.0, 3, 50), expected);
    }

    #[test]
    fn aicc_formula_and_guard() {
        let expected = 206.0 + 2.0 * 3.0 * 4.0 / (50.0 - 3.0 - 1.0);
        assert_relative_eq!(InformationCriterion::Aicc.score(-100.0, 3, 50), expected);
        assert_eq!(
            InformationCriterion::Aicc.score(-100.0, 3, 4),
            f64::INFINITY
        );
    }

    #[test]
    fn default_is_bic() {
        assert_eq!(InformationCriterion::default(), InformationCriterion::Bic);
    }

    #[test]
    fn names() {
        assert_eq!(InformationCriterion::Aicc.to_string(), "AICc");
    }
}
