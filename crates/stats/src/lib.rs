//! # condor-stats
//!
//! Statistical primitives shared by the Condor forecast engine.
//!
//! ```mermaid
//! graph LR
//!     A["least_squares(&X, &y)?"] --> B["LeastSquares"]
//!     B --> C[".coefficients() / .residuals()"]
//!     B --> D[".log_likelihood()"]
//!     D --> E["InformationCriterion::score(lnL, k, n)"]
//!     F["negative_log_likelihood(&e, &NormalParams)"] --> E
//!     G["detect_level_shifts(&x, &cfg)?"] --> H["Vec&lt;LevelShift&gt;"]
//! ```
//!
//! ## Glossary
//!
//! | Term | Item | Meaning |
//! |------|------|---------|
//! | NLL | [`negative_log_likelihood`] | Gaussian negative log-likelihood of residuals |
//! | OLS | [`least_squares`] | Ordinary least squares via Householder QR |
//! | IC | [`InformationCriterion`] | AIC / AICc / BIC, lower is better |
//! | CUSUM | [`detect_level_shifts`] | Cumulative-sum test for mean shifts |

mod criterion;
mod descriptive;
mod distribution;
mod error;
mod level_shift;
mod likelihood;
mod regression;

pub use criterion::InformationCriterion;
pub use descriptive::{autocorrelation, mean, median, pearson_correlation};
pub use distribution::{kolmogorov_sf, normal_cdf, normal_quantile, two_sided_z};
pub use error::StatsError;
pub use level_shift::{LevelShift, LevelShiftConfig, detect_level_shifts};
pub use likelihood::{NormalParams, estimate_normal_params, negative_log_likelihood};
pub use regression::{LeastSquares, least_squares, polynomial_design};
