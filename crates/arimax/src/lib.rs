//! # condor-arimax
//!
//! Order search, conditional-sum-of-squares fitting and forecasting for
//! ARIMAX models with optional seasonal terms.
//!
//! ```mermaid
//! graph LR
//!     A["CandidateConfig"] -->|"generate_auto_arimax_test_params"| B["Vec&lt;ArimaxSpec&gt;"]
//!     B -->|"check_generated_arimax_params(n)"| C["viable specs"]
//!     C -->|"optimize_arimax_params (rayon)"| D["Vec&lt;CandidateOutcome&gt;"]
//!     D -->|"select_best"| E["ArimaxFit"]
//!     E -->|"arimax_forecast"| F["points"]
//!     F -->|"calculate_forecast_prediction_interval"| G["Vec&lt;Interval&gt;"]
//! ```
//!
//! `auto_arimax_optimizer` runs the first four steps.
//!
//! | Term | Meaning |
//! |------|---------|
//! | CSS | conditional sum of squares: innovations start at zero after the AR warm-up |
//! | PACF parametrization | `tanh` + Levinson-Durbin map from reals to stable coefficients |
//! | psi-weights | MA(infinity) weights of the integrated model |

mod candidates;
mod data;
mod differencing;
mod error;
mod fit;
mod forecast;
mod interval;
mod optimizer;
mod params;
mod selection;
mod spec;

pub use candidates::{
    CandidateConfig, SeasonalSearch, check_generated_arimax_params,
    generate_auto_arimax_test_params,
};
pub use data::ModelData;
pub use error::ArimaxError;
pub use fit::ArimaxFit;
pub use forecast::arimax_forecast;
pub use interval::calculate_forecast_prediction_interval;
pub use selection::{
    CandidateOutcome, SearchConfig, auto_arimax_optimizer, optimize_arimax_params, select_best,
};
pub use spec::{ArimaxSpec, SeasonalOrder};
