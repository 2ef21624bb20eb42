//! # condor-smooth
//!
//! Robust LOWESS smoothing and the interval layer of the forecast engine.
//!
//! ```mermaid
//! graph LR
//!     A["series"] -->|"smooth_lowess(&cfg)"| B["smoothed"]
//!     B -->|"calculate_confidence_region"| C["curve band"]
//!     B -->|"smoothing_prediction_region"| D["observation band"]
//!     E["forecast points + step variances"] -->|"calculate_prediction_region"| F["Vec&lt;Interval&gt;"]
//!     F -->|"enforce_monotone_width"| F
//! ```
//!
//! Defaults: window fraction 0.3, two robustifying passes.

mod bands;
mod error;
mod lowess;
mod region;

pub use bands::{TrendBands, trend_bands};
pub use error::SmoothError;
pub use lowess::{LowessConfig, residual_variance, smooth_lowess};
pub use region::{
    Interval, calculate_confidence_region, calculate_prediction_region, enforce_monotone_width,
    smoothing_prediction_region,
};
