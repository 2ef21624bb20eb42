//! # condor-stationarity
//!
//! Stationarity testing and invertible transforms that turn a raw series
//! into something an ARIMAX model can be fitted to.
//!
//! ```mermaid
//! graph LR
//!     A["raw series"] -->|"test_stationarity"| B["StationarityTest"]
//!     A -->|"make_stationary"| C["Stationarized { order, series }"]
//!     A -->|"transform_target(&plan)"| D["TransformedSeries"]
//!     D -->|".inverse() / .invert_forecast()"| A
//!     E["exogenous"] -->|"generate_transfer_function"| F["TransferFunction"]
//!     F -->|".align() / .extend()"| G["aligned regressor"]
//! ```
//!
//! ## Glossary
//!
//! | Term | Item | Meaning |
//! |------|------|---------|
//! | ADF | [`test_stationarity`] | Augmented Dickey-Fuller unit-root test with constant |
//! | ADF-ct | [`test_trend_stationarity`] | ADF with constant and linear trend |
//! | d | [`Stationarized::order`] | Number of regular differences |
//! | heads / tails | [`TransformStep::Difference`] | First / last values kept to undo differencing |
//! | lag | [`TransferFunction::lag`] | Steps by which a regressor leads the target |

mod adf;
mod config;
mod difference;
mod error;
mod stationarize;
mod transfer;
mod transform;
mod trend;

pub use adf::{
    Deterministic, MIN_OBSERVATIONS, StationarityTest, mackinnon_p_value, test_stationarity,
    test_trend_stationarity,
};
pub use config::StationarityConfig;
pub use difference::{
    difference, difference_anchors, integrate, integrate_forecast, seasonal_difference,
    seasonal_integrate, seasonal_integrate_forecast,
};
pub use error::StationarityError;
pub use stationarize::{Stationarized, make_stationary};
pub use transfer::{TransferConfig, TransferFunction, generate_transfer_function};
pub use transform::{
    Stabilizer, TransformPlan, TransformStep, TransformedSeries, transform_predictors,
    transform_target,
};
pub use trend::{determine_optimal_degree, fit_trend, trend_value};
