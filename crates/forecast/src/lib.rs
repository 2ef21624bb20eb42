//! # condor-forecast
//!
//! Classification of raw series, the single-model forecast lifecycle and
//! per-series and batch orchestration.
//!
//! ```mermaid
//! graph LR
//!     A["Series"] -->|"classify"| B["ClassificationReport"]
//!     B -->|"TransformStrategy::for_label"| C["plan + d + seasonal"]
//!     C -->|"ForecastArimax::fit"| D["ArimaxFit"]
//!     D -->|"forecast / prediction_interval"| E["ForecastRecord"]
//!     F["&[SeriesInput]"] -->|"run_batch (rayon)"| G["RunSummary"]
//! ```
//!
//! Every forecast covers [`HORIZON`] days.

mod batch;
mod classify;
mod config;
mod error;
mod model;
mod pipeline;
mod record;
mod strategy;

pub use batch::{RunSummary, SeriesInput, SkippedSeries, run_batch};
pub use classify::{Classification, ClassificationReport, ClassifierConfig, TREND_DEGREE, classify};
pub use config::{EngineConfig, HORIZON};
pub use error::ForecastError;
pub use model::ForecastArimax;
pub use pipeline::StockDataForecast;
pub use record::{ForecastDay, ForecastRecord, Provenance};
pub use strategy::TransformStrategy;
