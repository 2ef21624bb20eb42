//! # condor-io
//!
//! Bridges files and the forecast engine: reads dated series from CSV into
//! a validated [`Series`] and writes forecast records as JSON. Database
//! persistence is left to the caller.

mod error;
mod reader;
mod series;
mod validate;
mod writer;

pub use error::IoError;
pub use reader::{CsvConfig, read_series, read_series_csv};
pub use series::Series;
pub use writer::{write_forecasts_json, write_json};
