//! Parallel forecasting of many independent series.

use condor_io::Series;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::ForecastError;
use crate::pipeline::StockDataForecast;
use crate::record::ForecastRecord;

/// A target series and the exogenous series that may explain it.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesInput {
    /// Series to forecast.
    pub series: Series,
    /// Explanatory series; aligned to the target's dates before use.
    pub exog: Vec<Series>,
}

impl SeriesInput {
    /// Input without exogenous series.
    pub fn new(series: Series) -> Self {
        Self {
            series,
            exog: Vec::new(),
        }
    }

    /// Adds exogenous series.
    pub fn with_exog(mut self, exog: Vec<Series>) -> Self {
        self.exog = exog;
        self
    }
}

/// A series that produced no forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSeries {
    /// Identifier of the skipped series.
    pub series_id: String,
    /// Short machine-readable reason, see [`ForecastError::skip_reason`].
    pub reason: String,
    /// Full error message.
    pub detail: String,
}

/// Outcome of [`run_batch`], in input order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Produced forecasts.
    pub succeeded: Vec<ForecastRecord>,
    /// Series that failed a stage.
    pub skipped: Vec<SkippedSeries>,
}

/// Forecasts every input on the rayon pool. A failing series is recorded
/// in [`RunSummary::skipped`] and never stops the batch.
///
/// # Errors
///
/// Only an invalid `config`; per-series failures are skips.
#[tracing::instrument(skip(inputs, config), fields(n = inputs.len()))]
pub fn run_batch(inputs: &[SeriesInput], config: &EngineConfig) -> Result<RunSummary, ForecastError> {
    let engine = StockDataForecast::new(config.clone())?;

    let results: Vec<Result<ForecastRecord, ForecastError>> =
        inputs.par_iter().map(|input| engine.run(input)).collect();

    let mut summary = RunSummary::default();
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(record) => summary.succeeded.push(record),
            Err(e) => {
                let reason = e.skip_reason();
                warn!(series = input.series.id(), reason, error = %e, "series skipped");
                summary.skipped.push(SkippedSeries {
                    series_id: input.series.id().to_string(),
                    reason: reason.to_string(),
                    detail: e.to_string(),
                });
            }
        }
    }

    info!(
        succeeded = summary.succeeded.len(),
        skipped = summary.skipped.len(),
        "batch complete"
    );
    Ok(summary)
}
