//! Classify command: print the classification report of one series.

use anyhow::{Context, Result};
use tracing::info_span;

use condor_forecast::StockDataForecast;

use crate::cli::ClassifyArgs;
use crate::config;
use crate::convert;
use crate::trends_cmd::read_input;

/// Run the classification and print the report as JSON.
pub fn run(args: ClassifyArgs) -> Result<()> {
    let _cmd = info_span!("classify").entered();
    let config = config::load_or_default(args.config.as_deref())?;
    let series = read_input(&args.input, &config)?;
    let engine = StockDataForecast::new(convert::build_engine_config(&config)?)
        .context("invalid engine configuration")?;

    let report = engine
        .classify(&series)
        .with_context(|| format!("classification failed for {}", series.id()))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to serialize report")?
    );
    Ok(())
}
