//! Trends command: LOWESS trend of one series with its bands.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, info_span};

use condor_forecast::StockDataForecast;
use condor_io::{Series, read_series_csv, write_json};

use crate::cli::TrendsArgs;
use crate::config;
use crate::convert;

/// One row of the trends table.
#[derive(Debug, Serialize)]
struct TrendRow {
    date: NaiveDate,
    value: f64,
    smoothed: f64,
    lower_ci: f64,
    upper_ci: f64,
    lower_pi: f64,
    upper_pi: f64,
}

/// Series id used for a CSV file: its stem, or the whole name.
pub fn series_id(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

/// Reads the series named by `input` using the configured CSV layout.
pub fn read_input(input: &Path, config: &config::CondorConfig) -> Result<Series> {
    let csv_cfg = convert::build_csv_config(&config.io)?;
    read_series_csv(input, &series_id(input), &csv_cfg)
        .with_context(|| format!("failed to read series: {}", input.display()))
}

/// Run the trends analysis.
pub fn run(args: TrendsArgs) -> Result<()> {
    let _cmd = info_span!("trends").entered();
    let config = config::load_or_default(args.config.as_deref())?;
    let series = read_input(&args.input, &config)?;
    let engine = StockDataForecast::new(convert::build_engine_config(&config)?)
        .context("invalid engine configuration")?;

    let bands = engine
        .trends(&series)
        .with_context(|| format!("trend analysis failed for {}", series.id()))?;
    let rows: Vec<TrendRow> = series
        .dates()
        .iter()
        .zip(series.values())
        .enumerate()
        .map(|(i, (&date, &value))| TrendRow {
            date,
            value,
            smoothed: bands.smoothed[i],
            lower_ci: bands.confidence[i].lower,
            upper_ci: bands.confidence[i].upper,
            lower_pi: bands.prediction[i].lower,
            upper_pi: bands.prediction[i].upper,
        })
        .collect();

    match args.output {
        Some(path) => {
            write_json(&path, &rows)
                .with_context(|| format!("failed to write trends: {}", path.display()))?;
            info!(path = %path.display(), n = rows.len(), "trends written");
        }
        None => println!(
            "{}",
            serde_json::to_string_pretty(&rows).context("failed to serialize trends")?
        ),
    }
    Ok(())
}
