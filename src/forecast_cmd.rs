//! Forecast command: read every configured series, forecast in parallel and
//! write the flat forecast rows.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{info, info_span};

use condor_forecast::{SeriesInput, run_batch};
use condor_io::{CsvConfig, read_series_csv, write_forecasts_json, write_json};

use crate::cli::ForecastArgs;
use crate::config::{self, SeriesToml};
use crate::convert;

/// Run the batch forecast pipeline.
pub fn run(args: ForecastArgs) -> Result<()> {
    let _cmd = info_span!("forecast").entered();
    let config = config::load(&args.config)?;

    let output: PathBuf = args
        .output
        .or_else(|| config.io.output.clone())
        .ok_or_else(|| anyhow::anyhow!("no output path: set [io].output in config or use --output"))?;
    if config.series.is_empty() {
        bail!("no series configured: add at least one [[series]] table");
    }

    let csv_cfg = convert::build_csv_config(&config.io)?;
    let engine_cfg = convert::build_engine_config(&config)?;

    let inputs = config
        .series
        .iter()
        .map(|s| read_input(s, &csv_cfg))
        .collect::<Result<Vec<_>>>()?;
    info!(n_series = inputs.len(), "series loaded");

    let summary = run_batch(&inputs, &engine_cfg).context("invalid engine configuration")?;

    let rows: Vec<Value> = summary.succeeded.iter().map(|r| r.to_row()).collect();
    write_forecasts_json(&output, &rows)
        .with_context(|| format!("failed to write forecasts: {}", output.display()))?;

    if !summary.skipped.is_empty() {
        let skipped_path = output.with_extension("skipped.json");
        write_json(&skipped_path, &summary.skipped).with_context(|| {
            format!("failed to write skipped series: {}", skipped_path.display())
        })?;
        info!(path = %skipped_path.display(), n = summary.skipped.len(), "skipped series written");
    }

    info!(
        succeeded = summary.succeeded.len(),
        skipped = summary.skipped.len(),
        path = %output.display(),
        "forecast complete"
    );
    Ok(())
}

/// Reads a target series and its exogenous series.
fn read_input(series: &SeriesToml, csv_cfg: &CsvConfig) -> Result<SeriesInput> {
    let target = read_series_csv(&series.path, &series.id, csv_cfg)
        .with_context(|| format!("failed to read series {}", series.id))?;
    let exog = series
        .exog
        .iter()
        .map(|x| {
            read_series_csv(&x.path, &x.id, csv_cfg).with_context(|| {
                format!("failed to read exogenous series {} of {}", x.id, series.id)
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(SeriesInput::new(target).with_exog(exog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    fn write_csv(path: &std::path::Path, n: usize) {
        let start = chrono::NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let mut csv = String::from("date,value\n");
        let mut x = 0.0_f64;
        for i in 0..n {
            let shock = ((i * 7919) % 101) as f64 / 50.0 - 1.0;
            x = 0.5 * x + shock;
            let date = start + chrono::Days::new(i as u64);
            writeln!(csv, "{},{}", date.format("%Y-%m-%d"), 30.0 + x).unwrap();
        }
        std::fs::write(path, csv).unwrap();
    }

    #[test]
    fn writes_rows_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(&dir.path().join("a.csv"), 150);
        std::fs::write(
            dir.path().join("flat.csv"),
            (0..60).fold(String::from("date,value\n"), |mut s, i| {
                let date = chrono::NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()
                    + chrono::Days::new(i);
                writeln!(s, "{},5.0", date.format("%Y-%m-%d")).unwrap();
                s
            }),
        )
        .unwrap();
        let toml = format!(
            "[search]\nmax_p = 1\nmax_q = 1\n\n\
             [[series]]\nid = \"A\"\npath = {:?}\n\n\
             [[series]]\nid = \"FLAT\"\npath = {:?}\n",
            dir.path().join("a.csv"),
            dir.path().join("flat.csv"),
        );
        let config_path = dir.path().join("condor.toml");
        std::fs::write(&config_path, toml).unwrap();
        let output = dir.path().join("out.json");

        run(ForecastArgs {
            config: config_path,
            output: Some(output.clone()),
        })
        .unwrap();

        let rows: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["series_id"], "A");
        assert!(rows[0]["day_15"].is_f64());

        let skipped: Value = serde_json::from_str(
            &std::fs::read_to_string(output.with_extension("skipped.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(skipped[0]["series_id"], "FLAT");
    }

    #[test]
    fn missing_output_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("condor.toml");
        std::fs::write(&config_path, "").unwrap();
        let err = run(ForecastArgs {
            config: config_path,
            output: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("no output path"));
    }
}
