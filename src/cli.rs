use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Condor per-series ARIMAX forecast engine.
#[derive(Parser)]
#[command(
    name = "condor",
    version,
    about = "15-day ARIMAX forecasts with prediction intervals for daily series"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Forecast every series listed in the configuration.
    Forecast(ForecastArgs),
    /// Smooth one series and report confidence and prediction bands.
    Trends(TrendsArgs),
    /// Classify one series and print the report.
    Classify(ClassifyArgs),
}

/// Arguments for the `forecast` subcommand.
#[derive(clap::Args)]
pub struct ForecastArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "condor.toml")]
    pub config: PathBuf,

    /// Override output JSON path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `trends` subcommand.
#[derive(clap::Args)]
pub struct TrendsArgs {
    /// Path to the input CSV file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path for the JSON output; printed to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Optional TOML configuration for column names and smoothing.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `classify` subcommand.
#[derive(clap::Args)]
pub struct ClassifyArgs {
    /// Path to the input CSV file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Optional TOML configuration for column names and test settings.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
