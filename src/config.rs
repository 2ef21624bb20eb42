use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Condor configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CondorConfig {
    /// I/O settings.
    #[serde(default)]
    pub io: IoToml,

    /// Unit-root test, transforms and classification.
    #[serde(default)]
    pub stationarity: StationarityToml,

    /// Order search and exogenous transfer functions.
    #[serde(default)]
    pub search: SearchToml,

    /// Prediction interval settings.
    #[serde(default)]
    pub interval: IntervalToml,

    /// LOWESS settings.
    #[serde(default)]
    pub smoothing: SmoothingToml,

    /// Series to forecast.
    #[serde(default)]
    pub series: Vec<SeriesToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoToml {
    pub output: Option<PathBuf>,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_value_column")]
    pub value_column: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for IoToml {
    fn default() -> Self {
        Self {
            output: None,
            date_column: default_date_column(),
            value_column: default_value_column(),
            date_format: default_date_format(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_date_column() -> String {
    "date".to_string()
}
fn default_value_column() -> String {
    "value".to_string()
}
fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}
fn default_delimiter() -> String {
    ",".to_string()
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StationarityToml {
    #[serde(default = "default_significance")]
    pub significance: f64,
    #[serde(default = "default_max_diff")]
    pub max_diff: usize,
    #[serde(default)]
    pub max_lag: Option<usize>,
    #[serde(default = "default_level_shift_significance")]
    pub level_shift_significance: f64,
    #[serde(default = "default_true")]
    pub log_transform: bool,
    #[serde(default)]
    pub seasonal_period: Option<usize>,
}

impl Default for StationarityToml {
    fn default() -> Self {
        Self {
            significance: default_significance(),
            max_diff: default_max_diff(),
            max_lag: None,
            level_shift_significance: default_level_shift_significance(),
            log_transform: true,
            seasonal_period: None,
        }
    }
}

fn default_significance() -> f64 {
    0.05
}
fn default_max_diff() -> usize {
    2
}
fn default_level_shift_significance() -> f64 {
    0.01
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchToml {
    #[serde(default = "default_max_order")]
    pub max_p: usize,
    #[serde(default = "default_max_order")]
    pub max_q: usize,
    #[serde(default = "default_criterion")]
    pub criterion: String,
    #[serde(default = "default_tie_tolerance")]
    pub tie_tolerance: f64,
    #[serde(default = "default_transfer_max_lag")]
    pub transfer_max_lag: usize,
    #[serde(default = "default_transfer_max_degree")]
    pub transfer_max_degree: usize,
}

impl Default for SearchToml {
    fn default() -> Self {
        Self {
            max_p: default_max_order(),
            max_q: default_max_order(),
            criterion: default_criterion(),
            tie_tolerance: default_tie_tolerance(),
            transfer_max_lag: default_transfer_max_lag(),
            transfer_max_degree: default_transfer_max_degree(),
        }
    }
}

fn default_max_order() -> usize {
    5
}
fn default_criterion() -> String {
    "bic".to_string()
}
fn default_tie_tolerance() -> f64 {
    1e-6
}
fn default_transfer_max_lag() -> usize {
    10
}
fn default_transfer_max_degree() -> usize {
    3
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntervalToml {
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

impl Default for IntervalToml {
    fn default() -> Self {
        Self {
            confidence: default_confidence(),
        }
    }
}

fn default_confidence() -> f64 {
    0.95
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmoothingToml {
    #[serde(default = "default_fraction")]
    pub fraction: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default)]
    pub resmooth: bool,
}

impl Default for SmoothingToml {
    fn default() -> Self {
        Self {
            fraction: default_fraction(),
            iterations: default_iterations(),
            resmooth: false,
        }
    }
}

fn default_fraction() -> f64 {
    0.3
}
fn default_iterations() -> usize {
    2
}

/// One target series and its exogenous inputs.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesToml {
    pub id: String,
    pub path: PathBuf,
    #[serde(default)]
    pub exog: Vec<ExogToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExogToml {
    pub id: String,
    pub path: PathBuf,
}

/// Reads and parses a TOML configuration file.
pub fn load(path: &Path) -> Result<CondorConfig> {
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&toml_str).context("failed to parse TOML config")
}

/// Loads `path` when given, defaults otherwise.
pub fn load_or_default(path: Option<&Path>) -> Result<CondorConfig> {
    path.map_or_else(|| Ok(CondorConfig::default()), load)
}
