//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use crate::config::*;

use condor_forecast::EngineConfig;
use condor_io::CsvConfig;
use condor_smooth::LowessConfig;
use condor_stationarity::{StationarityConfig, TransferConfig};
use condor_stats::{InformationCriterion, LevelShiftConfig};

/// Parses an information criterion name into the corresponding enum variant.
pub fn parse_criterion(s: &str) -> Result<InformationCriterion> {
    match s.to_lowercase().as_str() {
        "aic" => Ok(InformationCriterion::Aic),
        "aicc" => Ok(InformationCriterion::Aicc),
        "bic" => Ok(InformationCriterion::Bic),
        other => bail!("unknown information criterion: {other:?}"),
    }
}

/// Parses a single-byte CSV delimiter.
pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s.as_bytes() {
        [b] => Ok(*b),
        _ if s == "\\t" => Ok(b'\t'),
        _ => bail!("delimiter must be a single byte, got {s:?}"),
    }
}

/// Builds a [`CsvConfig`] from the TOML I/O configuration.
pub fn build_csv_config(io: &IoToml) -> Result<CsvConfig> {
    Ok(CsvConfig::default()
        .with_date_column(&io.date_column)
        .with_value_column(&io.value_column)
        .with_date_format(&io.date_format)
        .with_delimiter(parse_delimiter(&io.delimiter)?))
}

/// Builds a [`StationarityConfig`] from the TOML stationarity section.
pub fn build_stationarity_config(st: &StationarityToml) -> StationarityConfig {
    let mut cfg = StationarityConfig::new()
        .with_significance(st.significance)
        .with_max_diff(st.max_diff);
    if let Some(lag) = st.max_lag {
        cfg = cfg.with_max_lag(lag);
    }
    cfg
}

/// Builds a [`TransferConfig`] from the TOML search section.
pub fn build_transfer_config(search: &SearchToml, criterion: InformationCriterion) -> TransferConfig {
    TransferConfig::new(search.transfer_max_lag)
        .with_max_degree(search.transfer_max_degree)
        .with_criterion(criterion)
}

/// Builds a [`LowessConfig`] from the TOML smoothing section.
pub fn build_lowess_config(smoothing: &SmoothingToml) -> LowessConfig {
    LowessConfig::new(smoothing.fraction).with_iterations(smoothing.iterations)
}

/// Builds the [`EngineConfig`] threaded through every forecast stage.
///
/// Ranges are checked later by [`EngineConfig::validate`].
pub fn build_engine_config(config: &CondorConfig) -> Result<EngineConfig> {
    let criterion = parse_criterion(&config.search.criterion)?;
    let st = &config.stationarity;
    Ok(EngineConfig::new()
        .with_stationarity(build_stationarity_config(st))
        .with_level_shift(LevelShiftConfig::new(st.level_shift_significance))
        .with_log_transform(st.log_transform)
        .with_seasonal_period(st.seasonal_period)
        .with_max_p(config.search.max_p)
        .with_max_q(config.search.max_q)
        .with_criterion(criterion)
        .with_tie_tolerance(config.search.tie_tolerance)
        .with_transfer(build_transfer_config(&config.search, criterion))
        .with_confidence(config.interval.confidence)
        .with_lowess(build_lowess_config(&config.smoothing))
        .with_resmooth(config.smoothing.resmooth))
}
