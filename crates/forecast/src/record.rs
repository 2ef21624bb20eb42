//! Forecast records and their provenance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::classify::Classification;
use crate::config::HORIZON;
use crate::error::ForecastError;

/// Point forecast and prediction band for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Point forecast.
    pub point: f64,
    /// Lower prediction bound.
    pub lower: f64,
    /// Upper prediction bound.
    pub upper: f64,
}

/// How a forecast was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Classification label of the raw series.
    pub label: Classification,
    /// Transform labels in application order, model differencing included.
    pub transforms: Vec<String>,
    /// Selected model order, e.g. `ARIMAX(1,1,0)`.
    pub order: String,
    /// Ranking criterion name.
    pub criterion: String,
    /// Criterion value of the selected model.
    pub score: f64,
    /// Lag of each exogenous series' transfer function.
    pub exogenous_lags: Vec<usize>,
    /// Whether the forecast points were re-smoothed.
    pub smoothing_applied: bool,
}

/// The forecast of one series: exactly [`HORIZON`] days after
/// `forecast_date`, the date of the last observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    series_id: String,
    forecast_date: NaiveDate,
    days: Vec<ForecastDay>,
    provenance: Provenance,
}

impl ForecastRecord {
    /// Builds a record.
    ///
    /// # Errors
    ///
    /// [`ForecastError::InvalidSeries`] when `days` does not hold exactly
    /// [`HORIZON`] entries or a value is not finite.
    pub fn new(
        series_id: impl Into<String>,
        forecast_date: NaiveDate,
        days: Vec<ForecastDay>,
        provenance: Provenance,
    ) -> Result<Self, ForecastError> {
        let series_id = series_id.into();
        if days.len() != HORIZON {
            return Err(ForecastError::InvalidSeries {
                reason: format!(
                    "forecast for '{series_id}' has {} days, expected {HORIZON}",
                    days.len()
                ),
            });
        }
        if let Some(i) = days
            .iter()
            .position(|d| !(d.point.is_finite() && d.lower.is_finite() && d.upper.is_finite()))
        {
            return Err(ForecastError::InvalidSeries {
                reason: format!("forecast for '{series_id}' is not finite on day {}", i + 1),
            });
        }
        Ok(Self {
            series_id,
            forecast_date,
            days,
            provenance,
        })
    }

    /// Series identifier.
    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    /// Date of the last observation.
    pub fn forecast_date(&self) -> NaiveDate {
        self.forecast_date
    }

    /// Forecast days in order.
    pub fn days(&self) -> &[ForecastDay] {
        &self.days
    }

    /// How the forecast was produced.
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Flat table row: `series_id`, `forecast_date`, `day_1..day_15`,
    /// `lower_1..lower_15`, `upper_1..upper_15` and `provenance`.
    pub fn to_row(&self) -> Value {
        let mut row = Map::new();
        row.insert("series_id".into(), json!(self.series_id));
        row.insert(
            "forecast_date".into(),
            json!(self.forecast_date.format("%Y-%m-%d").to_string()),
        );
        for (i, day) in self.days.iter().enumerate() {
            row.insert(format!("day_{}", i + 1), json!(day.point));
        }
        for (i, day) in self.days.iter().enumerate() {
            row.insert(format!("lower_{}", i + 1), json!(day.lower));
        }
        for (i, day) in self.days.iter().enumerate() {
            row.insert(format!("upper_{}", i + 1), json!(day.upper));
        }
        row.insert("provenance".into(), json!(self.provenance));
        Value::Object(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provenance() -> Provenance {
        Provenance {
            label: Classification::Stationary,
            transforms: vec!["log".into()],
            order: "ARIMAX(1,0,0)".into(),
            criterion: "BIC".into(),
            score: 12.5,
            exogenous_lags: vec![2],
            smoothing_applied: false,
        }
    }

    fn days(n: usize) -> Vec<ForecastDay> {
        (0..n)
            .map(|i| ForecastDay {
                point: i as f64,
                lower: i as f64 - 1.0,
                upper: i as f64 + 1.0,
            })
            .collect()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    #[test]
    fn wrong_day_count_rejected() {
        let err = ForecastRecord::new("a", date(), days(14), provenance()).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InvalidSeries {
                reason: "forecast for 'a' has 14 days, expected 15".into()
            }
        );
    }

    #[test]
    fn non_finite_rejected() {
        let mut d = days(15);
        d[3].upper = f64::INFINITY;
        assert!(ForecastRecord::new("a", date(), d, provenance()).is_err());
    }

    #[test]
    fn row_is_flat() {
        let record = ForecastRecord::new("a", date(), days(15), provenance()).unwrap();
        let row = record.to_row();
        assert_eq!(row["series_id"], "a");
        assert_eq!(row["forecast_date"], "2024-03-31");
        assert_eq!(row["day_1"], 0.0);
        assert_eq!(row["lower_15"], 13.0);
        assert_eq!(row["upper_15"], 15.0);
        assert_eq!(row["provenance"]["label"], "stationary");
        assert_eq!(row["provenance"]["exogenous_lags"][0], 2);
        assert_eq!(row.as_object().unwrap().len(), 2 + 3 * 15 + 1);
    }
}
