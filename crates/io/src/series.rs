//! Dated observation series.

use chrono::NaiveDate;

use crate::error::IoError;
use crate::validate::{
    ValidationCollector, validate_dates_increasing, validate_finite, validate_lengths,
};

/// An identified series of `(date, value)` observations.
///
/// Dates are strictly increasing, values finite, and the series is never
/// empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    id: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl Series {
    /// Creates a series after validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidSeries`] listing every violation:
    /// mismatched lengths, an empty series, non-increasing dates or
    /// non-finite values.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use condor_io::Series;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
    /// let s = Series::new("ACME", vec![d(1), d(4)], vec![10.0, 10.5]).unwrap();
    /// assert_eq!(s.last_date(), d(4));
    /// assert!(Series::new("ACME", vec![d(4), d(1)], vec![1.0, 2.0]).is_err());
    /// ```
    pub fn new(
        id: impl Into<String>,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    ) -> Result<Self, IoError> {
        let mut c = ValidationCollector::new();
        c.merge(validate_lengths(dates.len(), values.len()));
        c.merge(validate_dates_increasing(&dates));
        c.merge(validate_finite(&values));
        c.finish()?;
        Ok(Self {
            id: id.into(),
            dates,
            values,
        })
    }

    /// Builds a series from `(date, value)` pairs.
    pub fn from_pairs(
        id: impl Into<String>,
        pairs: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Result<Self, IoError> {
        let (dates, values) = pairs.into_iter().unzip();
        Self::new(id, dates, values)
    }

    /// Series identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Observation dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Observed values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; construction rejects empty series.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Date of the first observation.
    pub fn first_date(&self) -> NaiveDate {
        self.dates[0]
    }

    /// Date of the last observation.
    pub fn last_date(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    /// The observations dated on or after `start`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidSeries`] when no observation remains.
    pub fn since(&self, start: NaiveDate) -> Result<Self, IoError> {
        let from = self.dates.partition_point(|d| *d < start);
        Self::new(
            self.id.clone(),
            self.dates[from..].to_vec(),
            self.values[from..].to_vec(),
        )
    }

    /// Values of this series on `dates`: the latest observation on or
    /// before each date. `dates` must be sorted.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidSeries`] when a date precedes the first
    /// observation; later values are never carried backwards.
    pub fn align_to(&self, dates: &[NaiveDate]) -> Result<Vec<f64>, IoError> {
        if let Some(&early) = dates.first()
            && early < self.first_date()
        {
            return Err(IoError::InvalidSeries {
                count: 1,
                details: format!(
                    "{early} precedes the first observation of '{}' ({})",
                    self.id,
                    self.first_date()
                ),
            });
        }
        let mut idx = 0;
        Ok(dates
            .iter()
            .map(|d| {
                while idx + 1 < self.dates.len() && self.dates[idx + 1] <= *d {
                    idx += 1;
                }
                self.values[idx]
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[test]
    fn collects_all_violations() {
        let err = Series::new("x", vec![d(2), d(1), d(3)], vec![1.0, f64::NAN]).unwrap_err();
        match err {
            IoError::InvalidSeries { count, .. } => assert_eq!(count, 3),
            other => panic!("expected InvalidSeries, got {other:?}"),
        }
    }

    #[test]
    fn rejects_empty() {
        assert!(Series::new("x", vec![], vec![]).is_err());
    }

    #[test]
    fn from_pairs_round_trip() {
        let s = Series::from_pairs("x", [(d(1), 1.0), (d(2), 2.0)]).unwrap();
        assert_eq!(s.id(), "x");
        assert_eq!(s.values(), &[1.0, 2.0]);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn align_carries_last_observation() {
        let exog = Series::new("x", vec![d(2), d(5), d(9)], vec![1.0, 2.0, 3.0]).unwrap();
        let aligned = exog.align_to(&[d(2), d(3), d(5), d(8), d(10)]).unwrap();
        assert_eq!(aligned, vec![1.0, 1.0, 2.0, 2.0, 3.0]);
    }

    #[test]
    fn align_rejects_dates_before_first_observation() {
        let exog = Series::new("x", vec![d(2), d(5)], vec![1.0, 2.0]).unwrap();
        let err = exog.align_to(&[d(1), d(2)]).unwrap_err();
        match err {
            IoError::InvalidSeries { count, details } => {
                assert_eq!(count, 1);
                assert!(details.contains("2024-05-01"), "{details}");
            }
            other => panic!("expected InvalidSeries, got {other:?}"),
        }
    }

    #[test]
    fn since_drops_earlier_observations() {
        let s = Series::new("x", vec![d(1), d(3), d(6)], vec![1.0, 2.0, 3.0]).unwrap();
        let tail = s.since(d(2)).unwrap();
        assert_eq!(tail.dates(), &[d(3), d(6)]);
        assert_eq!(tail.values(), &[2.0, 3.0]);
        assert_eq!(tail.first_date(), d(3));
        assert!(s.since(d(7)).is_err());
    }
}
