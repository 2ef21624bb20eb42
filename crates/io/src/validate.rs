//! Accumulated validation utilities.
//!
//! [`ValidationCollector`] gathers every violation of a series invariant
//! into a single [`IoError::InvalidSeries`], so a caller sees all problems
//! of a file at once.

use chrono::NaiveDate;

use crate::error::IoError;

/// Accumulates validation errors and converts them into a single
/// [`IoError::InvalidSeries`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Move the errors of `other` into `self`.
    pub(crate) fn merge(&mut self, other: ValidationCollector) {
        self.errors.extend(other.errors);
    }

    /// Returns the number of recorded errors.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(())` if nothing was recorded, otherwise one
    /// [`IoError::InvalidSeries`] joining all messages with `"; "`.
    pub(crate) fn finish(self) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::InvalidSeries {
                count: self.errors.len(),
                details: self.errors.join("; "),
            })
        }
    }
}

/// Dates and values must have the same non-zero length.
pub(crate) fn validate_lengths(dates_len: usize, values_len: usize) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    if dates_len != values_len {
        c.push(format!(
            "dates length {dates_len} != values length {values_len}"
        ));
    }
    if values_len == 0 {
        c.push("series is empty");
    }
    c
}

/// Dates must be strictly increasing (which also rules out duplicates).
pub(crate) fn validate_dates_increasing(dates: &[NaiveDate]) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    for (i, w) in dates.windows(2).enumerate() {
        if w[1] <= w[0] {
            c.push(format!(
                "date {} at index {} does not follow {}",
                w[1],
                i + 1,
                w[0]
            ));
        }
    }
    c
}

/// Every value must be finite.
pub(crate) fn validate_finite(values: &[f64]) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    for (i, v) in values.iter().enumerate() {
        if !v.is_finite() {
            c.push(format!("non-finite value at index {i}: {v}"));
        }
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn collector_empty_is_ok() {
        assert!(ValidationCollector::new().finish().is_ok());
    }

    #[test]
    fn collector_joins_messages() {
        let mut c = ValidationCollector::new();
        c.push("error one");
        let mut other = ValidationCollector::new();
        other.push("error two");
        c.merge(other);
        assert_eq!(c.len(), 2);
        match c.finish().unwrap_err() {
            IoError::InvalidSeries { count, details } => {
                assert_eq!(count, 2);
                assert_eq!(details, "error one; error two");
            }
            other => panic!("expected IoError::InvalidSeries, got {other:?}"),
        }
    }

    #[test]
    fn lengths_checked() {
        assert_eq!(validate_lengths(3, 3).len(), 0);
        assert_eq!(validate_lengths(2, 3).len(), 1);
        assert_eq!(validate_lengths(0, 0).len(), 1);
    }

    #[test]
    fn duplicate_and_backward_dates_flagged() {
        let dates = [date(1), date(2), date(2), date(1)];
        let c = validate_dates_increasing(&dates);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn non_finite_flagged() {
        let c = validate_finite(&[1.0, f64::NAN, f64::INFINITY]);
        assert_eq!(c.len(), 2);
    }
}
