//! CSV series reader.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use tracing::info;

use crate::error::IoError;
use crate::series::Series;

/// Column names and formats for [`read_series_csv`].
///
/// Defaults: columns `date` and `value`, ISO dates (`%Y-%m-%d`), comma
/// delimiter.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvConfig {
    date_column: String,
    value_column: String,
    date_format: String,
    delimiter: u8,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            value_column: "value".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            delimiter: b',',
        }
    }
}

impl CsvConfig {
    /// Sets the date column name.
    pub fn with_date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = name.into();
        self
    }

    /// Sets the value column name.
    pub fn with_value_column(mut self, name: impl Into<String>) -> Self {
        self.value_column = name.into();
        self
    }

    /// Sets the `chrono` date format.
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = format.into();
        self
    }

    /// Sets the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Date column name.
    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    /// Value column name.
    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    /// Date format.
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Field delimiter.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize, IoError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| IoError::MissingColumn {
            name: name.to_string(),
        })
}

/// Reads a series from any CSV source.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::MissingColumn`] | a configured column is absent |
/// | [`IoError::Parse`] | malformed record, date or value (with line number) |
/// | [`IoError::InvalidSeries`] | parsed data violates series invariants |
pub fn read_series<R: std::io::Read>(
    source: R,
    id: &str,
    config: &CsvConfig,
) -> Result<Series, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| IoError::Parse {
            line: 1,
            reason: e.to_string(),
        })?
        .clone();
    let date_idx = column_index(&headers, &config.date_column)?;
    let value_idx = column_index(&headers, &config.value_column)?;

    let mut pairs = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IoError::Parse {
            line: e.position().map_or(0, |p| p.line()),
            reason: e.to_string(),
        })?;
        let line = record.position().map_or(0, |p| p.line());
        let field = |idx: usize, what: &str| {
            record.get(idx).ok_or_else(|| IoError::Parse {
                line,
                reason: format!("missing {what} field"),
            })
        };

        let raw_date = field(date_idx, "date")?;
        let date = NaiveDate::parse_from_str(raw_date, &config.date_format).map_err(|e| {
            IoError::Parse {
                line,
                reason: format!("invalid date '{raw_date}': {e}"),
            }
        })?;
        let raw_value = field(value_idx, "value")?;
        let value: f64 = raw_value.parse().map_err(|_| IoError::Parse {
            line,
            reason: format!("invalid value '{raw_value}'"),
        })?;
        pairs.push((date, value));
    }

    Series::from_pairs(id, pairs)
}

/// Reads a series from a CSV file; the series id is `id`.
///
/// # Errors
///
/// As [`read_series`], plus [`IoError::FileNotFound`] and
/// [`IoError::Read`] for file-level failures.
pub fn read_series_csv(path: &Path, id: &str, config: &CsvConfig) -> Result<Series, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(|e| IoError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let series = read_series(file, id, config)?;
    info!(path = %path.display(), id, n = series.len(), "series read");
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_default_columns() {
        let csv = "date,value\n2024-01-01,1.5\n2024-01-02,2.5\n";
        let s = read_series(csv.as_bytes(), "a", &CsvConfig::default()).unwrap();
        assert_eq!(s.values(), &[1.5, 2.5]);
        assert_eq!(s.last_date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn custom_columns_and_delimiter() {
        let csv = "day;open;close\n02/01/2024;1;3\n03/01/2024;2;4\n";
        let cfg = CsvConfig::default()
            .with_date_column("day")
            .with_value_column("close")
            .with_date_format("%d/%m/%Y")
            .with_delimiter(b';');
        let s = read_series(csv.as_bytes(), "a", &cfg).unwrap();
        assert_eq!(s.values(), &[3.0, 4.0]);
    }

    #[test]
    fn bad_value_reports_line() {
        let csv = "date,value\n2024-01-01,1.0\n2024-01-02,abc\n";
        let err = read_series(csv.as_bytes(), "a", &CsvConfig::default()).unwrap_err();
        assert_eq!(
            err,
            IoError::Parse {
                line: 3,
                reason: "invalid value 'abc'".to_string()
            }
        );
    }

    #[test]
    fn bad_date_reports_line() {
        let csv = "date,value\n2024-02-30,1.0\n";
        match read_series(csv.as_bytes(), "a", &CsvConfig::default()).unwrap_err() {
            IoError::Parse { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("2024-02-30"));
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn missing_column() {
        let csv = "when,value\n2024-01-01,1.0\n";
        assert_eq!(
            read_series(csv.as_bytes(), "a", &CsvConfig::default()).unwrap_err(),
            IoError::MissingColumn {
                name: "date".to_string()
            }
        );
    }

    #[test]
    fn unordered_dates_rejected() {
        let csv = "date,value\n2024-01-02,1.0\n2024-01-01,2.0\n";
        assert!(matches!(
            read_series(csv.as_bytes(), "a", &CsvConfig::default()),
            Err(IoError::InvalidSeries { .. })
        ));
    }
}
