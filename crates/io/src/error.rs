//! Error types for condor-io.

use std::path::PathBuf;

/// Error type for all fallible operations in the condor-io crate.
///
/// Covers missing files, unreadable or malformed CSV input, series that
/// violate the ordering and finiteness invariants, and write failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Returned when a file exists but cannot be opened or read.
    #[error("failed to read {}: {reason}", path.display())]
    Read {
        /// Path being read.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Returned when a CSV record cannot be parsed.
    #[error("parse error on line {line}: {reason}")]
    Parse {
        /// 1-based line number of the offending record.
        line: u64,
        /// What could not be parsed.
        reason: String,
    },

    /// Returned when a configured column is absent from the header.
    #[error("column '{name}' not found in header")]
    MissingColumn {
        /// Configured column name.
        name: String,
    },

    /// Returned when one or more series invariants fail.
    #[error("{count} series validation error(s): {details}")]
    InvalidSeries {
        /// Number of accumulated validation failures.
        count: usize,
        /// Human-readable summary of the failures.
        details: String,
    },

    /// Returned when output cannot be written.
    #[error("failed to write {}: {reason}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },
}
