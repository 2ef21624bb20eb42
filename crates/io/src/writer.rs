//! JSON output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::IoError;

/// Writes `value` to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`IoError::Write`] when the file cannot be created, serialized
/// into or flushed.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IoError> {
    let write_err = |reason: String| IoError::Write {
        path: path.to_path_buf(),
        reason,
    };
    let file = File::create(path).map_err(|e| write_err(e.to_string()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, value).map_err(|e| write_err(e.to_string()))?;
    out.write_all(b"\n").map_err(|e| write_err(e.to_string()))?;
    out.flush().map_err(|e| write_err(e.to_string()))?;
    Ok(())
}

/// Writes forecast records (or their flattened rows) as a JSON array.
///
/// # Errors
///
/// As [`write_json`].
pub fn write_forecasts_json<T: Serialize>(path: &Path, records: &[T]) -> Result<(), IoError> {
    write_json(path, records)?;
    info!(path = %path.display(), n = records.len(), "forecasts written");
    Ok(())
}
