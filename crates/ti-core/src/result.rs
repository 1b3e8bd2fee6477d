//! Shared result-writing helpers.
//!
//! Each producer crate (`ti-exsearch`, `ti-flex`, `ti-sweep`) owns its own
//! record type and manifest layout; this module only holds the pieces
//! that are genuinely identical across all three: a small shared writer
//! pair rather than a generic store.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::{TiError, TiResult};

/// Serialize `value` as pretty JSON to `path`, returning the path written.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> TiResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| TiError::Other(format!("failed to serialize json: {e}")))?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Write `rows` as CSV to `path` using `csv::Writer`'s serde integration.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> TiResult<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| TiError::Other(format!("failed to open csv writer: {e}")))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| TiError::Other(format!("failed to serialize csv row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| TiError::Other(format!("failed to flush csv writer: {e}")))?;
    Ok(())
}
