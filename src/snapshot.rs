//! Snapshot loading from exported store query results.
//!
//! Accepts a bare JSON array of rows or the `{ "data": [...] }` envelope the
//! store client returns. Rows are decoded one at a time so a single malformed
//! record is skipped instead of failing the refresh.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ReconcileError;
use crate::types::{Attachment, Booking};

/// Decode rows individually, skipping the ones that don't fit `T`.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>, kind: &str) -> Vec<T> {
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| match serde_json::from_value(row) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("Skipping {} row {}: {}", kind, i, e);
                None
            }
        })
        .collect();

    if decoded.len() < total {
        log::info!("Loaded {}/{} {} rows", decoded.len(), total, kind);
    }
    decoded
}

fn rows_of(value: Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(rows) => Some(rows),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(rows)) => Some(rows),
            _ => None,
        },
        _ => None,
    }
}

fn load_rows<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<Vec<T>, ReconcileError> {
    let content = fs::read_to_string(path).map_err(|source| ReconcileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| ReconcileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = rows_of(value).ok_or_else(|| ReconcileError::NotAnArray(path.to_path_buf()))?;
    Ok(decode_rows(rows, kind))
}

/// Load the booking store query result.
pub fn load_bookings(path: &Path) -> Result<Vec<Booking>, ReconcileError> {
    load_rows(path, "booking")
}

/// Load the attachment store query result.
pub fn load_attachments(path: &Path) -> Result<Vec<Attachment>, ReconcileError> {
    load_rows(path, "attachment")
}
