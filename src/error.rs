//! Error types for the I/O boundary (config and snapshot loading).
//!
//! The reconciliation engine itself is total and never returns these;
//! they only come from reading files the engine is fed from.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Could not find home directory")]
    HomeDirUnavailable,

    #[error("Config file not found at {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Expected a JSON array of rows in {}", .0.display())]
    NotAnArray(PathBuf),

    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No booking with id {0}")]
    BookingNotFound(String),
}

impl ReconcileError {
    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReconcileError::HomeDirUnavailable => "Pass the config path explicitly with --config.",
            ReconcileError::ConfigNotFound(_) => {
                "Create it with: { \"timezone\": \"Europe/Berlin\" } or omit --config."
            }
            ReconcileError::Io { .. } => "Check the file exists and is readable.",
            ReconcileError::Parse { .. } => "Check the file is valid JSON.",
            ReconcileError::NotAnArray(_) => {
                "Export the store query result as a JSON array (or {\"data\": [...]})."
            }
            ReconcileError::InvalidTimezone(_) => {
                "Use an IANA timezone name such as Europe/Berlin."
            }
            ReconcileError::Encode(_) => "This is a bug; please report it.",
            ReconcileError::BookingNotFound(_) => {
                "Check the id against the bookings file, or drop --booking."
            }
        }
    }
}
