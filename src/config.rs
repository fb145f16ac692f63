//! Display configuration stored in ~/.tripdesk/config.json
//!
//! Every field is defaulted, so an empty object (or no file at all) yields a
//! German dashboard in Europe/Berlin.

use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ReconcileError;

/// Fallback presentation timezone.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Berlin;

/// Display language for labels and quality messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    De,
    En,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileConfig {
    /// IANA name of the presentation timezone.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub locale: Locale,
    /// Shown instead of a time-of-day that is only a midnight placeholder.
    #[serde(default = "default_time_placeholder")]
    pub time_placeholder: String,
    /// AI confidence below this is flagged as a low-severity issue.
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f64,
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.name().to_string()
}

fn default_time_placeholder() -> String {
    "TBA".to_string()
}

fn default_low_confidence_threshold() -> f64 {
    crate::quality::DEFAULT_LOW_CONFIDENCE_THRESHOLD
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            locale: Locale::default(),
            time_placeholder: default_time_placeholder(),
            low_confidence_threshold: default_low_confidence_threshold(),
        }
    }
}

impl ReconcileConfig {
    /// Resolved presentation timezone. An unknown name falls back to
    /// Europe/Berlin so the engine stays total.
    pub fn tz(&self) -> Tz {
        match self.timezone.trim().parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                log::warn!(
                    "Unknown timezone '{}', falling back to {}",
                    self.timezone,
                    DEFAULT_TIMEZONE.name()
                );
                DEFAULT_TIMEZONE
            }
        }
    }

    /// Strict check for callers that would rather fail than fall back.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        self.timezone
            .trim()
            .parse::<Tz>()
            .map(|_| ())
            .map_err(|_| ReconcileError::InvalidTimezone(self.timezone.clone()))
    }
}

/// Default config location: ~/.tripdesk/config.json
pub fn config_path() -> Result<PathBuf, ReconcileError> {
    let home = dirs::home_dir().ok_or(ReconcileError::HomeDirUnavailable)?;
    Ok(home.join(".tripdesk").join("config.json"))
}

/// Load config from the default location. A missing file means defaults.
pub fn load_config() -> Result<ReconcileConfig, ReconcileError> {
    let path = config_path()?;
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(ReconcileConfig::default());
    }
    load_config_from(&path)
}

/// Load config from an explicit path, which must exist.
pub fn load_config_from(path: &Path) -> Result<ReconcileConfig, ReconcileError> {
    if !path.exists() {
        return Err(ReconcileError::ConfigNotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| ReconcileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ReconcileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: ReconcileConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ReconcileConfig::default());
        assert_eq!(config.tz(), chrono_tz::Europe::Berlin);
        assert_eq!(config.locale, Locale::De);
        assert_eq!(config.time_placeholder, "TBA");
        assert!((config.low_confidence_threshold - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_timezone_falls_back_but_fails_validation() {
        let config = ReconcileConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert_eq!(config.tz(), DEFAULT_TIMEZONE);
        assert!(matches!(
            config.validate(),
            Err(ReconcileError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "timezone": "America/New_York", "locale": "en", "timePlaceholder": "--" }"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.tz(), chrono_tz::America::New_York);
        assert_eq!(config.locale, Locale::En);
        assert_eq!(config.time_placeholder, "--");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_missing_and_malformed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("nope.json");
        assert!(matches!(
            load_config_from(&missing),
            Err(ReconcileError::ConfigNotFound(_))
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ timezone: ").unwrap();
        assert!(matches!(
            load_config_from(&broken),
            Err(ReconcileError::Parse { .. })
        ));
    }
}
