//! Runtime configuration from environment variables.
//!
//! All paths resolve relative to the working directory.

use std::path::PathBuf;

/// Default scaler artifact location.
pub const DEFAULT_SCALER_PATH: &str = "models/scaler.json";

/// Default classifier artifact location.
pub const DEFAULT_CLASSIFIER_PATH: &str = "models/voting_classifier.json";

/// Default log file (used when the TUI owns the terminal).
pub const DEFAULT_LOG_FILE: &str = "cardiopredict.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve to "log to file?" given whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub scaler_path: PathBuf,
    pub classifier_path: PathBuf,
    /// Expected SHA-256 (hex) of the scaler file
    pub scaler_sha256: Option<String>,
    /// Expected SHA-256 (hex) of the classifier file
    pub classifier_sha256: Option<String>,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scaler_path: PathBuf::from(DEFAULT_SCALER_PATH),
            classifier_path: PathBuf::from(DEFAULT_CLASSIFIER_PATH),
            scaler_sha256: None,
            classifier_sha256: None,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            scaler_path: non_empty("CARDIO_SCALER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.scaler_path),
            classifier_path: non_empty("CARDIO_CLASSIFIER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.classifier_path),
            scaler_sha256: non_empty("CARDIO_SCALER_SHA256"),
            classifier_sha256: non_empty("CARDIO_CLASSIFIER_SHA256"),
            log_mode: non_empty("CARDIO_LOG_MODE")
                .map(|v| LogMode::parse(&v))
                .unwrap_or(defaults.log_mode),
            log_file: non_empty("CARDIO_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.scaler_path, PathBuf::from("models/scaler.json"));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("CARDIO_SCALER_PATH", "/srv/scaler.json"),
            ("CARDIO_CLASSIFIER_SHA256", "abcd"),
            ("CARDIO_LOG_MODE", "STDOUT"),
            ("CARDIO_LOG_FILE", "  "),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::from_lookup(|k| env.get(k).map(|v| (*v).to_string()));

        assert_eq!(config.scaler_path, PathBuf::from("/srv/scaler.json"));
        assert_eq!(config.classifier_path, PathBuf::from(DEFAULT_CLASSIFIER_PATH));
        assert_eq!(config.classifier_sha256.as_deref(), Some("abcd"));
        assert_eq!(config.log_mode, LogMode::Stdout);
        // Blank values fall back to defaults
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
        assert_eq!(LogMode::parse("nonsense"), LogMode::Auto);
    }
}
