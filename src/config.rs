//! Runtime settings sourced from environment variables.
//!
//! Settings only affect logging and listing; classification thresholds are
//! fixed clinical constants and are never configurable.

use std::path::PathBuf;

use crate::adapters::sanitize::DEFAULT_SANITIZE_MAX_BYTES;

const LOG_MODE_ENV: &str = "CRANIOTRACK_LOG_MODE";
const LOG_FILE_ENV: &str = "CRANIOTRACK_LOG_FILE";
const SANITIZE_MAX_BYTES_ENV: &str = "CRANIOTRACK_SANITIZE_MAX_BYTES";
const HISTORY_PAGE_SIZE_ENV: &str = "CRANIOTRACK_HISTORY_PAGE_SIZE";

const DEFAULT_LOG_FILE: &str = "craniotrack.log";
const DEFAULT_HISTORY_PAGE_SIZE: usize = 50;

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// stderr, keeping stdout for command output
    Stderr,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub sanitize_max_bytes: usize,
    pub history_page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_mode: LogMode::Stderr,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            sanitize_max_bytes: DEFAULT_SANITIZE_MAX_BYTES,
            history_page_size: DEFAULT_HISTORY_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_mode = match lookup(LOG_MODE_ENV).as_deref().map(str::trim) {
            Some("file") => LogMode::File,
            _ => LogMode::Stderr,
        };

        let log_file = lookup(LOG_FILE_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map_or(defaults.log_file, PathBuf::from);

        Self {
            log_mode,
            log_file,
            sanitize_max_bytes: positive(lookup(SANITIZE_MAX_BYTES_ENV))
                .unwrap_or(defaults.sanitize_max_bytes),
            history_page_size: positive(lookup(HISTORY_PAGE_SIZE_ENV))
                .unwrap_or(defaults.history_page_size),
        }
    }
}

fn positive(value: Option<String>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&v| v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s, Settings::default());
        assert_eq!(s.log_mode, LogMode::Stderr);
        assert_eq!(s.history_page_size, 50);
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("CRANIOTRACK_LOG_MODE", "file"),
            ("CRANIOTRACK_LOG_FILE", "/var/log/cranio.log"),
            ("CRANIOTRACK_SANITIZE_MAX_BYTES", "4096"),
            ("CRANIOTRACK_HISTORY_PAGE_SIZE", " 20 "),
        ]);
        assert_eq!(s.log_mode, LogMode::File);
        assert_eq!(s.log_file, PathBuf::from("/var/log/cranio.log"));
        assert_eq!(s.sanitize_max_bytes, 4096);
        assert_eq!(s.history_page_size, 20);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let s = settings(&[
            ("CRANIOTRACK_LOG_MODE", "syslog"),
            ("CRANIOTRACK_LOG_FILE", "  "),
            ("CRANIOTRACK_SANITIZE_MAX_BYTES", "0"),
            ("CRANIOTRACK_HISTORY_PAGE_SIZE", "many"),
        ]);
        assert_eq!(s, Settings::default());
    }
}
