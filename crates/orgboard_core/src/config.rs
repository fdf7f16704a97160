//! Runtime configuration resolved from the environment.
//!
//! | Variable             | Default                         |
//! |----------------------|---------------------------------|
//! | `ORGBOARD_DB_PATH`   | `<temp>/orgboard.sqlite3`       |
//! | `ORGBOARD_LOG_LEVEL` | `debug` (debug) / `info` (release) |
//! | `ORGBOARD_LOG_DIR`   | `<temp>/orgboard-logs`          |
//!
//! Blank values fall back to defaults.

use crate::logging::{default_log_level, LogLevel, LoggingError};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "ORGBOARD_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "ORGBOARD_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "ORGBOARD_LOG_DIR";

const DEFAULT_DB_FILE: &str = "orgboard.sqlite3";
const DEFAULT_LOG_DIR: &str = "orgboard-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: LogLevel,
    pub log_dir: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let temp = std::env::temp_dir();
        Self {
            db_path: temp.join(DEFAULT_DB_FILE),
            log_level: default_log_level(),
            log_dir: temp.join(DEFAULT_LOG_DIR),
        }
    }
}

impl CoreConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves through `lookup` instead of the process environment.
    ///
    /// # Errors
    /// - `UnsupportedLevel` when the level variable names no known level.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LoggingError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let log_level = match value(LOG_LEVEL_VAR) {
            Some(raw) => LogLevel::parse(&raw)?,
            None => defaults.log_level,
        };
        Ok(Self {
            db_path: value(DB_PATH_VAR).map_or(defaults.db_path, PathBuf::from),
            log_level,
            log_dir: value(LOG_DIR_VAR).map_or(defaults.log_dir, PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR};
    use crate::logging::{LogLevel, LoggingError};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(config.db_path.ends_with("orgboard.sqlite3"));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[
            (DB_PATH_VAR, "/var/lib/orgboard/board.sqlite3"),
            (LOG_LEVEL_VAR, "WARN"),
            (LOG_DIR_VAR, "  "),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/orgboard/board.sqlite3"));
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(config.log_dir, CoreConfig::default().log_dir);
    }

    #[test]
    fn unknown_level_is_an_error() {
        assert!(matches!(
            CoreConfig::from_lookup(lookup(&[(LOG_LEVEL_VAR, "chatty")])),
            Err(LoggingError::UnsupportedLevel(_))
        ));
    }
}
