//! Logger configuration
//!
//! [`LoggerConfig`] is the plain data a [`Logger`](super::Logger) is built from.
//! It can be assembled with [`LoggerBuilder`](super::LoggerBuilder) or loaded
//! from JSON; missing fields take their defaults.

use super::{
    error::{LoggerError, Result},
    log_level::LogLevel,
    overflow_policy::OverflowPolicy,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Logger name, required and non-empty
    pub name: String,
    /// Log file, appended to; an empty path counts as no file
    pub log_file_path: Option<PathBuf>,
    /// Echo every line to standard output
    pub print_to_console: bool,
    /// Add ` [thread: <id>]` to every line
    pub log_thread_ids: bool,
    /// Render the level tag as `[<name> LEVEL]`
    pub log_self_name: bool,
    /// Records below this level are discarded at the call site
    pub minimum_log_level: LogLevel,
    /// Bound on pending records; `None` means unbounded
    pub queue_capacity: Option<usize>,
    /// What producers do when a bounded queue is full
    pub overflow_policy: OverflowPolicy,
    /// Hold an exclusive advisory lock on the log file
    pub lock_file: bool,
    /// Colorize console lines by level
    pub console_colors: bool,
}

impl LoggerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON
    ///
    /// ```
    /// use rust_worker_logger::{LoggerConfig, LogLevel};
    ///
    /// let config = LoggerConfig::from_json_str(
    ///     r#"{ "name": "api", "print_to_console": true, "minimum_log_level": "Warning" }"#,
    /// ).unwrap();
    /// assert_eq!(config.minimum_log_level, LogLevel::Warning);
    /// assert!(config.log_file_path.is_none());
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The log file path, unless unset or empty
    pub fn file_path(&self) -> Option<&Path> {
        self.log_file_path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Check the configuration without touching the filesystem
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(LoggerError::config("Logger", "name cannot be empty"));
        }
        if self.file_path().is_none() && !self.print_to_console {
            return Err(LoggerError::config(
                "Logger",
                "log file path cannot be empty if console output is disabled",
            ));
        }
        if self.queue_capacity == Some(0) {
            return Err(LoggerError::config("RecordQueue", "capacity must be at least 1"));
        }
        #[cfg(not(feature = "file-lock"))]
        {
            if self.lock_file {
                return Err(LoggerError::config(
                    "FileSink",
                    "file locking requires the `file-lock` feature",
                ));
            }
        }
        Ok(())
    }
}
