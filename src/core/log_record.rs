//! Log record structure

use super::clock::{current_thread_id, current_timestamp};
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};

/// A single log call, captured on the producing thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: LogLevel,
    pub thread_id: u64,
    pub message: String,
    pub timestamp: String,
}

impl LogRecord {
    /// Capture a record for the calling thread at the current time
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            thread_id: current_thread_id(),
            message: message.into(),
            timestamp: current_timestamp(),
        }
    }

    /// Build a record from already known parts
    pub fn from_parts(
        level: LogLevel,
        thread_id: u64,
        message: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            level,
            thread_id,
            message: message.into(),
            timestamp: timestamp.into(),
        }
    }
}
