//! Core logger types and traits

pub mod clock;
pub mod config;
pub mod error;
pub mod formatter;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod overflow_policy;
pub mod record_queue;
pub mod sink;
mod worker;

pub use clock::{current_thread_id, current_timestamp, TIMESTAMP_FORMAT};
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use formatter::{DefaultFormatter, LineFormatter};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use overflow_policy::OverflowPolicy;
pub use record_queue::{Admission, RecordQueue};
pub use sink::Sink;
