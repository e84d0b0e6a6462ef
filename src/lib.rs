//! # Rust Worker Logger
//!
//! A thread-safe logger that decouples log calls from I/O: any number of
//! threads enqueue records, and one background worker per logger formats and
//! writes them to a file and/or the console.
//!
//! ## Features
//!
//! - **Non-blocking calls**: producers only append to an in-memory queue
//! - **Single writer**: the worker is the only code touching the sinks
//! - **Lossless shutdown**: dropping a logger waits until every queued record is written
//! - **Optional bound**: bounded queues with block or drop overflow policies
//!
//! ```no_run
//! use rust_worker_logger::prelude::*;
//!
//! let logger = Logger::builder()
//!     .name("WebApp")
//!     .log_file_path("logs/example.log")
//!     .print_to_console(true)
//!     .log_self_name(true)
//!     .build()?;
//!
//! logger.critical("This is a critical issue from the 'WebApp' logger.");
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        DefaultFormatter, LineFormatter, LogLevel, LogRecord, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, OverflowPolicy, Result,
    };
    pub use crate::sinks::{ConsoleSink, FileSink};
}

pub use crate::core::{
    current_thread_id, current_timestamp, Admission, DefaultFormatter, LineFormatter, LogLevel,
    LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OverflowPolicy,
    RecordQueue, Result, Sink, TIMESTAMP_FORMAT,
};
pub use sinks::{ConsoleSink, FileSink};
