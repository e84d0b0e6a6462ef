//! Main logger implementation

use super::{
    config::LoggerConfig,
    error::{LoggerError, Result},
    formatter::{DefaultFormatter, LineFormatter},
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::LoggerMetrics,
    overflow_policy::OverflowPolicy,
    record_queue::{Admission, RecordQueue},
    sink::Sink,
    worker::{panic_message, Worker},
};
use crate::sinks::{ConsoleSink, FileSink};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Thread-safe logger backed by a single background writer
///
/// Logging calls only build a record and append it to an in-memory queue; the
/// worker thread formats and writes it. Dropping the logger (or calling
/// [`Logger::shutdown`]) blocks until every queued record has been written.
///
/// # Example
///
/// ```no_run
/// use rust_worker_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .name("WebApp")
///     .log_file_path("logs/app.log")
///     .print_to_console(true)
///     .log_thread_ids(true)
///     .build()?;
///
/// logger.info("Server started");
/// # Ok::<(), LoggerError>(())
/// ```
pub struct Logger {
    name: String,
    min_level: LogLevel,
    log_file_path: Option<PathBuf>,
    queue: Arc<RecordQueue>,
    /// Metrics for observability (dropped count, total written, etc.)
    metrics: Arc<LoggerMetrics>,
    worker: Option<JoinHandle<Result<()>>>,
}

impl Logger {
    /// Open the sinks described by `config` and start the worker
    ///
    /// Fails with [`LoggerError::InvalidConfiguration`] for an empty name or
    /// when neither a file nor the console is enabled, and with
    /// [`LoggerError::IoOperation`] when the log directory or file cannot be
    /// created or opened.
    pub fn new(config: LoggerConfig) -> Result<Self> {
        Self::with_formatter(config, None)
    }

    fn with_formatter(
        config: LoggerConfig,
        formatter: Option<Box<dyn LineFormatter>>,
    ) -> Result<Self> {
        config.validate()?;

        let mut sinks: Vec<Box<dyn Sink>> = Vec::new();
        if config.print_to_console {
            sinks.push(Box::new(ConsoleSink::with_colors(config.console_colors)));
        }

        let log_file_path = config.file_path().map(Path::to_path_buf);
        if let Some(ref path) = log_file_path {
            let file = FileSink::open(path)?;
            #[cfg(feature = "file-lock")]
            {
                if config.lock_file {
                    file.lock_exclusive()?;
                }
            }
            sinks.push(Box::new(file));
        }

        let formatter = formatter.unwrap_or_else(|| {
            Box::new(DefaultFormatter::new(
                config.log_thread_ids,
                config.log_self_name,
            ))
        });

        let queue = Arc::new(RecordQueue::with_capacity(
            config.queue_capacity,
            config.overflow_policy,
        ));
        let metrics = Arc::new(LoggerMetrics::new());

        let worker = Worker::new(
            config.name.clone(),
            Arc::clone(&queue),
            Arc::clone(&metrics),
            formatter,
            sinks,
        )
        .spawn()?;

        Ok(Self {
            name: config.name,
            min_level: config.minimum_log_level,
            log_file_path,
            queue,
            metrics,
            worker: Some(worker),
        })
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn minimum_log_level(&self) -> LogLevel {
        self.min_level
    }

    /// The log file, if one was configured
    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file_path.as_deref()
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Queue a message at `level`
    ///
    /// Below the minimum level this returns without building a record. Never
    /// performs I/O on the calling thread.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }

        let record = LogRecord::new(level, message);
        match self.queue.push(record) {
            Ok(Admission::Queued) => {
                self.metrics.record_enqueued();
            }
            Ok(Admission::QueuedAfterWait) => {
                self.metrics.record_queue_full();
                self.metrics.record_block();
                self.metrics.record_enqueued();
            }
            Ok(Admission::EvictedOldest) => {
                self.metrics.record_queue_full();
                self.metrics.record_enqueued();
                self.alert_dropped();
            }
            Err(LoggerError::QueueFull { .. }) => {
                self.metrics.record_queue_full();
                if self.queue.policy().may_block() {
                    self.metrics.record_block();
                }
                self.alert_dropped();
            }
            Err(_) => {
                // Logger is shutting down or its worker has failed
                self.metrics.record_dropped();
            }
        }
    }

    /// Count a dropped record and warn on the first and every 1000th drop
    fn alert_dropped(&self) {
        let dropped_count = self.metrics.record_dropped();
        if dropped_count == 0 || (dropped_count + 1) % 1000 == 0 {
            eprintln!(
                "[LOGGER WARNING] Logger '{}' queue full, {} records dropped under {} policy. \
                 Consider increasing the queue capacity.",
                self.name,
                dropped_count + 1,
                self.queue.policy()
            );
        }
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(LogLevel::Critical, message);
    }

    /// Number of records waiting for the worker
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether the worker thread is still accepting records
    pub fn is_running(&self) -> bool {
        !self.queue.is_shutdown()
            && self
                .worker
                .as_ref()
                .is_some_and(|handle| !handle.is_finished())
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Get the number of dropped records
    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    /// Stop the worker after it has written every queued record
    ///
    /// Blocks until the worker thread has exited and its sinks are flushed.
    /// Calls made after shutdown are discarded and counted as dropped.
    /// Calling this more than once is harmless; only the first call can
    /// return the worker's error.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_worker_logger::Logger;
    ///
    /// let mut logger = Logger::builder()
    ///     .name("batch")
    ///     .log_file_path("batch.log")
    ///     .build()
    ///     .expect("failed to create logger");
    /// logger.info("Important message");
    ///
    /// if let Err(e) = logger.shutdown() {
    ///     eprintln!("log output incomplete: {}", e);
    /// }
    /// ```
    pub fn shutdown(&mut self) -> Result<()> {
        self.queue.request_shutdown();

        match self.worker.take() {
            None => Ok(()),
            Some(handle) => match handle.join() {
                Ok(result) => result,
                Err(panic_info) => Err(LoggerError::WorkerPanicked(panic_message(&*panic_info))),
            },
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("log_file_path", &self.log_file_path)
            .field("pending", &self.pending())
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Worker failures are reported on stderr by the worker itself
        let _ = self.shutdown();

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger '{}' shutting down with {} dropped records (drop rate: {:.2}%)",
                self.name,
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_worker_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .name("console-only")
///     .print_to_console(true)
///     .minimum_log_level(LogLevel::Info)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(logger.minimum_log_level(), LogLevel::Info);
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    formatter: Option<Box<dyn LineFormatter>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            formatter: None,
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            formatter: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file_path = Some(path.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn print_to_console(mut self, enabled: bool) -> Self {
        self.config.print_to_console = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_thread_ids(mut self, enabled: bool) -> Self {
        self.config.log_thread_ids = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_self_name(mut self, enabled: bool) -> Self {
        self.config.log_self_name = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn minimum_log_level(mut self, level: LogLevel) -> Self {
        self.config.minimum_log_level = level;
        self
    }

    /// Bound the number of pending records
    ///
    /// If not called, the queue is unbounded.
    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = Some(capacity);
        self
    }

    /// Set the overflow policy for a bounded queue
    ///
    /// # Example
    ///
    /// ```
    /// use rust_worker_logger::prelude::*;
    /// use std::time::Duration;
    ///
    /// let logger = Logger::builder()
    ///     .name("bounded")
    ///     .print_to_console(true)
    ///     .queue_capacity(100)
    ///     .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(50)))
    ///     .build();
    /// assert!(logger.is_ok());
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.config.overflow_policy = policy;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn lock_file(mut self, enabled: bool) -> Self {
        self.config.lock_file = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console_colors(mut self, enabled: bool) -> Self {
        self.config.console_colors = enabled;
        self
    }

    /// Replace the default line layout
    #[must_use = "builder methods return a new value"]
    pub fn formatter<F: LineFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Build the Logger
    pub fn build(self) -> Result<Logger> {
        Logger::with_formatter(self.config, self.formatter)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
