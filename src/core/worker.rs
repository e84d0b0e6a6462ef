//! Background worker that owns the sinks
//!
//! Exactly one worker thread runs per [`Logger`](super::Logger). It is the only
//! code that touches the sinks, so they need no lock of their own.

use super::{
    error::{LoggerError, Result},
    formatter::LineFormatter,
    log_record::LogRecord,
    metrics::LoggerMetrics,
    record_queue::RecordQueue,
    sink::Sink,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

pub(crate) struct Worker {
    logger_name: String,
    queue: Arc<RecordQueue>,
    metrics: Arc<LoggerMetrics>,
    formatter: Box<dyn LineFormatter>,
    sinks: Vec<Box<dyn Sink>>,
    /// Index of the sink most recently written or flushed
    active_sink: usize,
}

/// Closes the queue when the worker exits for any reason, panics included,
/// so producers blocked on a full queue are released.
struct CloseOnExit {
    logger_name: String,
    queue: Arc<RecordQueue>,
    metrics: Arc<LoggerMetrics>,
}

impl Drop for CloseOnExit {
    fn drop(&mut self) {
        let discarded = self.queue.close();
        if discarded > 0 {
            self.metrics.record_dropped_many(discarded as u64);
            eprintln!(
                "[LOGGER WARNING] Logger '{}' discarded {} pending records after its worker stopped",
                self.logger_name, discarded
            );
        }
    }
}

impl Worker {
    pub(crate) fn new(
        logger_name: impl Into<String>,
        queue: Arc<RecordQueue>,
        metrics: Arc<LoggerMetrics>,
        formatter: Box<dyn LineFormatter>,
        sinks: Vec<Box<dyn Sink>>,
    ) -> Self {
        Self {
            logger_name: logger_name.into(),
            queue,
            metrics,
            formatter,
            sinks,
            active_sink: 0,
        }
    }

    /// Start the worker on its own named thread
    pub(crate) fn spawn(self) -> Result<JoinHandle<Result<()>>> {
        let thread_name = format!("{}-log-worker", self.logger_name);
        thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || self.run())
            .map_err(|e| LoggerError::io_operation("spawning log worker", thread_name, e))
    }

    /// Drain the queue until shutdown, stopping at the first failed write
    fn run(mut self) -> Result<()> {
        let _close = CloseOnExit {
            logger_name: self.logger_name.clone(),
            queue: Arc::clone(&self.queue),
            metrics: Arc::clone(&self.metrics),
        };

        while let Some(record) = self.queue.wait_pop() {
            if let Err(e) = self.guarded(|worker| worker.write_record(&record)) {
                self.metrics.record_dropped();
                self.report_failure(&e);
                return Err(e);
            }
            self.metrics.record_written();

            // Flush once the backlog is gone so the file stays tail-able
            if self.queue.is_empty() {
                if let Err(e) = self.guarded(Worker::flush_sinks) {
                    self.report_failure(&e);
                    return Err(e);
                }
            }
        }

        let result = self.guarded(Worker::flush_sinks);
        if let Err(ref e) = result {
            self.report_failure(e);
        }
        result
    }

    fn write_record(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.formatter.format(record, &self.logger_name);
        for (index, sink) in self.sinks.iter_mut().enumerate() {
            self.active_sink = index;
            sink.write(record, &line)?;
        }
        Ok(())
    }

    fn flush_sinks(&mut self) -> Result<()> {
        for (index, sink) in self.sinks.iter_mut().enumerate() {
            self.active_sink = index;
            sink.flush()?;
        }
        Ok(())
    }

    /// Run a sink operation, turning a panic into an error
    fn guarded<F>(&mut self, op: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        match panic::catch_unwind(AssertUnwindSafe(|| op(self))) {
            Ok(result) => result,
            Err(panic_info) => Err(LoggerError::WorkerPanicked(panic_message(&*panic_info))),
        }
    }

    /// Name of the sink that was being driven when an operation failed
    fn failing_sink(&self) -> &str {
        self.sinks
            .get(self.active_sink)
            .map_or("unknown", |sink| sink.name())
    }

    fn report_failure(&self, error: &LoggerError) {
        eprintln!(
            "[LOGGER ERROR] Log worker for '{}' stopped at {} sink: {}",
            self.logger_name,
            self.failing_sink(),
            error
        );
    }
}

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
