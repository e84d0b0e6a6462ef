//! Sink trait for log output destinations

use super::{error::Result, log_record::LogRecord};

/// An output destination owned and driven by the worker thread
///
/// `line` is the formatted rendering of `record`, newline included.
pub trait Sink: Send {
    fn write(&mut self, record: &LogRecord, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
