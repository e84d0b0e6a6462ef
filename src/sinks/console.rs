//! Console sink implementation

use crate::core::{LogRecord, LoggerError, Result, Sink};
use std::io::{self, Write};

/// Standard output echo of every line
pub struct ConsoleSink {
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { use_colors: false }
    }

    /// Colorize lines by level
    ///
    /// Without the `colors` feature the flag is accepted and ignored.
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    #[cfg(feature = "colors")]
    fn render(&self, record: &LogRecord, line: &str) -> String {
        use colored::Colorize;

        if !self.use_colors {
            return line.to_string();
        }
        let body = line.strip_suffix('\n').unwrap_or(line);
        format!("{}\n", body.color(record.level.color_code()))
    }

    #[cfg(not(feature = "colors"))]
    fn render(&self, _record: &LogRecord, line: &str) -> String {
        line.to_string()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, record: &LogRecord, line: &str) -> Result<()> {
        let output = self.render(record, line);
        io::stdout()
            .lock()
            .write_all(output.as_bytes())
            .map_err(|e| LoggerError::io_operation("writing to console", "stdout", e))
    }

    fn flush(&mut self) -> Result<()> {
        io::stdout()
            .flush()
            .map_err(|e| LoggerError::io_operation("flushing console", "stdout", e))
    }

    fn name(&self) -> &str {
        "console"
    }
}
