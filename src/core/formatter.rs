//! Line formatting for log records
//!
//! The worker renders every record through a [`LineFormatter`] before handing
//! the line to the sinks. [`DefaultFormatter`] produces the standard layout:
//!
//! ```text
//! 2025-01-08 10:30:45 [thread: 7] [<WebApp> INFO] - Request processed
//! ```

use super::log_record::LogRecord;

/// Turns a record into one output line, terminator included
pub trait LineFormatter: Send {
    fn format(&self, record: &LogRecord, logger_name: &str) -> String;
}

impl<F> LineFormatter for F
where
    F: Fn(&LogRecord, &str) -> String + Send,
{
    fn format(&self, record: &LogRecord, logger_name: &str) -> String {
        self(record, logger_name)
    }
}

/// Standard line layout
///
/// `<timestamp>[ [thread: <id>]] [<LEVEL>] - <message>`, where the level tag
/// becomes `[<name> LEVEL]` (angle brackets included) when `log_self_name` is
/// set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultFormatter {
    pub log_thread_ids: bool,
    pub log_self_name: bool,
}

impl DefaultFormatter {
    pub fn new(log_thread_ids: bool, log_self_name: bool) -> Self {
        Self {
            log_thread_ids,
            log_self_name,
        }
    }
}

impl LineFormatter for DefaultFormatter {
    fn format(&self, record: &LogRecord, logger_name: &str) -> String {
        let mut line = String::with_capacity(
            record.timestamp.len() + record.message.len() + logger_name.len() + 40,
        );
        line.push_str(&record.timestamp);

        if self.log_thread_ids {
            line.push_str(&format!(" [thread: {}]", record.thread_id));
        }

        if self.log_self_name {
            line.push_str(&format!(" [<{}> {}] - ", logger_name, record.level.to_str()));
        } else {
            line.push_str(&format!(" [{}] - ", record.level.to_str()));
        }

        line.push_str(&record.message);
        line.push('\n');
        line
    }
}
