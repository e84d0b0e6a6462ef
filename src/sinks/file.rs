//! File sink implementation

use crate::core::{LogRecord, LoggerError, Result, Sink};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only log file, written only from the worker thread
pub struct FileSink {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    /// Open `path` for appending, creating missing parent directories
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "creating log directory",
                    parent.display().to_string(),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    /// Take an advisory exclusive lock on the file for the sink's lifetime
    ///
    /// Fails immediately if another handle already holds the lock.
    #[cfg(feature = "file-lock")]
    pub fn lock_exclusive(&self) -> Result<()> {
        use fs2::FileExt;

        let writer = self.writer.as_ref().ok_or_else(|| self.not_open("locking log file"))?;
        writer.get_ref().try_lock_exclusive().map_err(|e| {
            LoggerError::io_operation("locking log file", self.path.display().to_string(), e)
        })
    }

    /// Flush and release the file handle
    pub fn close(&mut self) -> Result<()> {
        let result = self.flush();
        self.writer = None;
        result
    }

    fn not_open(&self, operation: &str) -> LoggerError {
        LoggerError::io_operation(
            operation.to_string(),
            self.path.display().to_string(),
            io::Error::new(io::ErrorKind::NotConnected, "log file is not open"),
        )
    }
}

impl Sink for FileSink {
    fn write(&mut self, _record: &LogRecord, line: &str) -> Result<()> {
        let path = &self.path;
        let writer = match self.writer.as_mut() {
            Some(writer) => writer,
            None => return Err(self.not_open("writing log file")),
        };

        writer.write_all(line.as_bytes()).map_err(|e| {
            LoggerError::io_operation("writing log file", path.display().to_string(), e)
        })
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::io_operation("flushing log file", self.path.display().to_string(), e)
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
