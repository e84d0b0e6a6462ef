//! Integration tests for the worker logger
//!
//! These tests verify:
//! - Configuration and construction errors
//! - Ordering and completeness of written lines
//! - Lossless shutdown
//! - Line layout options
//! - Write failure reporting

use chrono::NaiveDateTime;
use rust_worker_logger::prelude::*;
use rust_worker_logger::{current_thread_id, TIMESTAMP_FORMAT};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(String::from)
        .collect()
}

/// Parsed form of a default-layout line
#[derive(Debug)]
struct ParsedLine {
    timestamp: String,
    thread_id: Option<u64>,
    logger_name: Option<String>,
    level: LogLevel,
    message: String,
}

fn parse_line(line: &str) -> Option<ParsedLine> {
    let (timestamp, rest) = (line.get(..19)?, line.get(19..)?);
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;

    let mut rest = rest.strip_prefix(' ')?;
    let mut thread_id = None;
    if let Some(after) = rest.strip_prefix("[thread: ") {
        let end = after.find(']')?;
        thread_id = Some(after[..end].parse::<u64>().ok()?);
        rest = after[end + 1..].strip_prefix(' ')?;
    }

    let rest = rest.strip_prefix('[')?;
    let end = rest.find("] - ")?;
    let tag = &rest[..end];
    let message = rest[end + 4..].to_string();

    let (logger_name, level) = match tag.strip_prefix('<') {
        Some(named) => {
            let close = named.find("> ")?;
            (Some(named[..close].to_string()), named[close + 2..].parse::<LogLevel>().ok()?)
        }
        None => (None, tag.parse::<LogLevel>().ok()?),
    };

    Some(ParsedLine {
        timestamp: timestamp.to_string(),
        thread_id,
        logger_name,
        level,
        message,
    })
}

#[test]
fn test_missing_sink_is_configuration_error() {
    let result = Logger::builder()
        .name("T")
        .log_file_path("")
        .print_to_console(false)
        .build();

    match result {
        Err(err) => assert!(err.is_configuration(), "unexpected error: {}", err),
        Ok(_) => panic!("construction should fail without a sink"),
    }
}

#[test]
fn test_empty_name_is_configuration_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = Logger::new(LoggerConfig {
        log_file_path: Some(temp_dir.path().join("unused.log")),
        ..LoggerConfig::default()
    });

    assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    assert!(!temp_dir.path().join("unused.log").exists());
}

#[test]
fn test_missing_directories_are_created() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("x").join("y.log");
    assert!(!log_file.parent().unwrap().exists());

    let logger = Logger::builder()
        .name("T")
        .log_file_path(&log_file)
        .build()
        .expect("Failed to create logger");
    logger.info("hi");
    drop(logger);

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("hi"));
}

#[test]
fn test_unopenable_path_is_io_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    // The path names an existing directory
    let result = Logger::builder()
        .name("T")
        .log_file_path(temp_dir.path())
        .build();

    match result {
        Err(err) => assert!(err.is_io(), "unexpected error: {}", err),
        Ok(_) => panic!("a directory cannot be opened as a log file"),
    }
}

#[test]
fn test_single_producer_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("order.log");

    let logger = Logger::builder()
        .name("order")
        .log_file_path(&log_file)
        .build()
        .expect("Failed to create logger");

    for i in 0..500 {
        logger.info(format!("Message {}", i));
    }
    drop(logger);

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 500);
    for (i, line) in lines.iter().enumerate() {
        let parsed = parse_line(line).expect("unparseable line");
        assert_eq!(parsed.message, format!("Message {}", i));
        assert_eq!(parsed.level, LogLevel::Info);
    }
}

#[test]
fn test_below_minimum_level_writes_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("filtered.log");

    let logger = Logger::builder()
        .name("filtered")
        .log_file_path(&log_file)
        .minimum_log_level(LogLevel::Warning)
        .build()
        .expect("Failed to create logger");

    for i in 0..20 {
        logger.debug(format!("debug {}", i));
        logger.info(format!("info {}", i));
    }
    assert_eq!(logger.metrics().enqueued_count(), 0);
    drop(logger);

    assert!(read_lines(&log_file).is_empty());
}

#[test]
fn test_drop_flushes_backlog() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("backlog.log");

    let logger = Logger::builder()
        .name("backlog")
        .log_file_path(&log_file)
        .build()
        .expect("Failed to create logger");

    for i in 0..1000 {
        logger.debug(format!("Record {}", i));
    }
    drop(logger);

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 1000);
    assert!(lines[999].ends_with("Record 999"));
}

#[test]
fn test_thread_id_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("threads.log");

    let logger = Logger::builder()
        .name("threads")
        .log_file_path(&log_file)
        .log_thread_ids(true)
        .build()
        .expect("Failed to create logger");

    let main_id = current_thread_id();
    logger.info("from main");

    let spawned_id = std::thread::scope(|s| {
        s.spawn(|| {
            logger.info("from spawned");
            current_thread_id()
        })
        .join()
        .expect("thread panicked")
    });
    drop(logger);

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 2);

    let first = parse_line(&lines[0]).expect("unparseable line");
    let second = parse_line(&lines[1]).expect("unparseable line");
    assert_eq!(first.thread_id, Some(main_id));
    assert_eq!(second.thread_id, Some(spawned_id));
    assert_ne!(main_id, spawned_id);
}

#[test]
fn test_self_name_layout() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("named.log");

    let logger = Logger::builder()
        .name("WebApp")
        .log_file_path(&log_file)
        .log_self_name(true)
        .build()
        .expect("Failed to create logger");
    logger.critical("This is a critical issue");
    drop(logger);

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with(" [<WebApp> CRITICAL] - This is a critical issue"));

    let parsed = parse_line(&lines[0]).expect("unparseable line");
    assert_eq!(parsed.logger_name.as_deref(), Some("WebApp"));
    assert_eq!(parsed.timestamp.len(), 19);
    assert_eq!(parsed.thread_id, None);
}

#[test]
fn test_file_is_appended_across_loggers() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("append.log");

    for run in 0..3 {
        let logger = Logger::builder()
            .name("append")
            .log_file_path(&log_file)
            .build()
            .expect("Failed to create logger");
        logger.info(format!("run {}", run));
    }

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 3);
    assert!(lines[2].ends_with("run 2"));
}

#[test]
fn test_console_and_file_together() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("both.log");

    let mut logger = Logger::builder()
        .name("both")
        .log_file_path(&log_file)
        .print_to_console(true)
        .build()
        .expect("Failed to create logger");
    logger.warning("echoed");
    logger.shutdown().expect("shutdown failed");

    assert_eq!(read_lines(&log_file).len(), 1);
    assert_eq!(logger.metrics().written_count(), 1);
}

#[test]
fn test_console_only_logger() {
    let mut logger = Logger::builder()
        .name("console")
        .print_to_console(true)
        .build()
        .expect("Failed to create logger");

    logger.info("console only");
    logger.shutdown().expect("shutdown failed");
    assert_eq!(logger.metrics().written_count(), 1);
}

#[test]
fn test_shutdown_is_idempotent() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut logger = Logger::builder()
        .name("idempotent")
        .log_file_path(temp_dir.path().join("idempotent.log"))
        .build()
        .expect("Failed to create logger");

    logger.info("before shutdown");
    logger.shutdown().expect("first shutdown failed");
    logger.shutdown().expect("second shutdown failed");
    drop(logger);
}

#[test]
fn test_logger_from_json_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("json.log");
    let json = format!(
        r#"{{ "name": "json", "log_file_path": {:?}, "minimum_log_level": "Error" }}"#,
        log_file.display().to_string()
    );

    let config = LoggerConfig::from_json_str(&json).expect("Failed to parse config");
    let logger = Logger::new(config).expect("Failed to create logger");
    logger.warning("dropped by level");
    logger.error("kept");
    drop(logger);

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("[ERROR] - kept"));
}

#[test]
fn test_builder_from_config_with_unbounded_wait() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("patient.log");
    let json = format!(
        r#"{{
            "name": "patient",
            "log_file_path": {:?},
            "queue_capacity": 1,
            "overflow_policy": {{ "BlockWithTimeout": {{ "secs": 18446744073709551615, "nanos": 0 }} }}
        }}"#,
        log_file.display().to_string()
    );

    let config = LoggerConfig::from_json_str(&json).expect("Failed to parse config");
    assert!(config.validate().is_ok());

    let mut logger = LoggerBuilder::from_config(config)
        .log_self_name(true)
        .build()
        .expect("Failed to create logger");
    for i in 0..200 {
        logger.info(format!("waited {}", i));
    }
    logger.shutdown().expect("shutdown failed");
    assert_eq!(logger.dropped_count(), 0);

    let lines = read_lines(&log_file);
    assert_eq!(lines.len(), 200);
    assert!(lines[199].ends_with("[<patient> INFO] - waited 199"));
}

#[cfg(feature = "file-lock")]
#[test]
fn test_locked_file_rejects_second_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("locked.log");

    let first = Logger::builder()
        .name("first")
        .log_file_path(&log_file)
        .lock_file(true)
        .build()
        .expect("Failed to create logger");

    let second = Logger::builder()
        .name("second")
        .log_file_path(&log_file)
        .lock_file(true)
        .build();
    assert!(matches!(second, Err(LoggerError::IoOperation { .. })));

    drop(first);
    let third = Logger::builder()
        .name("third")
        .log_file_path(&log_file)
        .lock_file(true)
        .build();
    assert!(third.is_ok());
}

#[cfg(target_os = "linux")]
#[test]
fn test_write_failure_surfaces_from_shutdown() {
    // Every write to /dev/full fails with ENOSPC
    let mut logger = Logger::builder()
        .name("full")
        .log_file_path("/dev/full")
        .build()
        .expect("/dev/full can be opened for appending");

    logger.error("cannot be stored");
    let result = logger.shutdown();

    match result {
        Err(err) => assert!(err.is_io(), "unexpected error: {}", err),
        Ok(()) => panic!("write failure was not reported"),
    }
    assert!(!logger.is_running());

    logger.error("refused");
    assert!(logger.dropped_count() >= 1);
}
