//! Multi-threaded logging example
//!
//! Demonstrates one logger shared by several worker threads, writing to both
//! a file and the console.
//!
//! Run with: cargo run --example multi_threaded

use rust_worker_logger::prelude::*;
use rust_worker_logger::{current_thread_id, debug, info};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const LOG_FILE_PATH: &str = "example.log";

fn do_work(logger: &Logger, task_id: usize) {
    info!(logger, "Worker thread {} starting task {}", current_thread_id(), task_id);
    thread::sleep(Duration::from_millis(150));
    debug!(logger, "Worker thread {} finished task {}", current_thread_id(), task_id);
}

fn main() -> Result<()> {
    println!("Initializing advanced logger...");

    let logger = Arc::new(
        Logger::builder()
            .name("WebApp")
            .log_file_path(LOG_FILE_PATH)
            .minimum_log_level(LogLevel::Debug)
            .print_to_console(true)
            .log_thread_ids(true)
            .log_self_name(true)
            .build()?,
    );

    logger.critical("This is a critical issue from the 'WebApp' logger.");
    logger.info("Logger initialized. Starting main application tasks.");

    for i in 0..3 {
        info!(logger, "Main thread is working on task {}", i);
        thread::sleep(Duration::from_millis(200));
    }

    logger.info("Spawning 5 worker threads...");
    let handles: Vec<_> = (0..5)
        .map(|task_id| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || do_work(&logger, task_id))
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }

    logger.info("All worker threads have finished.");

    // Dropping the last handle drains the queue before returning
    drop(logger);
    println!("Example finished. Check {} and console for output.", LOG_FILE_PATH);

    Ok(())
}
