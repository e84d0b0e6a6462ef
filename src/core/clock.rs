//! Timestamp and thread identity helpers
//!
//! Both functions are queried at the call site so that a record carries the
//! producer's time and thread, not the worker's.

use chrono::Local;
use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// strftime layout of record timestamps: `2025-01-08 10:30:45`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Per-thread cache, computed on first access
thread_local! {
    static THREAD_ID_CACHE: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Local wall-clock time at second granularity
pub fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Numeric identifier of the calling thread
///
/// Derived from [`std::thread::ThreadId`], so it is unique among the threads
/// of this process and stable for the lifetime of a thread.
pub fn current_thread_id() -> u64 {
    THREAD_ID_CACHE.with(|cache| match cache.get() {
        Some(id) => id,
        None => {
            let id = thread_id_to_u64(std::thread::current().id());
            cache.set(Some(id));
            id
        }
    })
}

fn thread_id_to_u64(id: std::thread::ThreadId) -> u64 {
    // Debug output is `ThreadId(N)`
    let rendered = format!("{:?}", id);
    let digits: String = rendered.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or_else(|_| {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        hasher.finish()
    })
}
