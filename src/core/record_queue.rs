//! Producer/consumer hand-off between logging threads and the worker
//!
//! A FIFO of [`LogRecord`]s behind one mutex. The worker sleeps on the
//! `available` condition variable; producers on a full bounded queue sleep on
//! `space`. Nothing here performs I/O.

use super::{
    error::{LoggerError, Result},
    log_record::LogRecord,
    overflow_policy::OverflowPolicy,
};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::Instant;

/// How a record made it into the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Appended without waiting
    Queued,
    /// Appended after waiting for space
    QueuedAfterWait,
    /// Appended after evicting the oldest evictable record
    EvictedOldest,
}

#[derive(Debug, Default)]
struct QueueState {
    records: VecDeque<LogRecord>,
    shutdown: bool,
}

#[derive(Debug)]
pub struct RecordQueue {
    state: Mutex<QueueState>,
    /// Signaled on push and on shutdown
    available: Condvar,
    /// Signaled on pop and on shutdown
    space: Condvar,
    capacity: Option<usize>,
    policy: OverflowPolicy,
}

impl RecordQueue {
    /// Create an unbounded queue
    pub fn unbounded() -> Self {
        Self::with_capacity(None, OverflowPolicy::default())
    }

    /// Create a queue, bounded when `capacity` is set
    pub fn with_capacity(capacity: Option<usize>, policy: OverflowPolicy) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            available: Condvar::new(),
            space: Condvar::new(),
            capacity,
            policy,
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Append a record at the tail and wake the worker
    ///
    /// On a full bounded queue the configured [`OverflowPolicy`] applies,
    /// except for records at `Error` and above, which are always admitted.
    /// Fails with [`LoggerError::LoggerStopped`] once shutdown was requested.
    pub fn push(&self, record: LogRecord) -> Result<Admission> {
        let mut state = self.state.lock();
        if state.shutdown {
            return Err(LoggerError::LoggerStopped);
        }

        let mut admission = Admission::Queued;
        if let Some(max) = self.capacity {
            if state.records.len() >= max && !record.level.is_critical() {
                match self.policy {
                    OverflowPolicy::Block => {
                        admission = Admission::QueuedAfterWait;
                        while state.records.len() >= max && !state.shutdown {
                            self.space.wait(&mut state);
                        }
                    }
                    OverflowPolicy::BlockWithTimeout(timeout) => {
                        admission = Admission::QueuedAfterWait;
                        // A deadline past the clock's range waits like `Block`
                        let deadline = Instant::now().checked_add(timeout);
                        while state.records.len() >= max && !state.shutdown {
                            match deadline {
                                Some(deadline) => {
                                    if self.space.wait_until(&mut state, deadline).timed_out()
                                        && state.records.len() >= max
                                    {
                                        return Err(LoggerError::queue_full(
                                            state.records.len(),
                                            max,
                                        ));
                                    }
                                }
                                None => self.space.wait(&mut state),
                            }
                        }
                    }
                    OverflowPolicy::DropNewest => {
                        return Err(LoggerError::queue_full(state.records.len(), max));
                    }
                    OverflowPolicy::DropOldest => {
                        // Critical records are never evicted
                        let victim = state.records.iter().position(|r| !r.level.is_critical());
                        match victim {
                            Some(index) => {
                                state.records.remove(index);
                                admission = Admission::EvictedOldest;
                            }
                            None => {
                                return Err(LoggerError::queue_full(state.records.len(), max));
                            }
                        }
                    }
                }

                if state.shutdown {
                    return Err(LoggerError::LoggerStopped);
                }
            }
        }

        state.records.push_back(record);
        drop(state);
        self.available.notify_one();
        Ok(admission)
    }

    /// Wait for the next record
    ///
    /// Returns `None` only when shutdown was requested and every pending
    /// record has been handed out. The lock is released before returning.
    pub fn wait_pop(&self) -> Option<LogRecord> {
        let mut state = self.state.lock();
        loop {
            if let Some(record) = state.records.pop_front() {
                drop(state);
                if self.capacity.is_some() {
                    self.space.notify_one();
                }
                return Some(record);
            }
            if state.shutdown {
                return None;
            }
            self.available.wait(&mut state);
        }
    }

    /// Pop the head without waiting
    pub fn try_pop(&self) -> Option<LogRecord> {
        let record = self.state.lock().records.pop_front();
        if record.is_some() && self.capacity.is_some() {
            self.space.notify_one();
        }
        record
    }

    /// Ask the worker to stop once the queue is drained
    ///
    /// Idempotent. Returns `true` for the call that actually set the flag.
    pub fn request_shutdown(&self) -> bool {
        let first = {
            let mut state = self.state.lock();
            let first = !state.shutdown;
            state.shutdown = true;
            first
        };
        self.available.notify_all();
        self.space.notify_all();
        first
    }

    /// Stop accepting records and discard everything pending
    ///
    /// Used when the worker can no longer write. Returns the number of
    /// discarded records.
    pub fn close(&self) -> usize {
        let discarded = {
            let mut state = self.state.lock();
            state.shutdown = true;
            let discarded = state.records.len();
            state.records.clear();
            discarded
        };
        self.available.notify_all();
        self.space.notify_all();
        discarded
    }

    pub fn is_shutdown(&self) -> bool {
        self.state.lock().shutdown
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }
}

impl Default for RecordQueue {
    fn default() -> Self {
        Self::unbounded()
    }
}
