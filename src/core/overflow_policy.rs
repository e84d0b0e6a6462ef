//! Overflow policies for bounded record queues
//!
//! The queue is unbounded unless a capacity is configured. With a capacity,
//! these policies decide what a producer does when the queue is full.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Policy for handling a full bounded queue
///
/// Records at [`LogLevel::Error`](super::LogLevel::Error) and above are never
/// refused or evicted by the drop policies; they are admitted past the bound.
///
/// # Example
///
/// ```
/// use rust_worker_logger::OverflowPolicy;
/// use std::time::Duration;
///
/// // Default behavior: wait for the worker to make room
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::Block);
///
/// // Block with timeout
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OverflowPolicy {
    /// Block until space is available
    ///
    /// No record is ever lost; producers absorb the backpressure.
    #[default]
    Block,

    /// Block with timeout, then drop the incoming record
    BlockWithTimeout(Duration),

    /// Drop the incoming record
    DropNewest,

    /// Evict the oldest pending record to make room
    DropOldest,
}

impl OverflowPolicy {
    /// Whether this policy may make a producer wait
    pub fn may_block(&self) -> bool {
        matches!(self, OverflowPolicy::Block | OverflowPolicy::BlockWithTimeout(_))
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::DropOldest => write!(f, "DropOldest"),
        }
    }
}
