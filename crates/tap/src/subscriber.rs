//! Subscription registry
//!
//! Each connected viewer gets a `Subscriber` that tracks:
//! - Unique ID for the connection
//! - The selector decoded from its capability token
//! - Channel sender for non-blocking line delivery
//!
//! The `SubscriberRegistry` owns the set of live subscribers. The transport
//! owns the connections themselves and only hands us the receiving end's
//! counterpart.
//!
//! # Concurrency
//!
//! All access goes through one `RwLock`. `snapshot` holds the read lock only
//! long enough to clone the `Arc`s, so fan-out never runs under the lock and
//! never blocks `add`/`remove`.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use logurt_protocol::{FilterSpec, LogRecord};

use crate::error::FailureReason;
use crate::filter::matches;

/// Default per-subscriber outbound buffer (lines)
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Opaque handle for one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Numeric value (for logging)
    #[inline]
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// A single live viewer
#[derive(Debug)]
pub struct Subscriber {
    /// Unique identifier
    id: SubscriptionId,
    /// Selector, fixed for the subscription's lifetime
    filter: FilterSpec,
    /// Channel sender for line delivery
    sender: mpsc::Sender<Bytes>,
}

impl Subscriber {
    /// Get the subscription ID
    #[inline]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Get the selector
    #[inline]
    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Check if a record is visible to this subscriber
    #[inline]
    pub fn matches(&self, record: &LogRecord) -> bool {
        matches(&self.filter, record)
    }

    /// Try to push a line without waiting
    pub fn try_send(&self, line: Bytes) -> Result<(), FailureReason> {
        self.sender.try_send(line).map_err(|e| match e {
            TrySendError::Full(_) => FailureReason::BufferFull,
            TrySendError::Closed(_) => FailureReason::Disconnected,
        })
    }

    /// Check if the viewer's receiver is still alive
    #[inline]
    pub fn is_connected(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// Owns all live subscribers
#[derive(Debug)]
pub struct SubscriberRegistry {
    /// Live subscribers
    subscribers: RwLock<Vec<Arc<Subscriber>>>,
    /// Next subscription ID
    next_id: AtomicU64,
    /// Outbound buffer size for new subscribers
    channel_capacity: usize,
}

impl SubscriberRegistry {
    /// Create a registry with the default outbound buffer size
    pub fn new() -> Self {
        Self::with_channel_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a registry with a specific outbound buffer size (minimum 1)
    pub fn with_channel_capacity(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            channel_capacity: capacity.max(1),
        }
    }

    /// Outbound buffer size given to new subscribers
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    /// Register a new subscriber
    ///
    /// Identical selectors may coexist, one per viewer connection.
    /// Returns the subscription ID and the receiving end of its outbound queue.
    pub fn add(&self, filter: FilterSpec) -> (SubscriptionId, mpsc::Receiver<Bytes>) {
        let (sender, receiver) = mpsc::channel(self.channel_capacity);
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));

        let subscriber = Arc::new(Subscriber { id, filter, sender });
        self.subscribers.write().push(subscriber);

        (id, receiver)
    }

    /// Remove a subscriber
    ///
    /// Idempotent: returns `false` if the ID was already removed.
    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let original_len = subscribers.len();
        subscribers.retain(|s| s.id() != id);
        subscribers.len() != original_len
    }

    /// Point-in-time copy of the live subscribers
    pub fn snapshot(&self) -> Vec<Arc<Subscriber>> {
        self.subscribers.read().clone()
    }

    /// Check whether a subscription is still registered
    pub fn contains(&self, id: SubscriptionId) -> bool {
        self.subscribers.read().iter().any(|s| s.id() == id)
    }

    /// Get number of live subscribers
    pub fn count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Check if there are no subscribers
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subscribers.read().is_empty()
    }

    /// Remove subscribers whose receiver was dropped without a `remove`
    pub fn cleanup_disconnected(&self) -> usize {
        let mut subscribers = self.subscribers.write();
        let original_len = subscribers.len();
        subscribers.retain(|s| s.is_connected());
        original_len - subscribers.len()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "subscriber_test.rs"]
mod tests;
