//! BroadcastRouter - fan-out of ingested log records to live viewers
//!
//! `BroadcastRouter` is the integration point between ingestion and the
//! viewer streams. It provides:
//!
//! - Zero-cost when no subscribers (one snapshot, then return)
//! - One registry snapshot per batch, shared by every record in it
//! - Non-blocking delivery: a slow or gone viewer never stalls the batch
//! - Per-record dispatch report with isolated failures
//! - Automatic cleanup of disconnected subscribers
//!
//! # Usage
//!
//! ```ignore
//! let router = Arc::new(BroadcastRouter::new());
//!
//! // Stream-connect path (after decoding the capability token):
//! let mut stream = router.connect(filter);
//! while let Some(line) = stream.recv().await { /* write to socket */ }
//!
//! // Ingestion path:
//! let report = router.ingest(&records);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use logurt_protocol::{FilterSpec, LogRecord};

use crate::error::{FailureReason, Result, TapError};
use crate::report::{DispatchFailure, DispatchReport, RecordDispatch};
use crate::stream::LiveStream;
use crate::subscriber::{DEFAULT_CHANNEL_CAPACITY, SubscriberRegistry, SubscriptionId};

/// Router configuration
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Outbound buffer per subscriber (lines)
    pub channel_capacity: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Fans ingested records out to matching live subscribers
#[derive(Debug)]
pub struct BroadcastRouter {
    /// Live subscriptions
    registry: Arc<SubscriberRegistry>,
    /// Total records ingested
    record_count: AtomicU64,
    /// Total lines delivered to subscribers
    delivered_count: AtomicU64,
    /// Total failed pushes
    failure_count: AtomicU64,
}

impl BroadcastRouter {
    /// Create a router with default configuration
    pub fn new() -> Self {
        Self::from_registry(Arc::new(SubscriberRegistry::new()))
    }

    /// Create a router with explicit configuration
    ///
    /// # Errors
    ///
    /// Returns `TapError::InvalidConfig` for a zero channel capacity.
    pub fn with_config(config: RouterConfig) -> Result<Self> {
        if config.channel_capacity == 0 {
            return Err(TapError::InvalidConfig(
                "channel_capacity must be at least 1".into(),
            ));
        }

        Ok(Self::from_registry(Arc::new(
            SubscriberRegistry::with_channel_capacity(config.channel_capacity),
        )))
    }

    /// Create a router over an existing registry
    pub fn from_registry(registry: Arc<SubscriberRegistry>) -> Self {
        Self {
            registry,
            record_count: AtomicU64::new(0),
            delivered_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
        }
    }

    /// The registry this router dispatches from
    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Register a subscriber and get the raw receiver
    ///
    /// The caller must call `unsubscribe` when the connection closes; prefer
    /// `connect`, which does that on drop.
    pub fn subscribe(&self, filter: FilterSpec) -> (SubscriptionId, mpsc::Receiver<Bytes>) {
        debug!(filter = %filter, "new subscriber");
        let (id, receiver) = self.registry.add(filter);
        debug!(%id, subscribers = self.registry.count(), "subscriber registered");
        (id, receiver)
    }

    /// Remove a subscriber (no-op if already removed)
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.registry.remove(id);
        if removed {
            debug!(%id, "subscriber removed");
        }
        removed
    }

    /// Register a subscriber for a viewer connection
    ///
    /// The returned stream unsubscribes when dropped.
    pub fn connect(&self, filter: FilterSpec) -> LiveStream {
        let (id, receiver) = self.subscribe(filter.clone());
        LiveStream::new(id, filter, receiver, Arc::clone(&self.registry))
    }

    /// Dispatch a batch of records to every matching subscriber
    ///
    /// Never fails: push failures are recorded per (record, subscriber) in
    /// the report and do not affect other subscribers or records. Each
    /// subscriber receives its matching lines in batch order.
    pub fn ingest(&self, records: &[LogRecord]) -> DispatchReport {
        self.record_count
            .fetch_add(records.len() as u64, Ordering::Relaxed);

        let subscribers = self.registry.snapshot();

        // Fast path: no subscribers = no work
        if subscribers.is_empty() {
            return DispatchReport::idle(records.len());
        }

        let mut dispatches = Vec::with_capacity(records.len());

        for record in records {
            let mut dispatch = RecordDispatch::default();
            let mut line: Option<Bytes> = None;

            for subscriber in &subscribers {
                if !subscriber.matches(record) {
                    continue;
                }
                dispatch.matched += 1;

                let payload = line.get_or_insert_with(|| record.payload()).clone();
                match subscriber.try_send(payload) {
                    Ok(()) => dispatch.delivered += 1,
                    Err(reason) => {
                        trace!(subscriber = %subscriber.id(), %reason, "push failed");
                        dispatch.failures.push(DispatchFailure {
                            subscription: subscriber.id(),
                            reason,
                        });
                    }
                }
            }

            trace!(
                matched = dispatch.matched,
                delivered = dispatch.delivered,
                "{}: {}",
                record,
                record.log
            );
            dispatches.push(dispatch);
        }

        let report = DispatchReport::new(dispatches, subscribers.len());
        self.record_report(&report);
        report
    }

    fn record_report(&self, report: &DispatchReport) {
        let delivered = report.total_delivered();
        let failures = report.total_failures();

        self.delivered_count
            .fetch_add(delivered as u64, Ordering::Relaxed);
        self.failure_count
            .fetch_add(failures as u64, Ordering::Relaxed);

        if failures == 0 {
            return;
        }

        let dropped = report
            .failures()
            .filter(|(_, f)| f.reason == FailureReason::BufferFull)
            .count();

        if dropped > 0 {
            warn!(
                dropped,
                records = report.records().len(),
                "slow subscribers dropped lines"
            );
        } else {
            debug!(
                failures,
                records = report.records().len(),
                "dispatched to disconnected subscribers"
            );
        }
    }

    /// Get the number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.registry.count()
    }

    /// Check if there are any subscribers
    #[inline]
    pub fn has_subscribers(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Get router statistics
    pub fn stats(&self) -> RouterStats {
        RouterStats {
            record_count: self.record_count.load(Ordering::Relaxed),
            delivered_count: self.delivered_count.load(Ordering::Relaxed),
            failure_count: self.failure_count.load(Ordering::Relaxed),
            subscriber_count: self.registry.count(),
        }
    }

    /// Clean up disconnected subscribers
    ///
    /// Called periodically by the maintenance task.
    pub fn cleanup(&self) -> usize {
        let removed = self.registry.cleanup_disconnected();

        if removed > 0 {
            debug!(removed, "cleaned up disconnected subscribers");
        }

        removed
    }

    /// Spawn the maintenance task
    ///
    /// Removes disconnected subscribers every `interval`.
    ///
    /// # Errors
    ///
    /// Returns `TapError::InvalidConfig` for a zero interval.
    pub fn spawn_maintenance(
        self: &Arc<Self>,
        interval: Duration,
    ) -> Result<tokio::task::JoinHandle<()>> {
        if interval.is_zero() {
            return Err(TapError::InvalidConfig(
                "cleanup interval must be non-zero".into(),
            ));
        }

        let router = Arc::clone(self);

        Ok(tokio::spawn(async move {
            let mut cleanup_interval = tokio::time::interval(interval);

            loop {
                cleanup_interval.tick().await;
                router.cleanup();
            }
        }))
    }
}

impl Default for BroadcastRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterStats {
    /// Total records that passed through `ingest`
    pub record_count: u64,
    /// Total lines delivered to subscribers
    pub delivered_count: u64,
    /// Total failed pushes
    pub failure_count: u64,
    /// Current number of subscribers
    pub subscriber_count: usize,
}

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;
