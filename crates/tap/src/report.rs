//! Dispatch reports
//!
//! `BroadcastRouter::ingest` never fails as a whole. What happened to each
//! record is described here instead, one `RecordDispatch` per input record,
//! in input order.

use crate::error::FailureReason;
use crate::subscriber::SubscriptionId;

/// A push that did not reach its subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchFailure {
    /// Subscription the push was for
    pub subscription: SubscriptionId,
    /// Why it failed
    pub reason: FailureReason,
}

/// Outcome of dispatching one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDispatch {
    /// Subscribers whose filter matched the record
    pub matched: usize,
    /// Subscribers the line was pushed to
    pub delivered: usize,
    /// Matched subscribers the push failed for
    pub failures: Vec<DispatchFailure>,
}

impl RecordDispatch {
    /// True when every matched subscriber received the line
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of dispatching a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    records: Vec<RecordDispatch>,
    subscribers: usize,
}

impl DispatchReport {
    pub(crate) fn new(records: Vec<RecordDispatch>, subscribers: usize) -> Self {
        Self {
            records,
            subscribers,
        }
    }

    /// Report for a batch seen by no subscriber
    pub(crate) fn idle(record_count: usize) -> Self {
        Self {
            records: vec![RecordDispatch::default(); record_count],
            subscribers: 0,
        }
    }

    /// Per-record outcomes, in input order
    pub fn records(&self) -> &[RecordDispatch] {
        &self.records
    }

    /// Subscribers in the snapshot the batch was dispatched against
    pub fn subscribers(&self) -> usize {
        self.subscribers
    }

    /// Total (record, subscriber) matches
    pub fn total_matched(&self) -> usize {
        self.records.iter().map(|r| r.matched).sum()
    }

    /// Total lines pushed
    pub fn total_delivered(&self) -> usize {
        self.records.iter().map(|r| r.delivered).sum()
    }

    /// Total failed pushes
    pub fn total_failures(&self) -> usize {
        self.records.iter().map(|r| r.failures.len()).sum()
    }

    /// All failures with the index of the record they belong to
    pub fn failures(&self) -> impl Iterator<Item = (usize, &DispatchFailure)> {
        self.records
            .iter()
            .enumerate()
            .flat_map(|(i, r)| r.failures.iter().map(move |f| (i, f)))
    }

    /// True when nothing failed
    pub fn is_complete(&self) -> bool {
        self.records.iter().all(RecordDispatch::is_complete)
    }
}
