//! Logurt Tap - live fan-out of ingested log lines to viewers
//!
//! This crate routes every ingested record to the viewers whose selector
//! matches it. It is the only stateful part of logurt:
//!
//! - Filters on Kubernetes provenance only (namespace, pod, container, labels)
//! - Pushes without blocking; a slow viewer loses lines, never stalls ingest
//! - Reports per-record delivery instead of failing a batch
//! - Auto-cleans subscribers on disconnect
//! - Has zero cost when no subscribers are connected
//!
//! Transport (HTTP, WebSocket, ...) is out of scope: a transport decodes the
//! viewer's capability token, calls [`BroadcastRouter::connect`] and writes
//! whatever the returned [`LiveStream`] yields.
//!
//! # Architecture
//!
//! ```text
//! ingest(records)
//!     │
//!     ▼
//! BroadcastRouter ──→ registry.snapshot()
//!     │                    │
//!     │               ┌────┴────┐
//!     │               ▼         ▼
//!     │          matches()   matches()   ◄── FilterSpec from token
//!     │               │         │
//!     │               ▼         ▼
//!     │          try_send   try_send     (bounded mpsc per viewer)
//!     │               │         │
//!     ▼               ▼         ▼
//! DispatchReport  LiveStream LiveStream ──→ viewers
//! ```

mod error;
pub mod filter;
pub mod report;
pub mod router;
pub mod stream;
pub mod subscriber;

pub use error::{FailureReason, Result, TapError};
pub use filter::matches;
pub use report::{DispatchFailure, DispatchReport, RecordDispatch};
pub use router::{BroadcastRouter, RouterConfig, RouterStats};
pub use stream::LiveStream;
pub use subscriber::{DEFAULT_CHANNEL_CAPACITY, Subscriber, SubscriberRegistry, SubscriptionId};
