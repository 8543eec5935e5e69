//! Viewer-side end of a subscription

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::debug;

use logurt_protocol::FilterSpec;

use crate::subscriber::{SubscriberRegistry, SubscriptionId};

/// Receiving end of a live subscription
///
/// Dropping the stream unregisters the subscription, so a transport only
/// has to drop it when the viewer's connection closes.
#[derive(Debug)]
pub struct LiveStream {
    id: SubscriptionId,
    filter: FilterSpec,
    receiver: mpsc::Receiver<Bytes>,
    registry: Arc<SubscriberRegistry>,
}

impl LiveStream {
    pub(crate) fn new(
        id: SubscriptionId,
        filter: FilterSpec,
        receiver: mpsc::Receiver<Bytes>,
        registry: Arc<SubscriberRegistry>,
    ) -> Self {
        Self {
            id,
            filter,
            receiver,
            registry,
        }
    }

    /// Subscription ID
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Selector the stream was opened with
    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// Wait for the next line
    ///
    /// Returns `None` once the subscription has been removed and the buffer
    /// is drained.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.receiver.recv().await
    }

    /// Take the next buffered line without waiting
    pub fn try_recv(&mut self) -> Option<Bytes> {
        match self.receiver.try_recv() {
            Ok(line) => Some(line),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

impl Drop for LiveStream {
    fn drop(&mut self) {
        if self.registry.remove(self.id) {
            debug!(id = %self.id, "live stream closed");
        }
    }
}
