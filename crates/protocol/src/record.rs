//! Ingested log records
//!
//! `LogRecord` is one log line with the Kubernetes metadata used for
//! routing. It lives for a single `ingest` call and is never stored.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;

/// One ingested log line
///
/// `timestamp` and `log` are opaque: the router never inspects them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogRecord {
    /// Timestamp as produced by the shipper
    pub timestamp: String,
    /// Raw message body
    pub log: String,
    /// Namespace the line was produced in
    pub namespace: String,
    /// Pod the line was produced in
    pub pod: String,
    /// Container the line was produced in
    pub container: String,
    /// Pod labels
    pub labels: HashMap<String, String>,
    /// Container image (informational, never matched on)
    pub container_image: Option<String>,
}

impl LogRecord {
    /// Create a record for a namespace/pod/container
    pub fn new(
        namespace: impl Into<String>,
        pod: impl Into<String>,
        container: impl Into<String>,
        log: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            pod: pod.into(),
            container: container.into(),
            log: log.into(),
            ..Default::default()
        }
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Add a provenance label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Look up a provenance label
    #[inline]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Raw log line as shareable bytes for fan-out
    pub fn payload(&self) -> Bytes {
        Bytes::copy_from_slice(self.log.as_bytes())
    }
}

/// Renders the provenance as `namespace.pod.container`
impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.namespace, self.pod, self.container)
    }
}
