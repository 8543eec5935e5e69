//! Fluent Bit ingestion payload
//!
//! Fluent Bit's HTTP output (with the Kubernetes filter enabled) posts a JSON
//! array of records shaped like:
//!
//! ```json
//! [{
//!   "timestamp": "2024-01-01T00:00:00Z",
//!   "log": "GET /healthz 200",
//!   "kubernetes": {
//!     "namespace_name": "prod",
//!     "pod_name": "web-1",
//!     "container_name": "app",
//!     "container_image": "web:1.2",
//!     "labels": { "app": "web" }
//!   }
//! }]
//! ```
//!
//! Missing and `null` fields decode as empty. A numeric timestamp (Fluent Bit's
//! `json_date_format double`) is kept as its decimal text.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

use crate::Result;
use crate::error::ProtocolError;
use crate::record::LogRecord;

/// Default cap on a single ingestion payload (8MB)
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 8 * 1024 * 1024;

/// One record from a Fluent Bit batch
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FluentBitRecord {
    /// Timestamp (string or number on the wire)
    #[serde(deserialize_with = "string_or_number")]
    pub timestamp: String,
    /// Raw message body
    #[serde(deserialize_with = "null_as_default")]
    pub log: String,
    /// Kubernetes metadata added by the kubernetes filter
    #[serde(deserialize_with = "null_as_default")]
    pub kubernetes: KubernetesMetadata,
}

/// Kubernetes metadata block
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KubernetesMetadata {
    #[serde(rename = "namespace_name", deserialize_with = "null_as_default")]
    pub namespace: String,
    #[serde(rename = "pod_name", deserialize_with = "null_as_default")]
    pub pod: String,
    #[serde(rename = "container_name", deserialize_with = "null_as_default")]
    pub container: String,
    pub container_image: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
}

impl From<FluentBitRecord> for LogRecord {
    fn from(record: FluentBitRecord) -> Self {
        let k8s = record.kubernetes;
        Self {
            timestamp: record.timestamp,
            log: record.log,
            namespace: k8s.namespace,
            pod: k8s.pod,
            container: k8s.container,
            labels: k8s.labels,
            container_image: k8s.container_image,
        }
    }
}

/// Decode a Fluent Bit JSON batch into log records
///
/// # Errors
///
/// Returns `ProtocolError::PayloadTooLarge` above `DEFAULT_MAX_PAYLOAD_SIZE`
/// and `ProtocolError::InvalidPayload` if the body is not a JSON array of
/// records. A malformed batch is rejected as a whole.
pub fn decode_fluentbit_batch(payload: &[u8]) -> Result<Vec<LogRecord>> {
    if payload.len() > DEFAULT_MAX_PAYLOAD_SIZE {
        return Err(ProtocolError::too_large(
            payload.len(),
            DEFAULT_MAX_PAYLOAD_SIZE,
        ));
    }

    let records: Vec<FluentBitRecord> = serde_json::from_slice(payload)?;
    Ok(records.into_iter().map(LogRecord::from).collect())
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null(()) => String::new(),
    })
}
