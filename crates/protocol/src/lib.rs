//! Logurt Protocol - Core types shared by the router, codec, and CLI
//!
//! This crate provides the values that flow through the system:
//! - `FilterSpec` - Validated, immutable namespace/pod/container/label selector
//! - `FilterRequest` - Unvalidated selector as received from a sign-in request
//! - `LogRecord` - One ingested log line with its Kubernetes provenance
//! - `decode_fluentbit_batch` - Fluent Bit JSON batch decoding
//!
//! # Design Principles
//!
//! - **Valid by construction**: a `FilterSpec` can only be obtained through
//!   validation, including when it is deserialized
//! - **Opaque payloads**: the log body and timestamp are passed through
//!   untouched; only the metadata participates in routing

mod error;
mod filter;
mod fluentbit;
mod record;

pub use error::{ProtocolError, ValidationError};
pub use filter::{FilterRequest, FilterSpec, Labels};
pub use fluentbit::{
    DEFAULT_MAX_PAYLOAD_SIZE, FluentBitRecord, KubernetesMetadata, decode_fluentbit_batch,
};
pub use record::LogRecord;

// Re-export bytes for convenience
pub use bytes::Bytes;

/// Result type for protocol operations
pub type Result<T> = std::result::Result<T, ProtocolError>;
