//! Protocol error types
//!
//! Errors that can occur when validating selectors or decoding ingestion
//! payloads.

use thiserror::Error;

/// Errors that can occur during protocol operations
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Ingestion payload is not a valid Fluent Bit JSON batch
    #[error("invalid ingestion payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// Ingestion payload exceeds the accepted size
    #[error("payload size {size} exceeds limit {limit}")]
    PayloadTooLarge { size: usize, limit: usize },
}

impl ProtocolError {
    /// Create a payload too large error
    #[inline]
    pub fn too_large(size: usize, limit: usize) -> Self {
        Self::PayloadTooLarge { size, limit }
    }
}

/// A selector violates the `FilterSpec` invariants
///
/// The messages are part of the sign-in contract and are returned to
/// callers verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Namespace is empty
    #[error("namespace is required")]
    MissingNamespace,

    /// Container given without a pod
    #[error("pod is required when container is specified")]
    ContainerWithoutPod,
}
