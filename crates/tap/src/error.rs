//! Error types for the tap crate
//!
//! Nothing in the router is fatal: per-subscription delivery problems are
//! reported as `DispatchFailure` values inside a `DispatchReport`, not as
//! errors.

use std::fmt;

use thiserror::Error;

/// Errors that can occur in the tap system
#[derive(Error, Debug)]
pub enum TapError {
    /// Router configuration rejected (zero capacity or interval)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for tap operations
pub type Result<T> = std::result::Result<T, TapError>;

/// Why a matched record could not be pushed to a subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// Viewer's receiver is gone (connection closed)
    Disconnected,
    /// Viewer's outbound buffer is full; the line was dropped
    BufferFull,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("subscriber disconnected"),
            Self::BufferFull => f.write_str("subscriber buffer full"),
        }
    }
}
