//! Capability codec error types

use logurt_protocol::ValidationError;
use thiserror::Error;

/// Result type for auth operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while issuing or decoding capability tokens
#[derive(Debug, Error)]
pub enum AuthError {
    /// The selector to be signed is invalid
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Token is missing or empty
    #[error("missing token")]
    MissingToken,

    /// Token does not verify against the signing key
    ///
    /// Covers a wrong signature as well as any tampering that makes the token
    /// unparseable.
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token verified but its expiry has passed
    #[error("token expired")]
    Expired,

    /// Token verified but its claims are unusable
    #[error("invalid token claims: {0}")]
    InvalidClaims(String),

    /// Signing key is too short for HMAC-SHA256
    #[error("signing key must be at least {min} bytes, got {actual}")]
    WeakSigningKey {
        /// Minimum accepted length
        min: usize,
        /// Length provided
        actual: usize,
    },

    /// Token lifetime cannot be represented
    #[error("invalid token lifetime: {0}")]
    InvalidLifetime(String),

    /// JWT encoding failed
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl AuthError {
    /// Create an InvalidClaims error
    #[inline]
    pub fn invalid_claims(message: impl Into<String>) -> Self {
        Self::InvalidClaims(message.into())
    }

    /// True for errors that mean "reject the viewer" rather than a server fault
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::MissingToken | Self::InvalidSignature | Self::Expired | Self::InvalidClaims(_)
        )
    }
}
