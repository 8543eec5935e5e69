//! Capability codec
//!
//! Binds a viewer selector into a signed, time-bounded token and back.
//! The token *is* the capability: the stream endpoint trusts only what the
//! token says, never client-supplied query parameters, so a viewer cannot
//! widen its scope after issuance.

use std::fmt;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use logurt_protocol::{FilterRequest, FilterSpec};

use crate::claims::FilterClaims;
use crate::clock::{Clock, SystemClock};
use crate::error::{AuthError, Result};

/// Minimum signing key length for HMAC-SHA256
pub const MIN_SIGNING_KEY_LENGTH: usize = 32;

/// A freshly issued capability token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityToken {
    token: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl CapabilityToken {
    /// Encoded token
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Consume into the encoded token
    pub fn into_string(self) -> String {
        self.token
    }

    /// When the token was issued
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// When the token stops being accepted
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Display for CapabilityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// Issues and decodes capability tokens (HS256)
///
/// Stateless apart from the signing key and clock, both read-only after
/// construction, so one codec can be shared freely across tasks.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use logurt_auth::CapabilityCodec;
/// use logurt_protocol::FilterRequest;
///
/// let codec = CapabilityCodec::new(b"your-secret-key-at-least-32-bytes!").unwrap();
/// let token = codec
///     .issue(FilterRequest::new("prod").with_pod("web-1"), Duration::from_secs(3600))
///     .unwrap();
///
/// let filter = codec.decode(token.as_str()).unwrap();
/// assert_eq!(filter.pod(), "web-1");
/// ```
pub struct CapabilityCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for CapabilityCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityCodec")
            .field("algorithm", &"HS256")
            .field("clock", &self.clock)
            .finish()
    }
}

impl CapabilityCodec {
    /// Create a codec with an HMAC-SHA256 secret
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakSigningKey` if the secret is shorter than
    /// `MIN_SIGNING_KEY_LENGTH` bytes.
    pub fn new(secret: &[u8]) -> Result<Self> {
        if secret.len() < MIN_SIGNING_KEY_LENGTH {
            return Err(AuthError::WeakSigningKey {
                min: MIN_SIGNING_KEY_LENGTH,
                actual: secret.len(),
            });
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against our own clock after decoding
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock: Arc::new(SystemClock),
        })
    }

    /// Use a different time source
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validate a selector and sign it
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if the namespace is empty or a container
    /// is given without a pod.
    pub fn issue(&self, request: FilterRequest, lifetime: StdDuration) -> Result<CapabilityToken> {
        let spec = FilterSpec::try_from(request)?;
        self.sign(&spec, lifetime)
    }

    /// Sign an already validated selector
    pub fn sign(&self, spec: &FilterSpec, lifetime: StdDuration) -> Result<CapabilityToken> {
        let ttl = Duration::from_std(lifetime)
            .map_err(|e| AuthError::InvalidLifetime(e.to_string()))?;

        let issued_at = self.clock.now();
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::InvalidLifetime(format!("{:?} overflows", lifetime)))?;

        let claims = FilterClaims::new(spec, issued_at, expires_at);
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))?;

        debug!(filter = %spec, expires_at = %expires_at, "issued capability token");

        Ok(CapabilityToken {
            token,
            issued_at,
            expires_at,
        })
    }

    /// Verify a token and return the selector it carries
    ///
    /// # Errors
    ///
    /// - `AuthError::MissingToken` for an empty token
    /// - `AuthError::InvalidSignature` if the token does not verify
    /// - `AuthError::Expired` if the token verifies but has expired
    /// - `AuthError::InvalidClaims` if verified claims do not form a selector
    pub fn decode(&self, token: &str) -> Result<FilterSpec> {
        let claims = self.decode_claims(token)?;
        claims
            .to_filter()
            .map_err(|e| AuthError::invalid_claims(e.to_string()))
    }

    /// Verify a token and return its raw claims
    pub fn decode_claims(&self, token: &str) -> Result<FilterClaims> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        // Decode as a generic value so that a verified-but-malformed payload
        // is distinguishable from a token that failed verification.
        let token_data = decode::<serde_json::Value>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("capability token rejected: {:?}", e);
                AuthError::InvalidSignature
            })?;

        let claims: FilterClaims = serde_json::from_value(token_data.claims)
            .map_err(|e| AuthError::invalid_claims(e.to_string()))?;

        if claims.is_expired_at(self.clock.now()) {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
#[path = "codec_test.rs"]
mod tests;
