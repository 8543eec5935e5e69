//! Test utilities for capability tokens
//!
//! These helpers build codecs and tokens through the real signing path.
//! Use these instead of mocking.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use crate::claims::FilterClaims;
use crate::clock::ManualClock;
use crate::codec::CapabilityCodec;

/// Test secret for token signing (32 bytes for HS256)
pub const TEST_SECRET: &[u8] = b"test-secret-key-32-bytes-long!!!";

/// Default lifetime for test tokens (60 minutes)
pub const TEST_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Fixed instant test clocks start at (2023-11-14T22:13:20Z)
pub fn test_epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Create a codec with the test secret and a manual clock at `test_epoch()`
///
/// # Example
///
/// ```
/// use logurt_auth::test_utils::{TEST_LIFETIME, test_codec};
/// use logurt_protocol::FilterRequest;
///
/// let (codec, clock) = test_codec();
/// let token = codec.issue(FilterRequest::new("prod"), TEST_LIFETIME).unwrap();
/// clock.advance(chrono::Duration::hours(2));
/// assert!(codec.decode(token.as_str()).is_err());
/// ```
pub fn test_codec() -> (CapabilityCodec, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(test_epoch()));
    let codec = CapabilityCodec::new(TEST_SECRET)
        .expect("test secret is long enough")
        .with_clock(Arc::clone(&clock) as Arc<dyn crate::Clock>);
    (codec, clock)
}

/// Sign arbitrary claims with `secret`, bypassing selector validation
///
/// Useful for tokens the codec itself would refuse to issue.
pub fn sign_raw_claims(claims: &serde_json::Value, secret: &[u8]) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret))
        .expect("failed to encode test JWT")
}

/// Sign `FilterClaims` with `secret`
pub fn sign_claims(claims: &FilterClaims, secret: &[u8]) -> String {
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret))
        .expect("failed to encode test JWT")
}
