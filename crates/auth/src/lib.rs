//! Logurt - Capability tokens
//!
//! Issues and verifies the signed, short-lived tokens that scope a viewer to
//! a namespace/pod/container/label selector.
//!
//! # Token format
//!
//! An HS256 JWT with the selector embedded as claims:
//!
//! ```text
//! {"ns": "prod", "pod": "web-1", "ctn": "app", "lbl": {"app": "web"}, "iat": ..., "exp": ...}
//! ```
//!
//! - Empty `pod`/`ctn`/`lbl` are omitted and mean "any"
//! - Valid while `now <= exp`
//! - Any token that fails verification is reported as `InvalidSignature`

mod claims;
mod clock;
mod codec;
mod error;

/// Test utilities for building codecs and tokens
pub mod test_utils;

pub use claims::FilterClaims;
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{CapabilityCodec, CapabilityToken, MIN_SIGNING_KEY_LENGTH};
pub use error::{AuthError, Result};
