//! JWT claims for capability tokens
//!
//! A capability token is an HS256 JWT whose claims are the viewer's selector
//! plus issue and expiry times. Claim names are kept short because tokens
//! travel in stream URLs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use logurt_protocol::{FilterSpec, Labels, ValidationError};

/// JWT claims carrying a viewer selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClaims {
    /// Namespace
    #[serde(rename = "ns")]
    pub namespace: String,

    /// Pod name (empty = any pod)
    #[serde(rename = "pod", default, skip_serializing_if = "String::is_empty")]
    pub pod: String,

    /// Container name (empty = any container)
    #[serde(rename = "ctn", default, skip_serializing_if = "String::is_empty")]
    pub container: String,

    /// Required labels
    #[serde(rename = "lbl", default, skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,

    // Standard JWT claims
    /// Issued at (Unix timestamp)
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration time (Unix timestamp)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl FilterClaims {
    /// Build claims for a selector issued at `issued_at`, valid until `expires_at`
    pub fn new(spec: &FilterSpec, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            namespace: spec.namespace().to_string(),
            pod: spec.pod().to_string(),
            container: spec.container().to_string(),
            labels: spec.labels().clone(),
            issued_at: issued_at.timestamp(),
            expires_at: expires_at.timestamp(),
        }
    }

    /// Check expiry against `now` (valid while `now <= exp`)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.expires_at
    }

    /// Expiry as a timestamp, if representable
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.expires_at, 0)
    }

    /// Rebuild the validated selector
    pub fn to_filter(&self) -> Result<FilterSpec, ValidationError> {
        FilterSpec::new(
            self.namespace.clone(),
            self.pod.clone(),
            self.container.clone(),
            self.labels.clone(),
        )
    }
}
