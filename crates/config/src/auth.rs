//! Capability token configuration

use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Default capability token lifetime
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Capability token configuration
///
/// # Example
///
/// ```toml
/// [auth]
/// signing_key = "your-secret-key-at-least-32-characters-long"
/// token_lifetime = "60m"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared secret for signing capability tokens
    /// Required by every command that issues or verifies tokens; its
    /// strength is checked by the codec that uses it
    pub signing_key: Option<String>,

    /// How long an issued token stays valid
    /// Default: 60 minutes
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signing_key: None,
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
        }
    }
}

impl AuthConfig {
    /// Get the signing key, returning error if not configured
    pub fn signing_key_bytes(&self) -> Result<&[u8]> {
        self.signing_key
            .as_deref()
            .map(str::as_bytes)
            .ok_or_else(|| ConfigError::missing_field("auth", "signing_key"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.signing_key.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::invalid_value(
                "auth",
                "signing_key",
                "must not be empty",
            ));
        }

        if self.token_lifetime.is_zero() {
            return Err(ConfigError::invalid_value(
                "auth",
                "token_lifetime",
                "must be non-zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert!(config.signing_key.is_none());
        assert_eq!(config.token_lifetime, Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
signing_key = "this-is-a-very-long-secret-key-for-testing"
token_lifetime = "15m"
"#;
        let config: AuthConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.token_lifetime, Duration::from_secs(15 * 60));
        assert_eq!(
            config.signing_key_bytes().unwrap(),
            b"this-is-a-very-long-secret-key-for-testing"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_signing_key() {
        let config = AuthConfig::default();
        let err = config.signing_key_bytes().unwrap_err();
        assert!(err.to_string().contains("signing_key"));
    }

    #[test]
    fn test_validation_empty_signing_key() {
        let config = AuthConfig {
            signing_key: Some(String::new()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_validation_zero_lifetime() {
        let config: AuthConfig = toml::from_str("token_lifetime = \"0s\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_lifetime_syntax() {
        let result: std::result::Result<AuthConfig, _> =
            toml::from_str("token_lifetime = \"an hour\"");
        assert!(result.is_err());
    }
}
