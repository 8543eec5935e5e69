//! Logurt Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use logurt_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[log]\nlevel = \"debug\"").unwrap();
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [log]
//! level = "info"
//! format = "console"
//!
//! [auth]
//! signing_key = "your-secret-key-at-least-32-characters-long"
//! token_lifetime = "60m"
//!
//! [stream]
//! channel_capacity = 256
//! cleanup_interval = "5s"
//! ```

mod auth;
mod error;
mod logging;
mod stream;
mod validation;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use auth::{AuthConfig, DEFAULT_TOKEN_LIFETIME};
pub use error::{ConfigError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use stream::StreamConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub log: LogConfig,

    /// Capability token configuration
    pub auth: AuthConfig,

    /// Live stream configuration
    pub stream: StreamConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or contains invalid TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.log.level, LogLevel::Info);
        assert!(config.auth.signing_key.is_none());
        assert_eq!(config.auth.token_lifetime, DEFAULT_TOKEN_LIFETIME);
        assert_eq!(config.stream.channel_capacity, 256);
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[log]
level = "trace"
format = "json"

[auth]
signing_key = "this-is-a-very-long-secret-key-for-testing"
token_lifetime = "2h"

[stream]
channel_capacity = 64
cleanup_interval = "1s"
"#;
        let config = Config::from_str(toml).unwrap();

        assert_eq!(config.log.level, LogLevel::Trace);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.auth.token_lifetime, Duration::from_secs(2 * 60 * 60));
        assert_eq!(config.stream.channel_capacity, 64);
        assert_eq!(config.stream.cleanup_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_str("invalid { toml");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[stream]\nchannel_capacity = 8").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.stream.channel_capacity, 8);
    }

    #[test]
    fn test_from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let result = Config::from_file(&path);
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }

    #[test]
    fn test_from_file_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[stream]\nchannel_capacity = 0").unwrap();

        assert!(Config::from_file(file.path()).is_err());
    }
}
