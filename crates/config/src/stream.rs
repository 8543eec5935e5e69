//! Live stream configuration

use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Live stream configuration
///
/// # Example
///
/// ```toml
/// [stream]
/// channel_capacity = 256
/// cleanup_interval = "5s"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Lines buffered per viewer before new lines are dropped
    /// Default: 256
    pub channel_capacity: usize,

    /// How often disconnected viewers are swept from the registry
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub cleanup_interval: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            cleanup_interval: Duration::from_secs(5),
        }
    }
}

impl StreamConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::invalid_value(
                "stream",
                "channel_capacity",
                "must be at least 1",
            ));
        }

        if self.cleanup_interval.is_zero() {
            return Err(ConfigError::invalid_value(
                "stream",
                "cleanup_interval",
                "must be non-zero",
            ));
        }

        Ok(())
    }
}
