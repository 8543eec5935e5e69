//! Configuration validation
//!
//! Validates each section's values:
//! - Signing key, when present, is non-empty
//! - Token lifetime and cleanup interval are non-zero
//! - Viewer buffers hold at least one line

use crate::Config;
use crate::error::Result;

/// Validate the entire configuration
pub fn validate_config(config: &Config) -> Result<()> {
    config.auth.validate()?;
    config.stream.validate()?;
    Ok(())
}
