//! Command implementations for the logurt CLI

pub mod route;
pub mod sign;
pub mod verify;

use anyhow::{Context, Result};
use clap::Args;
use logurt_auth::CapabilityCodec;
use logurt_config::Config;

/// Signing key source shared by every command
#[derive(Args, Debug, Default)]
pub struct KeyArgs {
    /// Signing key (overrides `[auth] signing_key` from the config file)
    #[arg(long, value_name = "KEY")]
    pub signing_key: Option<String>,
}

impl KeyArgs {
    /// Build a codec from the flag, falling back to the config file
    pub fn codec(&self, config: &Config) -> Result<CapabilityCodec> {
        let key = match &self.signing_key {
            Some(key) => key.as_bytes(),
            None => config
                .auth
                .signing_key_bytes()
                .context("no signing key: pass --signing-key or set [auth] signing_key")?,
        };

        CapabilityCodec::new(key).context("invalid signing key")
    }
}
