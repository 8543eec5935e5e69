//! Verify command - decode a capability token
//!
//! Prints the selector the token grants, or why it was refused.

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tracing::debug;

use logurt_auth::{AuthError, CapabilityCodec, FilterClaims};
use logurt_config::Config;
use logurt_protocol::FilterSpec;

use super::KeyArgs;

/// Verify command arguments
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Token to verify
    token: String,

    #[command(flatten)]
    key: KeyArgs,
}

#[derive(Debug, Serialize)]
struct VerifyOutput {
    filter: FilterSpec,
    issued_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
}

/// Run the verify command
pub fn run(args: VerifyArgs, config: &Config) -> Result<()> {
    let codec = args.key.codec(config)?;

    match inspect(&codec, &args.token) {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) if e.is_rejection() => bail!("token rejected: {}", e),
        Err(e) => Err(e.into()),
    }
}

fn inspect(codec: &CapabilityCodec, token: &str) -> std::result::Result<VerifyOutput, AuthError> {
    let claims: FilterClaims = codec.decode_claims(token)?;
    let filter = claims
        .to_filter()
        .map_err(|e| AuthError::invalid_claims(e.to_string()))?;

    debug!(filter = %filter, "token verified");

    Ok(VerifyOutput {
        filter,
        issued_at: DateTime::from_timestamp(claims.issued_at, 0),
        expires_at: claims.expires_at_utc(),
    })
}
