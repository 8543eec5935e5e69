//! Route command - replay a Fluent Bit batch through the router
//!
//! Connects one viewer with the selector carried by a capability token,
//! ingests the batch, and prints every line the viewer receives followed by
//! a dispatch summary on stderr.
//!
//! # Usage
//!
//! ```bash
//! logurt route --token "$(logurt sign --namespace prod)" --input batch.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::Args;
use tracing::info;

use logurt_auth::CapabilityCodec;
use logurt_config::Config;
use logurt_protocol::decode_fluentbit_batch;
use logurt_tap::{BroadcastRouter, DispatchReport, RouterConfig};

use super::KeyArgs;

/// Route command arguments
#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Capability token of the viewer
    #[arg(short, long)]
    token: String,

    /// Fluent Bit JSON batch file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    #[command(flatten)]
    key: KeyArgs,
}

/// Lines received by the viewer and the router's report
#[derive(Debug)]
struct RouteOutcome {
    lines: Vec<Bytes>,
    report: DispatchReport,
}

/// Run the route command
pub async fn run(args: RouteArgs, config: &Config) -> Result<()> {
    let codec = args.key.codec(config)?;

    let payload = tokio::fs::read(&args.input)
        .await
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let outcome = route_batch(
        &codec,
        &args.token,
        &payload,
        config.stream.channel_capacity,
    )?;

    for line in &outcome.lines {
        println!("{}", String::from_utf8_lossy(line));
    }

    let report = &outcome.report;
    eprintln!(
        "records={} matched={} delivered={} failed={}",
        report.records().len(),
        report.total_matched(),
        report.total_delivered(),
        report.total_failures()
    );

    Ok(())
}

/// Decode the token, connect a viewer, ingest the batch, and drain the viewer
///
/// The viewer is drained only after the whole batch is ingested, so its
/// buffer holds at least one line per record.
fn route_batch(
    codec: &CapabilityCodec,
    token: &str,
    payload: &[u8],
    channel_capacity: usize,
) -> Result<RouteOutcome> {
    let filter = codec.decode(token).context("token rejected")?;
    let records = decode_fluentbit_batch(payload).context("invalid batch")?;

    let router = BroadcastRouter::with_config(RouterConfig {
        channel_capacity: channel_capacity.max(records.len()).max(1),
    })?;

    let mut stream = router.connect(filter);
    info!(
        id = %stream.id(),
        filter = %stream.filter(),
        records = records.len(),
        "routing batch"
    );

    let report = router.ingest(&records);

    let mut lines = Vec::with_capacity(report.total_delivered());
    while let Some(line) = stream.try_recv() {
        lines.push(line);
    }

    Ok(RouteOutcome { lines, report })
}

#[cfg(test)]
#[path = "route_test.rs"]
mod tests;
