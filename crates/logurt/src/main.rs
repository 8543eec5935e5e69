//! Logurt - Real-time log broadcast
//!
//! # Usage
//!
//! ```bash
//! # Issue a capability token for one pod
//! logurt --config logurt.toml sign --namespace prod --pod web-1
//!
//! # Inspect a token
//! logurt --config logurt.toml verify eyJhbGciOi...
//!
//! # Replay a Fluent Bit batch through the router as one viewer
//! logurt --config logurt.toml route --token eyJhbGciOi... --input batch.json
//! ```

mod cmd;

use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use logurt_auth::MIN_SIGNING_KEY_LENGTH;
use logurt_config::{Config, LogFormat};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Logurt - Real-time log broadcast
#[derive(Parser, Debug)]
#[command(name = "logurt")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Issue a capability token for a log selector
    Sign(cmd::sign::SignArgs),

    /// Verify a capability token and print its selector
    Verify(cmd::verify::VerifyArgs),

    /// Route a Fluent Bit batch to a viewer holding a token
    Route(cmd::route::RouteArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let log_level = resolve_log_level(cli.log_level.as_deref(), &config);
    init_logging(&log_level, config.log.format)?;

    match cli.command {
        Command::Sign(args) => cmd::sign::run(args, &config),
        Command::Verify(args) => cmd::verify::run(args, &config),
        Command::Route(args) => cmd::route::run(args, &config).await,
    }
}

/// Load the config file, or defaults when none is given
fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let config = Config::from_file(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;

    if let Some(key) = &config.auth.signing_key
        && key.len() < MIN_SIGNING_KEY_LENGTH
    {
        bail!(
            "{}: auth.signing_key must be at least {} bytes",
            path.display(),
            MIN_SIGNING_KEY_LENGTH
        );
    }

    Ok(config)
}

/// Resolve log level: CLI flag > config file > default "info"
fn resolve_log_level(cli_level: Option<&str>, config: &Config) -> String {
    match cli_level {
        Some(level) => level.to_string(),
        None => config.log.level.as_str().to_string(),
    }
}

/// Initialize the tracing subscriber for logging
///
/// Logs go to stderr; stdout carries command output.
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Console => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }

    Ok(())
}
