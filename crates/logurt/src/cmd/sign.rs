//! Sign command - issue a capability token
//!
//! # Usage
//!
//! ```bash
//! logurt sign --namespace prod
//! logurt sign --namespace prod --pod web-1 --container app --lifetime 15m
//! logurt sign --namespace prod --label app=web --label tier=frontend --json
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use logurt_config::Config;
use logurt_protocol::FilterRequest;

use super::KeyArgs;

/// Sign command arguments
#[derive(Args, Debug)]
pub struct SignArgs {
    /// Namespace the viewer may watch
    #[arg(short, long)]
    namespace: String,

    /// Restrict to one pod
    #[arg(short, long)]
    pod: Option<String>,

    /// Restrict to one container (requires --pod)
    #[arg(long)]
    container: Option<String>,

    /// Required pod label as KEY=VALUE (can be repeated)
    #[arg(short = 'L', long = "label", value_name = "KEY=VALUE", value_parser = parse_label)]
    labels: Vec<(String, String)>,

    /// Token lifetime (e.g. 15m, 2h). Defaults to `[auth] token_lifetime`.
    #[arg(long)]
    lifetime: Option<humantime::Duration>,

    /// Print token and expiry as JSON
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    key: KeyArgs,
}

#[derive(Serialize)]
struct SignOutput<'a> {
    token: &'a str,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Run the sign command
pub fn run(args: SignArgs, config: &Config) -> Result<()> {
    let codec = args.key.codec(config)?;

    let lifetime = args
        .lifetime
        .map(Into::into)
        .unwrap_or(config.auth.token_lifetime);

    let token = codec
        .issue(build_request(&args), lifetime)
        .context("failed to issue token")?;

    if args.json {
        let output = SignOutput {
            token: token.as_str(),
            issued_at: token.issued_at(),
            expires_at: token.expires_at(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", token);
        eprintln!("expires at {}", token.expires_at().to_rfc3339());
    }

    Ok(())
}

fn build_request(args: &SignArgs) -> FilterRequest {
    let mut request = FilterRequest::new(args.namespace.clone());

    if let Some(pod) = &args.pod {
        request = request.with_pod(pod.clone());
    }
    if let Some(container) = &args.container {
        request = request.with_container(container.clone());
    }
    for (key, value) in &args.labels {
        request = request.with_label(key.clone(), value.clone());
    }

    request
}

/// Parse a `KEY=VALUE` label argument
fn parse_label(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid label '{}', expected KEY=VALUE", s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: SignArgs,
    }

    fn parse(argv: &[&str]) -> SignArgs {
        let mut full = vec!["sign"];
        full.extend_from_slice(argv);
        TestCli::try_parse_from(full).unwrap().args
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(
            parse_label("app=web").unwrap(),
            ("app".to_string(), "web".to_string())
        );
        assert_eq!(
            parse_label("version=a=b").unwrap(),
            ("version".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_label("empty=").unwrap().1, "");
        assert!(parse_label("no-equals").is_err());
        assert!(parse_label("=web").is_err());
    }

    #[test]
    fn test_build_request() {
        let args = parse(&[
            "--namespace",
            "prod",
            "--pod",
            "web-1",
            "--container",
            "app",
            "-L",
            "app=web",
            "--lifetime",
            "15m",
        ]);

        let request = build_request(&args);
        assert_eq!(request.namespace, "prod");
        assert_eq!(request.pod, "web-1");
        assert_eq!(request.container, "app");
        assert_eq!(request.labels.get("app").map(String::as_str), Some("web"));
        assert_eq!(
            args.lifetime.map(std::time::Duration::from),
            Some(std::time::Duration::from_secs(15 * 60))
        );
    }

    #[test]
    fn test_container_without_pod_is_rejected_at_issue() {
        let args = parse(&["--namespace", "prod", "--container", "app"]);
        let config = Config::default();
        let key = KeyArgs {
            signing_key: Some("test-secret-key-32-bytes-long!!!".into()),
        };
        let codec = key.codec(&config).unwrap();

        let err = codec
            .issue(build_request(&args), config.auth.token_lifetime)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "pod is required when container is specified"
        );
    }
}
