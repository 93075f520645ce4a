//! Global context for scan execution

use crate::cli::args::{Cli, OutputFormat};
use crate::http::client::{ClientOptions, TlsPolicy, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::scan::request::ScanRequest;
use anyhow::{bail, Context as _};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A request file holds one request or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum RequestFile {
    One(ScanRequest),
    Many(Vec<ScanRequest>),
}

pub struct Context {
    pub requests: Vec<ScanRequest>,
    pub client: ClientOptions,
    pub rate_limit: u32,
    pub threads: usize,
    pub baseline_retries: usize,
    pub quiet: bool,
    pub output_format: OutputFormat,
    pub output_file: Option<PathBuf>,
}

impl Context {
    pub fn from_cli(cli: Cli) -> anyhow::Result<Self> {
        let requests = match &cli.request {
            Some(path) => {
                let mut requests = load_requests(path)?;
                // --confirm on the command line covers every request in the file
                if cli.confirm {
                    for req in &mut requests {
                        req.explicit_confirmation = true;
                    }
                }
                requests
            }
            None => {
                let Some(target) = cli.target.as_deref() else {
                    bail!("no target given (use -t or --request)");
                };
                let kinds = cli.selected_kinds();
                if kinds.is_empty() {
                    bail!("no probe kind selected (use -k <kind> or --all)");
                }
                kinds
                    .into_iter()
                    .map(|kind| {
                        ScanRequest::new(target, kind)
                            .confirmed(cli.confirm)
                            .timeout_seconds(cli.timeout)
                    })
                    .collect()
            }
        };

        if requests.is_empty() {
            bail!("request file contains no scan requests");
        }

        // Parse custom headers
        let mut headers = HashMap::new();
        for header in &cli.headers {
            match header.split_once(':') {
                Some((key, value)) if !key.trim().is_empty() => {
                    headers.insert(key.trim().to_string(), value.trim().to_string());
                }
                _ => tracing::warn!("Ignoring malformed header (expected 'Name: value'): {}", header),
            }
        }

        let client = ClientOptions {
            timeout: client_timeout(&requests),
            tls: if cli.insecure {
                TlsPolicy::AcceptInvalid
            } else {
                TlsPolicy::Verify
            },
            user_agent: cli
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            headers,
            cookies: cli.cookie.clone(),
            max_body_bytes: cli.max_body_bytes.max(1),
        };

        Ok(Self {
            requests,
            client,
            rate_limit: cli.rate,
            threads: cli.threads.max(1),
            baseline_retries: cli.baseline_retries,
            quiet: cli.quiet,
            output_format: cli.format,
            output_file: cli.output,
        })
    }
}

/// Client-wide timeout: the longest any request asks for. Each probe still
/// carries its own deadline.
fn client_timeout(requests: &[ScanRequest]) -> Duration {
    requests
        .iter()
        .filter_map(|r| Duration::try_from_secs_f64(r.timeout_seconds).ok())
        .filter(|t| !t.is_zero())
        .max()
        .unwrap_or(DEFAULT_TIMEOUT)
}

fn load_requests(path: &Path) -> anyhow::Result<Vec<ScanRequest>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading scan request file {}", path.display()))?;
    let parsed: RequestFile = serde_json::from_str(&raw)
        .with_context(|| format!("parsing scan request file {}", path.display()))?;
    Ok(match parsed {
        RequestFile::One(req) => vec![req],
        RequestFile::Many(reqs) => reqs,
    })
}
