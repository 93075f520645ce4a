//! PROBEWORK engine
//!
//! Runs every requested scan in order and renders the report.

use crate::cli::args::OutputFormat;
use crate::core::context::Context;
use crate::core::rate_limit::RateLimiter;
use crate::http::client::HttpClient;
use crate::http::retry::RetryStrategy;
use crate::reporting;
use crate::scan::{ScanResult, Scanner};
use anyhow::Context as _;

pub struct Engine {
    ctx: Context,
}

impl Engine {
    pub fn new(ctx: Context) -> anyhow::Result<Self> {
        Ok(Self { ctx })
    }

    pub async fn run(&self) -> anyhow::Result<Vec<ScanResult>> {
        tracing::info!("Starting PROBEWORK: {} scan(s)", self.ctx.requests.len());
        if self.ctx.rate_limit > 0 {
            tracing::info!("Rate limit: {} req/sec", self.ctx.rate_limit);
        }

        // Nothing goes on the wire unless every request is valid
        for (i, request) in self.ctx.requests.iter().enumerate() {
            request
                .validate()
                .with_context(|| format!("scan request #{} ({})", i + 1, request.probe_kind))?;
        }

        // -------------------------------------------------
        // Core initialization
        // -------------------------------------------------
        let limiter = RateLimiter::new(self.ctx.rate_limit);
        if self.ctx.client.cookies.is_some() || !self.ctx.client.headers.is_empty() {
            tracing::info!("Using authenticated session");
            if self.ctx.client.cookies.is_some() {
                tracing::info!("  Cookie: <redacted>");
            }
            if !self.ctx.client.headers.is_empty() {
                tracing::info!("  Custom headers: {}", self.ctx.client.headers.len());
            }
        }
        let client = HttpClient::new(self.ctx.client.clone(), limiter)?;

        let scanner = Scanner::new(client, self.ctx.threads)
            .with_baseline_retry(RetryStrategy::new(self.ctx.baseline_retries));

        let cancel = scanner.cancel_handle();
        let interrupt = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("Interrupt received, cancelling scan");
                    cancel.cancel();
                }
            })
        };

        // -------------------------------------------------
        // Scans, one kind after another
        // -------------------------------------------------
        let mut results = Vec::with_capacity(self.ctx.requests.len());
        for request in &self.ctx.requests {
            if cancel.is_cancelled() {
                tracing::warn!("Skipping {} scan after cancellation", request.probe_kind);
                continue;
            }
            let result = scanner.run(request).await?;
            results.push(result);
        }
        interrupt.abort();

        self.report(&results)?;
        Ok(results)
    }

    fn report(&self, results: &[ScanResult]) -> anyhow::Result<()> {
        let rendered = match self.ctx.output_format {
            OutputFormat::Text => reporting::text::render(results),
            OutputFormat::Json => reporting::json::render(results)?,
        };

        match &self.ctx.output_file {
            Some(path) => {
                std::fs::write(path, &rendered)
                    .with_context(|| format!("writing report to {}", path.display()))?;
                tracing::info!("Report written to {}", path.display());
                if !self.ctx.quiet {
                    // keep the terminal summary even when the report goes to a file
                    print!("{}", reporting::text::render(results));
                }
            }
            None => println!("{}", rendered),
        }
        Ok(())
    }
}
