//! One scan end to end: validate, baseline, fan out, aggregate.

pub mod aggregator;
pub mod cancel;
pub mod dispatcher;
pub mod request;
pub mod result;

pub use aggregator::ResultAggregator;
pub use cancel::CancelHandle;
pub use dispatcher::Dispatcher;
pub use request::ScanRequest;
pub use result::ScanResult;

use crate::error::ScanError;
use crate::http::client::HttpClient;
use crate::http::retry::RetryStrategy;
use crate::payload::tag::generate_run_id;
use crate::probe::config::ProbeKindConfig;
use crate::validation::baseline::Baseline;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct Scanner {
    client: Arc<HttpClient>,
    concurrency: usize,
    baseline_retry: RetryStrategy,
    cancel: CancelHandle,
}

impl Scanner {
    pub fn new(client: HttpClient, concurrency: usize) -> Self {
        Self {
            client: Arc::new(client),
            concurrency: concurrency.max(1),
            baseline_retry: RetryStrategy::none(),
            cancel: CancelHandle::new(),
        }
    }

    pub fn with_baseline_retry(mut self, retry: RetryStrategy) -> Self {
        self.baseline_retry = retry;
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Run one scan. Only invalid input is an error; every network failure
    /// ends up inside the result.
    pub async fn run(&self, request: &ScanRequest) -> Result<ScanResult, ScanError> {
        let validated = request.validate()?;
        let started_at = Utc::now();
        let run_id = generate_run_id();
        let config = ProbeKindConfig::for_kind(validated.kind);

        tracing::info!(
            "Run {}: {} scan of {} (timeout {:?})",
            run_id,
            validated.kind.title(),
            validated.target,
            validated.timeout
        );
        if let Some(tag) = config.tag() {
            tracing::info!("Injection tag: {}", tag);
        }

        let probes = config.probes(&validated.target);

        let baseline = Baseline::capture(
            &self.client,
            &validated.target,
            validated.timeout,
            &self.baseline_retry,
        )
        .await;

        let aggregator = ResultAggregator::new(
            run_id,
            &config,
            &validated.target,
            started_at,
            baseline.clone(),
        );

        let (tx, rx) = mpsc::channel(self.concurrency);
        let dispatcher = Dispatcher::new(
            Arc::clone(&self.client),
            self.concurrency,
            validated.timeout,
            self.cancel.clone(),
        );

        let (outcome, aggregator) = tokio::join!(
            dispatcher.dispatch(probes, &config, &baseline, tx),
            aggregator.collect(rx)
        );

        let result = aggregator.finalize(outcome.cancelled);
        tracing::info!(
            "Run {} finished: {} results, {} positive",
            result.run_id,
            result.summary.total,
            result.summary.positive_count
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rate_limit::RateLimiter;
    use crate::http::client::ClientOptions;
    use crate::payload::catalog;
    use crate::probe::kind::ProbeKind;
    use crate::testing::{closed_port, http_response, query_value, silent_server, TestServer};
    use crate::validation::verdict::{ClassificationLabel, EvidenceKind};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn scanner(concurrency: usize) -> Scanner {
        let client = HttpClient::new(ClientOptions::default(), RateLimiter::unlimited()).unwrap();
        Scanner::new(client, concurrency).with_baseline_retry(RetryStrategy::none())
    }

    fn request(target: String, kind: ProbeKind) -> ScanRequest {
        ScanRequest::new(target, kind).confirmed(true).timeout_seconds(5.0)
    }

    fn ranked(result: &ScanResult) -> bool {
        let flags: Vec<bool> = result.verdicts.iter().map(|v| v.is_vulnerable()).collect();
        let split = flags.iter().take_while(|v| **v).count();
        let vulnerable_first = flags[split..].iter().all(|v| !v);
        let ordered = |group: &[crate::validation::verdict::Verdict]| {
            group.windows(2).all(|w| w[0].probe.index < w[1].probe.index)
        };
        vulnerable_first && ordered(&result.verdicts[..split]) && ordered(&result.verdicts[split..])
    }

    #[tokio::test]
    async fn crlf_tag_echoed_into_headers() {
        let server = TestServer::start(Duration::ZERO, |target| {
            // a naive server that only splits on a literal lowercase %0d%0a
            match (target.contains("%0d%0a"), target.find("crlf-")) {
                (true, Some(at)) => {
                    let tag = &target[at..at + 11];
                    http_response(200, &[("X-CRLF-TEST", tag)], "ok")
                }
                _ => http_response(200, &[], "ok"),
            }
        })
        .await;

        let result = scanner(4)
            .run(&request(server.url("/?p="), ProbeKind::Crlf))
            .await
            .unwrap();

        let tag = result.tag.clone().unwrap();
        assert!(tag.starts_with("crlf-"));
        assert!(result.verdicts.iter().all(|v| v.probe.url.contains(&tag)));
        assert_eq!(result.summary.total, 8);

        let positives: Vec<usize> = result.positives().map(|v| v.probe.index).collect();
        assert_eq!(positives, vec![0, 1, 2, 4]);
        let first = &result.verdicts[0];
        assert_eq!(first.label(), ClassificationLabel::ConfirmedVulnerability);
        assert_eq!(first.evidence()[0].kind, EvidenceKind::HeaderReflection);
        assert!(ranked(&result));
        assert!(result.baseline.response().is_some());
        assert!(!result.cancelled);
    }

    #[tokio::test]
    async fn xss_echo_ranks_reflections_first() {
        let server = TestServer::start(Duration::ZERO, |target| {
            http_response(200, &[("Content-Type", "text/html")], &query_value(target))
        })
        .await;

        let result = scanner(8)
            .run(&request(server.url("/search?q="), ProbeKind::Xss))
            .await
            .unwrap();

        assert_eq!(result.summary.total, catalog::xss_payloads().len());
        assert!(result.summary.positive_count > 0);
        assert!(result.verdicts[0].is_vulnerable());
        assert!(ranked(&result));
        assert!(result.tag.is_none());

        // fragments never reach the server
        for index in [15, 16] {
            let verdict = result.verdicts.iter().find(|v| v.probe.index == index).unwrap();
            assert_eq!(verdict.label(), ClassificationLabel::Safe);
        }
        let h1 = result.verdicts.iter().find(|v| v.probe.index == 1).unwrap();
        assert_eq!(h1.label(), ClassificationLabel::ConfirmedVulnerability);
    }

    #[tokio::test]
    async fn open_redirect_flags_external_location() {
        let server = TestServer::start(Duration::ZERO, |target| {
            let next = query_value(target);
            if next.is_empty() {
                http_response(200, &[], "home")
            } else {
                http_response(302, &[("Location", next.as_str())], "")
            }
        })
        .await;

        let result = scanner(4)
            .run(&request(server.url("/go?next="), ProbeKind::OpenRedirect))
            .await
            .unwrap();

        let external = result.verdicts.iter().find(|v| v.probe.index == 0).unwrap();
        assert_eq!(external.label(), ClassificationLabel::PossibleVulnerability);
        assert_eq!(external.evidence()[0].matched, "google.com");

        let internal = result.verdicts.iter().find(|v| v.probe.index == 8).unwrap();
        assert!(!internal.is_vulnerable());
        assert_eq!(internal.note.as_deref(), Some("internal redirect"));
    }

    #[tokio::test]
    async fn unreachable_target_still_produces_a_result() {
        let addr = closed_port().await;
        let result = scanner(4)
            .run(&request(format!("http://{}/?f=", addr), ProbeKind::Lfi))
            .await
            .unwrap();

        assert!(result.baseline.capture.error().is_some());
        assert_eq!(result.summary.total, catalog::lfi_payloads().len());
        assert_eq!(result.summary.positive_count, 0);
        assert!(result
            .verdicts
            .iter()
            .all(|v| v.label() == ClassificationLabel::Error));
    }

    #[tokio::test]
    async fn baseline_is_a_single_request_by_default() {
        // not HTTP, so every request fails at the transport layer
        let server = TestServer::start(Duration::ZERO, |_| "garbage\r\n\r\n".to_string()).await;
        let client = HttpClient::new(ClientOptions::default(), RateLimiter::unlimited()).unwrap();

        let result = Scanner::new(client, 4)
            .run(&request(server.url("/?f="), ProbeKind::Lfi))
            .await
            .unwrap();

        assert!(result.baseline.capture.error().is_some());
        assert_eq!(server.hits(), 1 + catalog::lfi_payloads().len());
    }

    #[tokio::test]
    async fn invalid_input_sends_no_traffic() {
        let server = TestServer::start(Duration::ZERO, |_| http_response(200, &[], "ok")).await;
        let req = ScanRequest::new(server.url("/?q="), ProbeKind::Ssti);

        let err = scanner(4).run(&req).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidInput(_)));
        assert_eq!(server.hits(), 0);
    }

    #[tokio::test]
    async fn cancellation_returns_partial_result() {
        let (addr, _task) = silent_server().await;
        let scanner = scanner(4);
        let cancel = scanner.cancel_handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            cancel.cancel();
        });

        let req = ScanRequest::new(format!("http://{}/?q=", addr), ProbeKind::Xss)
            .confirmed(true)
            .timeout_seconds(0.5);
        let result = tokio::time::timeout(Duration::from_secs(10), scanner.run(&req))
            .await
            .expect("scan should stop after cancel")
            .unwrap();

        assert!(result.cancelled);
        assert!(result.summary.total < catalog::xss_payloads().len());
    }
}
