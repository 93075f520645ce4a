//! Bounded-concurrency fan-out of probe requests

use crate::classify::ClassificationRule;
use crate::http::client::HttpClient;
use crate::http::request::HttpRequest;
use crate::http::response::Capture;
use crate::probe::config::ProbeKindConfig;
use crate::probe::request::ProbeRequest;
use crate::scan::cancel::CancelHandle;
use crate::validation::baseline::Baseline;
use crate::validation::verdict::Verdict;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub const DEFAULT_CONCURRENCY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub completed: usize,
    pub cancelled: bool,
}

pub struct Dispatcher {
    client: Arc<HttpClient>,
    concurrency: usize,
    timeout: Duration,
    cancel: CancelHandle,
}

impl Dispatcher {
    pub fn new(
        client: Arc<HttpClient>,
        concurrency: usize,
        timeout: Duration,
        cancel: CancelHandle,
    ) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
            timeout,
            cancel,
        }
    }

    /// Run every probe with at most `concurrency` requests in flight and
    /// send each verdict as it completes. Dropping `tx` on return closes the
    /// channel for the aggregator.
    pub async fn dispatch(
        &self,
        probes: Vec<ProbeRequest>,
        rule: &ProbeKindConfig,
        baseline: &Baseline,
        tx: mpsc::Sender<Verdict>,
    ) -> DispatchOutcome {
        let total = probes.len();
        tracing::info!(
            "Dispatching {} {} probes across {} workers",
            total,
            rule.kind(),
            self.concurrency
        );

        let client = self.client.as_ref();
        let timeout = self.timeout;
        let gate = self.cancel.clone();

        let verdicts = stream::iter(probes)
            .take_while(move |_| futures::future::ready(!gate.is_cancelled()))
            .map(move |probe| run_probe(client, rule, baseline, probe, timeout))
            .buffer_unordered(self.concurrency);
        tokio::pin!(verdicts);

        let mut completed = 0;
        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                next = verdicts.next() => match next {
                    Some(verdict) => {
                        completed += 1;
                        if tx.send(verdict).await.is_err() {
                            tracing::warn!("Result channel closed, stopping dispatch");
                            break;
                        }
                    }
                    None => break,
                },
            }
        }

        let cancelled = self.cancel.is_cancelled();
        if cancelled {
            tracing::warn!("Scan cancelled after {}/{} probes", completed, total);
        } else {
            tracing::info!("All {} probes completed", completed);
        }

        DispatchOutcome {
            completed,
            cancelled,
        }
    }
}

async fn run_probe(
    client: &HttpClient,
    rule: &ProbeKindConfig,
    baseline: &Baseline,
    probe: ProbeRequest,
    timeout: Duration,
) -> Verdict {
    let outcome = match HttpRequest::parse_get(&probe.url) {
        Ok(req) => {
            let req = req
                .timeout(timeout)
                .follow_redirects(probe.kind.follows_redirects());
            client.execute_bounded(req).await
        }
        Err(e) => Err(e),
    };

    match &outcome {
        Ok(resp) => tracing::debug!(
            "Payload #{} -> {} ({} bytes, {}ms)",
            probe.index,
            resp.status_code,
            resp.body_len,
            resp.elapsed_ms
        ),
        Err(e) => tracing::debug!("Payload #{} failed: {}", probe.index, e),
    }

    let verdict = rule.classify(&probe, &Capture::from(outcome));
    if verdict.is_vulnerable() {
        tracing::info!(
            "[{}] {} payload #{}: {}",
            verdict.label(),
            probe.kind,
            probe.index,
            probe.display_payload
        );
    }
    baseline.annotate(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rate_limit::RateLimiter;
    use crate::error::TransportErrorKind;
    use crate::http::client::ClientOptions;
    use crate::http::response::response_fixture;
    use crate::probe::kind::ProbeKind;
    use crate::testing::{closed_port, http_response, silent_server, TestServer};
    use crate::validation::verdict::ClassificationLabel;

    fn client(timeout: Duration) -> Arc<HttpClient> {
        let options = ClientOptions {
            timeout,
            ..ClientOptions::default()
        };
        Arc::new(HttpClient::new(options, RateLimiter::unlimited()).unwrap())
    }

    fn baseline() -> Baseline {
        Baseline::from_response(response_fixture(200, &[], "ok"))
    }

    async fn run(
        dispatcher: &Dispatcher,
        config: &ProbeKindConfig,
        target: &str,
    ) -> (DispatchOutcome, Vec<Verdict>) {
        let (tx, mut rx) = mpsc::channel(8);
        let base = baseline();
        let probes = config.probes(target);
        let collect = async {
            let mut out = Vec::new();
            while let Some(v) = rx.recv().await {
                out.push(v);
            }
            out
        };
        tokio::join!(dispatcher.dispatch(probes, config, &base, tx), collect)
    }

    #[tokio::test]
    async fn every_probe_yields_one_verdict() {
        let server = TestServer::start(Duration::ZERO, |_| http_response(200, &[], "nothing")).await;
        let dispatcher = Dispatcher::new(client(Duration::from_secs(5)), 4, Duration::from_secs(5), CancelHandle::new());
        let config = ProbeKindConfig::for_kind(ProbeKind::Lfi);

        let (outcome, verdicts) = run(&dispatcher, &config, &server.url("/?f=")).await;

        assert!(!outcome.cancelled);
        assert_eq!(outcome.completed, 8);
        let mut indices: Vec<_> = verdicts.iter().map(|v| v.probe.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..8).collect::<Vec<_>>());
        assert!(verdicts.iter().all(|v| v.label() == ClassificationLabel::Safe));
        assert_eq!(server.hits(), 8);
    }

    #[tokio::test]
    async fn in_flight_never_exceeds_worker_count() {
        let server =
            TestServer::start(Duration::from_millis(60), |_| http_response(200, &[], "ok")).await;
        let dispatcher = Dispatcher::new(client(Duration::from_secs(5)), 2, Duration::from_secs(5), CancelHandle::new());
        let config = ProbeKindConfig::for_kind(ProbeKind::Lfi);

        let (outcome, _) = run(&dispatcher, &config, &server.url("/?f=")).await;

        assert_eq!(outcome.completed, 8);
        assert!(server.max_in_flight() <= 2, "saw {}", server.max_in_flight());
    }

    #[tokio::test]
    async fn refused_connection_is_an_error_verdict() {
        let addr = closed_port().await;
        let dispatcher = Dispatcher::new(client(Duration::from_secs(2)), 4, Duration::from_secs(2), CancelHandle::new());
        let config = ProbeKindConfig::for_kind(ProbeKind::Ssti);

        let (outcome, verdicts) = run(&dispatcher, &config, &format!("http://{}/?q=", addr)).await;

        assert_eq!(outcome.completed, verdicts.len());
        assert!(!verdicts.is_empty());
        for verdict in &verdicts {
            assert_eq!(verdict.label(), ClassificationLabel::Error);
            assert!(!verdict.is_vulnerable());
            assert!(verdict.capture.error().is_some());
        }
    }

    #[tokio::test]
    async fn silent_host_times_out_per_probe() {
        let (addr, _task) = silent_server().await;
        let timeout = Duration::from_millis(200);
        let dispatcher = Dispatcher::new(client(timeout), 8, timeout, CancelHandle::new());
        let config = ProbeKindConfig::for_kind(ProbeKind::Lfi);

        let started = std::time::Instant::now();
        let (_, verdicts) = run(&dispatcher, &config, &format!("http://{}/?f=", addr)).await;

        assert_eq!(verdicts.len(), 8);
        assert!(started.elapsed() < Duration::from_secs(5));
        for verdict in &verdicts {
            let err = verdict.capture.error().unwrap();
            assert_eq!(err.kind, TransportErrorKind::Timeout);
        }
    }

    #[tokio::test]
    async fn cancel_before_dispatch_sends_nothing() {
        let server = TestServer::start(Duration::ZERO, |_| http_response(200, &[], "ok")).await;
        let cancel = CancelHandle::new();
        cancel.cancel();
        let dispatcher = Dispatcher::new(client(Duration::from_secs(5)), 4, Duration::from_secs(5), cancel);
        let config = ProbeKindConfig::for_kind(ProbeKind::Xss);

        let (outcome, verdicts) = run(&dispatcher, &config, &server.url("/?q=")).await;

        assert!(outcome.cancelled);
        assert!(verdicts.is_empty());
        assert_eq!(server.hits(), 0);
    }

    #[tokio::test]
    async fn cancel_mid_scan_returns_promptly() {
        let (addr, _task) = silent_server().await;
        let cancel = CancelHandle::new();
        let dispatcher = Dispatcher::new(
            client(Duration::from_secs(30)),
            4,
            Duration::from_secs(30),
            cancel.clone(),
        );
        let config = ProbeKindConfig::for_kind(ProbeKind::Lfi);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        });

        let (outcome, verdicts) = tokio::time::timeout(
            Duration::from_secs(5),
            run(&dispatcher, &config, &format!("http://{}/?f=", addr)),
        )
        .await
        .expect("dispatch should stop on cancel");

        assert!(outcome.cancelled);
        assert!(verdicts.is_empty());
    }
}
