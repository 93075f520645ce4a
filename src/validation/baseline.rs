use crate::http::client::HttpClient;
use crate::http::request::HttpRequest;
use crate::http::response::{Capture, RawResponse};
use crate::http::retry::RetryStrategy;
use crate::validation::diff::diff;
use crate::validation::verdict::Verdict;
use serde::Serialize;
use std::time::Duration;

/// The unmodified target response, captured once before fan-out.
#[derive(Clone, Debug, Serialize)]
#[serde(transparent)]
pub struct Baseline {
    pub capture: Capture,
}

impl Baseline {
    /// Fetch the target as-is. Failure is recorded, never raised.
    pub async fn capture(
        client: &HttpClient,
        target: &str,
        timeout: Duration,
        retry: &RetryStrategy,
    ) -> Self {
        let result = retry
            .retry_with_backoff(move || async move {
                let req = HttpRequest::parse_get(target)?.timeout(timeout);
                client.execute_bounded(req).await
            })
            .await;

        match &result {
            Ok(resp) => tracing::info!(
                "Baseline: status={} time={}ms size={}",
                resp.status_code,
                resp.elapsed_ms,
                resp.body_len
            ),
            Err(e) => tracing::warn!("Baseline fetch error: {}", e),
        }

        Self {
            capture: result.into(),
        }
    }

    pub fn from_response(resp: RawResponse) -> Self {
        Self {
            capture: Capture::Response(resp),
        }
    }

    pub fn response(&self) -> Option<&RawResponse> {
        self.capture.response()
    }

    /// Attach the baseline diff and flag body evidence the untouched page
    /// already contained. Never changes whether the verdict is vulnerable.
    pub fn annotate(&self, mut verdict: Verdict) -> Verdict {
        let (Some(base), Some(resp)) = (self.response(), verdict.capture.response()) else {
            return verdict;
        };

        verdict.baseline_diff = Some(diff(base, resp));

        let preexisting: Vec<String> = verdict
            .evidence()
            .iter()
            .filter(|e| e.kind.is_body_match() && base.body_snippet.contains(&e.matched))
            .map(|e| format!("{:?}", e.matched))
            .collect();

        if !preexisting.is_empty() {
            verdict.add_note(&format!(
                "{} also present in baseline response",
                preexisting.join(", ")
            ));
        }

        verdict
    }
}
