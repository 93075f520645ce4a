//! HTTP client with scoped TLS policy, pacing, and bounded body capture

use crate::core::rate_limit::RateLimiter;
use crate::error::{TransportError, TransportErrorKind};
use crate::http::request::HttpRequest;
use crate::http::response::{Headers, RawResponse};
use anyhow::Result;
use reqwest::{header, redirect::Policy, Client};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_MAX_BODY_BYTES: usize = 2000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
const MAX_REDIRECT_HOPS: usize = 10;

/// Certificate validation for the client being built. Only the client
/// constructed with `AcceptInvalid` skips validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsPolicy {
    #[default]
    Verify,
    /// Accept self-signed and otherwise invalid certificates
    AcceptInvalid,
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout: Duration,
    pub tls: TlsPolicy,
    pub user_agent: String,
    pub headers: HashMap<String, String>,
    pub cookies: Option<String>,
    pub max_body_bytes: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            tls: TlsPolicy::Verify,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: HashMap::new(),
            cookies: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

pub struct HttpClient {
    direct: Client,
    following: Client,
    limiter: RateLimiter,
    default_headers: HashMap<String, String>,
    cookies: Option<String>,
    timeout: Duration,
    max_body_bytes: usize,
}

impl HttpClient {
    pub fn new(options: ClientOptions, limiter: RateLimiter) -> Result<Self> {
        if options.tls == TlsPolicy::AcceptInvalid {
            tracing::warn!("TLS certificate validation disabled for probe traffic");
        }

        let build = |policy: Policy| {
            Client::builder()
                .danger_accept_invalid_certs(options.tls == TlsPolicy::AcceptInvalid)
                .redirect(policy)
                .timeout(options.timeout)
                .connect_timeout(options.timeout)
                .user_agent(options.user_agent.clone())
                .build()
        };

        Ok(Self {
            direct: build(Policy::none())?,
            following: build(Policy::limited(MAX_REDIRECT_HOPS))?,
            limiter,
            default_headers: options.headers,
            cookies: options.cookies,
            timeout: options.timeout,
            max_body_bytes: options.max_body_bytes,
        })
    }

    pub async fn execute(&self, req: HttpRequest) -> Result<RawResponse, TransportError> {
        self.limiter.wait().await;
        self.fetch(req).await
    }

    /// Execute with a wall-clock bound on top of reqwest's own timeout, so a
    /// host trickling bytes cannot hold a worker past the deadline. The
    /// deadline starts once the rate limiter has released the request.
    pub async fn execute_bounded(&self, req: HttpRequest) -> Result<RawResponse, TransportError> {
        self.limiter.wait().await;

        let deadline = req.timeout.unwrap_or(self.timeout);
        match tokio::time::timeout(deadline, self.fetch(req)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::new(
                TransportErrorKind::Timeout,
                format!("no complete response within {} ms", deadline.as_millis()),
            )),
        }
    }

    async fn fetch(&self, req: HttpRequest) -> Result<RawResponse, TransportError> {
        let start = Instant::now();
        let client = if req.follow_redirects {
            &self.following
        } else {
            &self.direct
        };

        let mut request = client
            .request(req.method, req.url.clone())
            .headers(req.headers);

        if let Some(timeout) = req.timeout {
            request = request.timeout(timeout);
        }

        for (key, value) in &self.default_headers {
            if let Ok(header_name) = header::HeaderName::from_bytes(key.as_bytes()) {
                if let Ok(header_value) = header::HeaderValue::from_str(value) {
                    request = request.header(header_name, header_value);
                }
            }
        }

        if let Some(ref cookies) = self.cookies {
            request = request.header(header::COOKIE, cookies);
        }

        let mut response = request
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let status_code = response.status().as_u16();
        let headers = Headers::from_reqwest(response.headers());
        let location_header = headers.get("location").map(str::to_string);

        // ---- BOUNDED BODY READ ----
        let mut body: Vec<u8> = Vec::new();
        let mut body_truncated = false;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?
        {
            let remaining = self.max_body_bytes - body.len();
            if chunk.len() > remaining {
                body.extend_from_slice(&chunk[..remaining]);
                body_truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }

        let body_hash = format!("{:x}", Sha256::digest(&body));

        Ok(RawResponse {
            status_code,
            headers,
            body_snippet: String::from_utf8_lossy(&body).into_owned(),
            body_truncated,
            body_len: body.len(),
            body_hash,
            location_header,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}
