use crate::error::TransportError;
use reqwest::header::HeaderMap;
use reqwest::Method;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub follow_redirects: bool,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            follow_redirects: false,
            timeout: None,
        }
    }

    /// Create a GET request
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Parse `raw` and build a GET; a bad URL is a transport failure for
    /// that probe, not a scan failure.
    pub fn parse_get(raw: &str) -> Result<Self, TransportError> {
        let url = Url::parse(raw).map_err(|e| TransportError::invalid_url(raw, e))?;
        Ok(Self::get(url))
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
