//! Error taxonomy for the probing engine.
//!
//! Only [`ScanError`] ever reaches the caller. Transport and classification
//! failures are scoped to a single probe and end up inside its verdict.

use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Errors that abort a scan before any probe is dispatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ScanError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ScanError::InvalidInput(msg.into())
    }
}

/// Why an outbound request produced no response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    Timeout,
    ConnectionRefused,
    Connect,
    Dns,
    Tls,
    InvalidUrl,
    Redirect,
    Body,
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::ConnectionRefused => "connection refused",
            TransportErrorKind::Connect => "connection failed",
            TransportErrorKind::Dns => "dns failure",
            TransportErrorKind::Tls => "tls failure",
            TransportErrorKind::InvalidUrl => "invalid url",
            TransportErrorKind::Redirect => "redirect failure",
            TransportErrorKind::Body => "body read failure",
            TransportErrorKind::Other => "request failed",
        };
        f.write_str(s)
    }
}

/// A classified transport failure for one request.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_url(url: &str, reason: impl fmt::Display) -> Self {
        Self::new(TransportErrorKind::InvalidUrl, format!("{url}: {reason}"))
    }

    /// Map a reqwest failure onto the transport taxonomy.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if err.is_builder() {
            TransportErrorKind::InvalidUrl
        } else if err.is_redirect() {
            TransportErrorKind::Redirect
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else if err.is_connect() {
            classify_connect(err)
        } else {
            TransportErrorKind::Other
        };

        Self::new(kind, error_chain(err))
    }
}

fn classify_connect(err: &reqwest::Error) -> TransportErrorKind {
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return TransportErrorKind::ConnectionRefused;
            }
        }
        source = cause.source();
    }

    let text = error_chain(err).to_lowercase();
    if text.contains("dns") || text.contains("lookup") || text.contains("resolve") {
        TransportErrorKind::Dns
    } else if text.contains("certificate") || text.contains("tls") || text.contains("handshake") {
        TransportErrorKind::Tls
    } else if text.contains("refused") {
        TransportErrorKind::ConnectionRefused
    } else {
        TransportErrorKind::Connect
    }
}

/// Flatten an error and its sources into one line.
fn error_chain(err: &dyn StdError) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

/// A response arrived but the rule could not evaluate it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("location {location:?} could not be resolved against {base}: {reason}")]
    UnresolvableLocation {
        location: String,
        base: String,
        reason: String,
    },

    #[error("request url {url:?} is not parseable: {reason}")]
    InvalidRequestUrl { url: String, reason: String },

    #[error("probe carries no expectation usable by the {kind} rule")]
    MissingExpectation { kind: String },
}
