use crate::error::ScanError;
use crate::payload::injector::has_injection_point;
use crate::probe::kind::ProbeKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT_SECONDS: f64 = 8.0;

fn default_timeout_seconds() -> f64 {
    DEFAULT_TIMEOUT_SECONDS
}

/// Caller input for one scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub target_url: String,
    pub probe_kind: ProbeKind,
    #[serde(default)]
    pub explicit_confirmation: bool,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: f64,
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub target: String,
    pub kind: ProbeKind,
    pub timeout: Duration,
}

impl ScanRequest {
    pub fn new(target_url: impl Into<String>, probe_kind: ProbeKind) -> Self {
        Self {
            target_url: target_url.into(),
            probe_kind,
            explicit_confirmation: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    pub fn confirmed(mut self, confirmed: bool) -> Self {
        self.explicit_confirmation = confirmed;
        self
    }

    pub fn timeout_seconds(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Reject anything that must not reach the network.
    pub fn validate(&self) -> Result<ValidatedRequest, ScanError> {
        let target = self.target_url.trim();
        if target.is_empty() {
            return Err(ScanError::invalid("target_url is empty"));
        }

        let url = Url::parse(target)
            .map_err(|e| ScanError::invalid(format!("target_url {:?} is not a URL: {}", target, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ScanError::invalid("target_url must start with http:// or https://"));
        }

        if !has_injection_point(&url) {
            return Err(ScanError::invalid(
                "target_url needs a parameter position, e.g. http://example.com/page?param=",
            ));
        }

        if self.probe_kind.requires_confirmation() && !self.explicit_confirmation {
            return Err(ScanError::invalid(
                "explicit confirmation required before sending attack traffic",
            ));
        }

        if !self.timeout_seconds.is_finite() || self.timeout_seconds <= 0.0 {
            return Err(ScanError::invalid(format!(
                "timeout_seconds must be a positive number, got {}",
                self.timeout_seconds
            )));
        }
        let timeout = Duration::try_from_secs_f64(self.timeout_seconds).map_err(|_| {
            ScanError::invalid(format!(
                "timeout_seconds {} is out of range",
                self.timeout_seconds
            ))
        })?;

        Ok(ValidatedRequest {
            target: target.to_string(),
            kind: self.probe_kind,
            timeout,
        })
    }
}
