use crate::classify::{
    ClassificationRule, CrlfRule, LfiRule, OpenRedirectRule, SstiRule, XssRule,
};
use crate::error::ClassificationError;
use crate::http::response::RawResponse;
use crate::payload::catalog::{self, Payload};
use crate::payload::tag::{generate_tag, CRLF_TAG_PREFIX};
use crate::probe::kind::ProbeKind;
use crate::probe::request::ProbeRequest;
use crate::validation::verdict::Assessment;

/// Payloads and detection rule for one probe kind. Built once per scan and
/// shared read-only by every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeKindConfig {
    Crlf(CrlfRule),
    Lfi(LfiRule),
    Ssti(SstiRule),
    Xss(XssRule),
    OpenRedirect(OpenRedirectRule),
}

impl ProbeKindConfig {
    /// Build a config, generating a fresh tag for kinds that need one.
    pub fn for_kind(kind: ProbeKind) -> Self {
        match kind {
            ProbeKind::Crlf => Self::Crlf(CrlfRule::new(generate_tag(CRLF_TAG_PREFIX))),
            ProbeKind::Lfi => Self::Lfi(LfiRule::default()),
            ProbeKind::Ssti => Self::Ssti(SstiRule),
            ProbeKind::Xss => Self::Xss(XssRule),
            ProbeKind::OpenRedirect => Self::OpenRedirect(OpenRedirectRule),
        }
    }

    pub fn kind(&self) -> ProbeKind {
        match self {
            Self::Crlf(_) => ProbeKind::Crlf,
            Self::Lfi(_) => ProbeKind::Lfi,
            Self::Ssti(_) => ProbeKind::Ssti,
            Self::Xss(_) => ProbeKind::Xss,
            Self::OpenRedirect(_) => ProbeKind::OpenRedirect,
        }
    }

    /// The run tag, for kinds that embed one
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Crlf(rule) => Some(rule.tag()),
            _ => None,
        }
    }

    pub fn payloads(&self) -> Vec<Payload> {
        match self {
            Self::Crlf(rule) => catalog::crlf_payloads(rule.tag()),
            Self::Lfi(_) => catalog::lfi_payloads(),
            Self::Ssti(_) => catalog::ssti_payloads(),
            Self::Xss(_) => catalog::xss_payloads(),
            Self::OpenRedirect(_) => catalog::open_redirect_payloads(),
        }
    }

    /// One request per payload, in catalog order
    pub fn probes(&self, target_url: &str) -> Vec<ProbeRequest> {
        let kind = self.kind();
        self.payloads()
            .into_iter()
            .enumerate()
            .map(|(index, payload)| ProbeRequest::new(index, kind, target_url, payload))
            .collect()
    }
}

impl ClassificationRule for ProbeKindConfig {
    fn evaluate(
        &self,
        probe: &ProbeRequest,
        response: &RawResponse,
    ) -> Result<Assessment, ClassificationError> {
        match self {
            Self::Crlf(rule) => rule.evaluate(probe, response),
            Self::Lfi(rule) => rule.evaluate(probe, response),
            Self::Ssti(rule) => rule.evaluate(probe, response),
            Self::Xss(rule) => rule.evaluate(probe, response),
            Self::OpenRedirect(rule) => rule.evaluate(probe, response),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips() {
        for kind in ProbeKind::ALL {
            assert_eq!(ProbeKindConfig::for_kind(kind).kind(), kind);
        }
    }

    #[test]
    fn tag_is_constant_across_a_run() {
        let config = ProbeKindConfig::for_kind(ProbeKind::Crlf);
        let tag = config.tag().unwrap().to_string();
        let probes = config.probes("http://a.test/?p=");
        assert_eq!(probes.len(), 8);
        assert!(probes.iter().all(|p| p.url.contains(&tag)));
        assert_eq!(config.tag(), Some(tag.as_str()));
    }

    #[test]
    fn probes_follow_catalog_order() {
        let probes = ProbeKindConfig::for_kind(ProbeKind::Lfi).probes("http://a.test/?f=");
        let indices: Vec<_> = probes.iter().map(|p| p.index).collect();
        assert_eq!(indices, (0..8).collect::<Vec<_>>());
        assert_eq!(probes[0].url, "http://a.test/?f=../../etc/passwd");
    }

    #[test]
    fn only_crlf_carries_a_tag() {
        assert!(ProbeKindConfig::for_kind(ProbeKind::Xss).tag().is_none());
        assert!(ProbeKindConfig::for_kind(ProbeKind::Crlf).tag().is_some());
    }
}
