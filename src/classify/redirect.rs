use crate::classify::ClassificationRule;
use crate::error::ClassificationError;
use crate::http::response::RawResponse;
use crate::probe::request::ProbeRequest;
use crate::validation::verdict::{Assessment, Evidence, EvidenceKind};
use url::Url;

/// Flags 3xx responses whose `Location` resolves to a different host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenRedirectRule;

impl ClassificationRule for OpenRedirectRule {
    fn evaluate(
        &self,
        probe: &ProbeRequest,
        response: &RawResponse,
    ) -> Result<Assessment, ClassificationError> {
        let location = match response.location_header.as_deref() {
            Some(loc) if response.is_redirect() && !loc.is_empty() => loc,
            _ => return Ok(Assessment::safe("no redirect")),
        };

        let base = Url::parse(&probe.url).map_err(|e| ClassificationError::InvalidRequestUrl {
            url: probe.url.clone(),
            reason: e.to_string(),
        })?;
        let resolved =
            base.join(location)
                .map_err(|e| ClassificationError::UnresolvableLocation {
                    location: location.to_string(),
                    base: probe.url.clone(),
                    reason: e.to_string(),
                })?;

        match (base.host_str(), resolved.host_str()) {
            (Some(origin), Some(dest)) if !origin.eq_ignore_ascii_case(dest) => {
                Ok(Assessment::possible(vec![Evidence::new(
                    EvidenceKind::ExternalRedirect,
                    format!("{} redirects to external host {}", response.status_code, resolved),
                    dest,
                )])
                .with_note("external redirect"))
            }
            _ => Ok(Assessment::safe("internal redirect")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::fixtures::probe;
    use crate::http::response::{response_fixture, Capture};
    use crate::probe::kind::ProbeKind;
    use crate::probe::request::Expectation;
    use crate::validation::verdict::ClassificationLabel;

    fn classify(status: u16, location: &str) -> crate::validation::verdict::Verdict {
        let p = probe(ProbeKind::OpenRedirect, "http://a.test/go?x=1", "", Expectation::None);
        let resp = response_fixture(status, &[("Location", location)], "");
        OpenRedirectRule.classify(&p, &Capture::Response(resp))
    }

    #[test]
    fn external_location_is_possible_vulnerability() {
        let verdict = classify(302, "https://evil.test/");
        assert!(verdict.is_vulnerable());
        assert_eq!(verdict.label(), ClassificationLabel::PossibleVulnerability);
        assert_eq!(verdict.evidence()[0].matched, "evil.test");
    }

    #[test]
    fn relative_location_is_internal() {
        let verdict = classify(302, "/local");
        assert!(!verdict.is_vulnerable());
        assert_eq!(verdict.label(), ClassificationLabel::Safe);
        assert_eq!(verdict.note.as_deref(), Some("internal redirect"));
    }

    #[test]
    fn host_comparison_ignores_case() {
        let verdict = classify(301, "http://A.TEST/elsewhere");
        assert!(!verdict.is_vulnerable());
    }

    #[test]
    fn protocol_relative_location_is_external() {
        let verdict = classify(307, "//google.com/%2f..");
        assert!(verdict.is_vulnerable());
    }

    #[test]
    fn non_redirect_status_is_safe() {
        let verdict = classify(200, "https://evil.test/");
        assert!(!verdict.is_vulnerable());
        assert_eq!(verdict.note.as_deref(), Some("no redirect"));
    }

    #[test]
    fn unresolvable_location_is_not_a_finding() {
        let verdict = classify(302, "http://[::1");
        assert!(!verdict.is_vulnerable());
        assert_eq!(verdict.label(), ClassificationLabel::Error);
    }

    #[test]
    fn classification_is_idempotent() {
        assert_eq!(classify(302, "https://evil.test/"), classify(302, "https://evil.test/"));
    }
}
