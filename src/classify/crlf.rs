// CRLF / header injection: the run tag showing up in a response header
// proves the payload reached header construction unsanitized.

use crate::classify::ClassificationRule;
use crate::error::ClassificationError;
use crate::http::response::RawResponse;
use crate::probe::request::ProbeRequest;
use crate::validation::verdict::{Assessment, Evidence, EvidenceKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrlfRule {
    tag: String,
}

impl CrlfRule {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl ClassificationRule for CrlfRule {
    fn evaluate(
        &self,
        _probe: &ProbeRequest,
        response: &RawResponse,
    ) -> Result<Assessment, ClassificationError> {
        let mut evidence = Vec::new();

        for (name, value) in response.headers.iter() {
            if !value.contains(&self.tag) {
                continue;
            }
            let kind = if name.eq_ignore_ascii_case("set-cookie") {
                EvidenceKind::CookieReflection
            } else {
                EvidenceKind::HeaderReflection
            };
            evidence.push(Evidence::new(
                kind,
                format!("{}: {}", name.to_ascii_lowercase(), value),
                self.tag.as_str(),
            ));
        }

        if response.body_snippet.contains(&self.tag) {
            evidence.push(Evidence::new(
                EvidenceKind::BodyReflection,
                "tag reflected in response body",
                self.tag.as_str(),
            ));
        }

        Ok(Assessment::confirmed(evidence))
    }
}
