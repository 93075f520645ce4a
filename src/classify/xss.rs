// Reflected XSS by unescaped substring match.
//
// Reflection here only shows that output encoding failed at this sink; it
// cannot tell a script-executable context from a comment or an escaped
// attribute. Telling them apart needs DOM-aware comparison.

use crate::classify::ClassificationRule;
use crate::error::ClassificationError;
use crate::http::response::RawResponse;
use crate::probe::kind::Certainty;
use crate::probe::request::{Expectation, ProbeRequest};
use crate::validation::verdict::{Assessment, Evidence, EvidenceKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct XssRule;

impl ClassificationRule for XssRule {
    fn evaluate(
        &self,
        probe: &ProbeRequest,
        response: &RawResponse,
    ) -> Result<Assessment, ClassificationError> {
        let Expectation::Reflects {
            certainty,
            technique,
        } = &probe.expectation
        else {
            return Err(ClassificationError::MissingExpectation {
                kind: probe.kind.to_string(),
            });
        };

        let needle = probe.payload.to_lowercase();
        let body = response.body_snippet.to_lowercase();

        let mut evidence = Vec::new();
        if body.contains(&needle) {
            evidence.push(Evidence::new(
                EvidenceKind::PayloadReflection,
                format!("payload reflected unescaped ({})", technique),
                needle,
            ));
        }

        let assessment = match certainty {
            Certainty::Confirmed => Assessment::confirmed(evidence),
            Certainty::Possible => Assessment::possible(evidence),
        };
        Ok(assessment)
    }
}
