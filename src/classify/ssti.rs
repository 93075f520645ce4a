use crate::classify::ClassificationRule;
use crate::error::ClassificationError;
use crate::http::response::RawResponse;
use crate::probe::request::{Expectation, ProbeRequest};
use crate::validation::verdict::{Assessment, Evidence, EvidenceKind};

/// Vulnerable when the evaluated literal, not the expression, comes back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SstiRule;

impl ClassificationRule for SstiRule {
    fn evaluate(
        &self,
        probe: &ProbeRequest,
        response: &RawResponse,
    ) -> Result<Assessment, ClassificationError> {
        let Expectation::Evaluates { expected } = &probe.expectation else {
            return Err(ClassificationError::MissingExpectation {
                kind: probe.kind.to_string(),
            });
        };

        let mut evidence = Vec::new();
        if response.body_snippet.contains(expected.as_str()) {
            evidence.push(Evidence::new(
                EvidenceKind::TemplateEvaluation,
                format!("{} evaluated to {}", probe.payload, expected),
                expected.as_str(),
            ));
        }

        Ok(Assessment::confirmed(evidence))
    }
}
