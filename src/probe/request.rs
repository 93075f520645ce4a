use crate::payload::catalog::Payload;
use crate::payload::injector::append_payload;
use crate::probe::kind::{Certainty, ProbeKind};
use serde::Serialize;

/// Per-payload detection parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    None,
    /// Template expression and the literal it evaluates to
    Evaluates { expected: String },
    /// Reflected markup and how much an unescaped echo proves
    Reflects { certainty: Certainty, technique: String },
}

/// One (payload, target) pairing. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeRequest {
    /// Position in the payload catalog
    pub index: usize,
    pub kind: ProbeKind,
    pub target_url: String,
    /// Payload exactly as appended to the target
    pub payload: String,
    /// Human-readable form (percent-decoded where the wire form is encoded)
    pub display_payload: String,
    pub url: String,
    pub expectation: Expectation,
}

impl ProbeRequest {
    pub fn new(index: usize, kind: ProbeKind, target_url: &str, payload: Payload) -> Self {
        Self {
            index,
            kind,
            target_url: target_url.to_string(),
            url: append_payload(target_url, &payload.value),
            payload: payload.value,
            display_payload: payload.display,
            expectation: payload.expectation,
        }
    }
}
