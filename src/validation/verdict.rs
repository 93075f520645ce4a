use crate::error::{ClassificationError, TransportError};
use crate::http::response::Capture;
use crate::probe::kind::Certainty;
use crate::probe::request::ProbeRequest;
use crate::validation::diff::DiffResult;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    HeaderReflection,
    CookieReflection,
    BodyReflection,
    FileSignature,
    TemplateEvaluation,
    PayloadReflection,
    ExternalRedirect,
}

impl EvidenceKind {
    /// Evidence found by searching the response body
    pub fn is_body_match(&self) -> bool {
        matches!(
            self,
            EvidenceKind::BodyReflection
                | EvidenceKind::FileSignature
                | EvidenceKind::TemplateEvaluation
                | EvidenceKind::PayloadReflection
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evidence {
    pub kind: EvidenceKind,
    pub detail: String,
    /// Literal text that matched
    pub matched: String,
}

impl Evidence {
    pub fn new(kind: EvidenceKind, detail: impl Into<String>, matched: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            matched: matched.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClassificationLabel {
    Safe,
    PossibleVulnerability,
    ConfirmedVulnerability,
    Error,
}

impl From<Certainty> for ClassificationLabel {
    fn from(certainty: Certainty) -> Self {
        match certainty {
            Certainty::Confirmed => ClassificationLabel::ConfirmedVulnerability,
            Certainty::Possible => ClassificationLabel::PossibleVulnerability,
        }
    }
}

impl fmt::Display for ClassificationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClassificationLabel::Safe => "Safe",
            ClassificationLabel::PossibleVulnerability => "Possible Vulnerability",
            ClassificationLabel::ConfirmedVulnerability => "Confirmed Vulnerability",
            ClassificationLabel::Error => "Error",
        };
        f.write_str(s)
    }
}

/// What a rule concluded about one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub evidence: Vec<Evidence>,
    /// Label applied when evidence is present
    pub certainty: Certainty,
    pub note: Option<String>,
}

impl Assessment {
    pub fn confirmed(evidence: Vec<Evidence>) -> Self {
        Self {
            evidence,
            certainty: Certainty::Confirmed,
            note: None,
        }
    }

    pub fn possible(evidence: Vec<Evidence>) -> Self {
        Self {
            evidence,
            certainty: Certainty::Possible,
            note: None,
        }
    }

    pub fn safe(note: impl Into<String>) -> Self {
        Self::confirmed(Vec::new()).with_note(note)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Final outcome for one probe. `vulnerable` and the label are derived from
/// the evidence, so they cannot disagree with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub probe: ProbeRequest,
    #[serde(rename = "response")]
    pub capture: Capture,
    vulnerable: bool,
    evidence: Vec<Evidence>,
    classification_label: ClassificationLabel,
    pub note: Option<String>,
    pub baseline_diff: Option<DiffResult>,
}

impl Verdict {
    pub fn from_assessment(probe: ProbeRequest, capture: Capture, assessment: Assessment) -> Self {
        let vulnerable = !assessment.evidence.is_empty();
        let classification_label = if vulnerable {
            assessment.certainty.into()
        } else {
            ClassificationLabel::Safe
        };

        Self {
            probe,
            capture,
            vulnerable,
            evidence: assessment.evidence,
            classification_label,
            note: assessment.note,
            baseline_diff: None,
        }
    }

    pub fn transport_failure(probe: ProbeRequest, error: TransportError) -> Self {
        Self {
            probe,
            capture: Capture::Failed {
                transport_error: error,
            },
            vulnerable: false,
            evidence: Vec::new(),
            classification_label: ClassificationLabel::Error,
            note: None,
            baseline_diff: None,
        }
    }

    pub fn classification_failure(
        probe: ProbeRequest,
        capture: Capture,
        error: ClassificationError,
    ) -> Self {
        Self {
            probe,
            capture,
            vulnerable: false,
            evidence: Vec::new(),
            classification_label: ClassificationLabel::Error,
            note: Some(error.to_string()),
            baseline_diff: None,
        }
    }

    pub fn is_vulnerable(&self) -> bool {
        self.vulnerable
    }

    pub fn evidence(&self) -> &[Evidence] {
        &self.evidence
    }

    pub fn label(&self) -> ClassificationLabel {
        self.classification_label
    }

    /// Append a note, keeping any the rule already set
    pub fn add_note(&mut self, note: &str) {
        match self.note {
            Some(ref mut existing) => {
                existing.push_str("; ");
                existing.push_str(note);
            }
            None => self.note = Some(note.to_string()),
        }
    }
}
