use crate::classify::ClassificationRule;
use crate::error::ClassificationError;
use crate::http::response::RawResponse;
use crate::payload::catalog::LFI_SIGNATURES;
use crate::probe::request::ProbeRequest;
use crate::validation::verdict::{Assessment, Evidence, EvidenceKind};

/// Content marker known to appear in a sensitive file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSignature {
    pub file: String,
    pub marker: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LfiRule {
    signatures: Vec<FileSignature>,
}

impl Default for LfiRule {
    fn default() -> Self {
        Self::new(
            LFI_SIGNATURES
                .iter()
                .map(|(file, marker)| FileSignature {
                    file: file.to_string(),
                    marker: marker.to_string(),
                })
                .collect(),
        )
    }
}

impl LfiRule {
    pub fn new(signatures: Vec<FileSignature>) -> Self {
        Self { signatures }
    }
}

impl ClassificationRule for LfiRule {
    /// Every matching signature is kept.
    fn evaluate(
        &self,
        _probe: &ProbeRequest,
        response: &RawResponse,
    ) -> Result<Assessment, ClassificationError> {
        let evidence = self
            .signatures
            .iter()
            .filter(|sig| response.body_snippet.contains(&sig.marker))
            .map(|sig| {
                Evidence::new(
                    EvidenceKind::FileSignature,
                    format!("{} signature {:?} matched", sig.file, sig.marker),
                    sig.marker.as_str(),
                )
            })
            .collect();

        Ok(Assessment::confirmed(evidence))
    }
}
