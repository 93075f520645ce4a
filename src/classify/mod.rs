//! Response classification rules.
//!
//! Each probe kind has one rule. Rules are pure: the same probe and response
//! always produce the same verdict.

pub mod crlf;
pub mod lfi;
pub mod redirect;
pub mod ssti;
pub mod xss;

pub use crlf::CrlfRule;
pub use lfi::LfiRule;
pub use redirect::OpenRedirectRule;
pub use ssti::SstiRule;
pub use xss::XssRule;

use crate::error::ClassificationError;
use crate::http::response::{Capture, RawResponse};
use crate::probe::request::ProbeRequest;
use crate::validation::verdict::{Assessment, Verdict};

pub trait ClassificationRule {
    /// Inspect one response.
    fn evaluate(
        &self,
        probe: &ProbeRequest,
        response: &RawResponse,
    ) -> Result<Assessment, ClassificationError>;

    /// Turn a capture into a verdict. Transport and classification failures
    /// stay local to this probe.
    fn classify(&self, probe: &ProbeRequest, capture: &Capture) -> Verdict {
        match capture {
            Capture::Failed { transport_error } => {
                Verdict::transport_failure(probe.clone(), transport_error.clone())
            }
            Capture::Response(response) => match self.evaluate(probe, response) {
                Ok(assessment) => Verdict::from_assessment(probe.clone(), capture.clone(), assessment),
                Err(e) => {
                    tracing::debug!("Classification failed for payload #{}: {}", probe.index, e);
                    Verdict::classification_failure(probe.clone(), capture.clone(), e)
                }
            },
        }
    }
}
