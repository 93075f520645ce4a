use crate::http::response::RawResponse;
use serde::Serialize;

/// How a probe response differs from the baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    pub status_changed: bool,
    pub body_len_delta: isize,
    pub body_changed: bool,
}

pub fn diff(baseline: &RawResponse, resp: &RawResponse) -> DiffResult {
    DiffResult {
        status_changed: baseline.status_code != resp.status_code,
        body_len_delta: resp.body_len as isize - baseline.body_len as isize,
        body_changed: baseline.body_hash != resp.body_hash,
    }
}
