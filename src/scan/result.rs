use crate::probe::kind::ProbeKind;
use crate::validation::baseline::Baseline;
use crate::validation::verdict::Verdict;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub positive_count: usize,
}

/// Finalized outcome of one scan; verdicts are already ranked.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub run_id: String,
    pub tag: Option<String>,
    pub target: String,
    pub probe_kind: ProbeKind,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub baseline: Baseline,
    pub verdicts: Vec<Verdict>,
    pub summary: Summary,
    /// Set when the scan was aborted and `verdicts` is partial
    pub cancelled: bool,
}

impl ScanResult {
    pub fn positives(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| v.is_vulnerable())
    }
}
