use crate::probe::config::ProbeKindConfig;
use crate::probe::kind::ProbeKind;
use crate::scan::result::{ScanResult, Summary};
use crate::validation::baseline::Baseline;
use crate::validation::verdict::Verdict;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

/// Fan-in point for verdicts arriving in completion order.
pub struct ResultAggregator {
    run_id: String,
    tag: Option<String>,
    target: String,
    probe_kind: ProbeKind,
    started_at: DateTime<Utc>,
    baseline: Baseline,
    verdicts: Vec<Verdict>,
}

impl ResultAggregator {
    pub fn new(
        run_id: String,
        config: &ProbeKindConfig,
        target: &str,
        started_at: DateTime<Utc>,
        baseline: Baseline,
    ) -> Self {
        Self {
            run_id,
            tag: config.tag().map(str::to_string),
            target: target.to_string(),
            probe_kind: config.kind(),
            started_at,
            baseline,
            verdicts: Vec::new(),
        }
    }

    pub fn record(&mut self, verdict: Verdict) {
        self.verdicts.push(verdict);
    }

    /// Drain the channel until every sender is gone
    pub async fn collect(mut self, mut rx: mpsc::Receiver<Verdict>) -> Self {
        while let Some(verdict) = rx.recv().await {
            self.record(verdict);
        }
        self
    }

    pub fn finalize(mut self, cancelled: bool) -> ScanResult {
        rank(&mut self.verdicts);

        let summary = Summary {
            total: self.verdicts.len(),
            positive_count: self.verdicts.iter().filter(|v| v.is_vulnerable()).count(),
        };

        ScanResult {
            run_id: self.run_id,
            tag: self.tag,
            target: self.target,
            probe_kind: self.probe_kind,
            started_at: self.started_at,
            finished_at: Utc::now(),
            baseline: self.baseline,
            verdicts: self.verdicts,
            summary,
            cancelled,
        }
    }
}

/// Vulnerable first, catalog order within each group.
pub fn rank(verdicts: &mut [Verdict]) {
    verdicts.sort_by_key(|v| (!v.is_vulnerable(), v.probe.index));
}
