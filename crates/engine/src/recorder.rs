//! # DecisionRecorder
//!
//! The decision ledger. Records at most one outcome per candidate and hands
//! each new decision to the persistence collaborator without waiting for it.
//!
//! ## Design Note
//! `record` is synchronous and local so the caller can advance the queue
//! immediately. `report` spawns the network call and keeps the `JoinHandle`
//! only so shutdown and tests can drain outstanding reports with `flush`.

use chrono::Utc;
use feed_client::DecisionReporter;
use feed_model::{CandidateId, Decision, DecisionReport, Outcome, ScoreContext};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

pub struct DecisionRecorder {
    reporter: Arc<dyn DecisionReporter>,
    decisions: Vec<Decision>,
    recorded: HashSet<CandidateId>,
    pending: Vec<JoinHandle<()>>,
}

impl DecisionRecorder {
    pub fn new(reporter: Arc<dyn DecisionReporter>) -> Self {
        Self {
            reporter,
            decisions: Vec::new(),
            recorded: HashSet::new(),
            pending: Vec::new(),
        }
    }

    /// Record an outcome for `candidate_id`.
    ///
    /// # Returns
    /// The new decision, or `None` if this candidate was already decided.
    /// A repeat is a benign race and is only logged.
    pub fn record(&mut self, candidate_id: &str, outcome: Outcome) -> Option<Decision> {
        if self.recorded.contains(candidate_id) {
            warn!("Ignoring repeated {:?} for already decided candidate {}", outcome, candidate_id);
            return None;
        }

        let decision = Decision {
            candidate_id: candidate_id.to_string(),
            outcome,
            committed_at: Utc::now(),
        };
        self.recorded.insert(decision.candidate_id.clone());
        self.decisions.push(decision.clone());
        debug!("Recorded {:?} for {}", outcome, candidate_id);
        Some(decision)
    }

    /// Send a decision to the reporter in the background.
    ///
    /// Failures are logged and never retried.
    pub fn report(&mut self, decision: &Decision, score_context: ScoreContext) {
        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime available; decision for {} not reported", decision.candidate_id);
            return;
        };

        self.pending.retain(|handle| !handle.is_finished());

        let report = DecisionReport::new(decision, score_context);
        let reporter = self.reporter.clone();
        self.pending.push(runtime.spawn(async move {
            if let Err(e) = reporter.report_decision(&report).await {
                error!("Failed to report decision for {}: {}", report.candidate_id, e);
            }
        }));
    }

    pub fn is_recorded(&self, candidate_id: &str) -> bool {
        self.recorded.contains(candidate_id)
    }

    /// All decisions in the order they were recorded.
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn decided_ids(&self) -> impl Iterator<Item = &CandidateId> {
        self.decisions.iter().map(|d| &d.candidate_id)
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    /// Reports spawned but not yet finished.
    pub fn pending_reports(&self) -> usize {
        self.pending.iter().filter(|handle| !handle.is_finished()).count()
    }

    /// Wait for every outstanding report to finish.
    pub async fn flush(&mut self) {
        for handle in self.pending.drain(..) {
            if let Err(e) = handle.await {
                error!("Decision report task failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use feed_client::{ClientError, ClientResult};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collecting {
        reports: Mutex<Vec<DecisionReport>>,
    }

    #[async_trait]
    impl DecisionReporter for Collecting {
        async fn report_decision(&self, report: &DecisionReport) -> ClientResult<()> {
            self.reports.lock().unwrap().push(report.clone());
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl DecisionReporter for Failing {
        async fn report_decision(&self, _report: &DecisionReport) -> ClientResult<()> {
            Err(ClientError::Connection("offline".to_string()))
        }
    }

    #[test]
    fn test_record_is_idempotent_per_candidate() {
        let mut recorder = DecisionRecorder::new(Arc::new(Collecting::default()));

        let first = recorder.record("a", Outcome::Accept).unwrap();
        assert_eq!(first.outcome, Outcome::Accept);
        assert!(recorder.record("a", Outcome::Reject).is_none());
        assert!(recorder.record("a", Outcome::Accept).is_none());

        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.decisions()[0].outcome, Outcome::Accept);
        assert!(recorder.is_recorded("a"));
        assert!(!recorder.is_recorded("b"));
    }

    #[test]
    fn test_report_without_runtime_is_skipped() {
        let mut recorder = DecisionRecorder::new(Arc::new(Collecting::default()));
        let decision = recorder.record("a", Outcome::Reject).unwrap();

        recorder.report(&decision, ScoreContext::default());
        assert_eq!(recorder.pending_reports(), 0);
    }

    #[tokio::test]
    async fn test_report_carries_score_context() {
        let reporter = Arc::new(Collecting::default());
        let mut recorder = DecisionRecorder::new(reporter.clone());

        let decision = recorder.record("a", Outcome::Accept).unwrap();
        recorder.report(&decision, ScoreContext { match_score: 0.7, boost_weight: 0.2 });
        recorder.flush().await;

        let reports = reporter.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].candidate_id, "a");
        assert_eq!(reports[0].score_context.match_score, 0.7);
        assert_eq!(reports[0].committed_at, decision.committed_at);
    }

    #[tokio::test]
    async fn test_failed_report_keeps_decision() {
        let mut recorder = DecisionRecorder::new(Arc::new(Failing));

        let decision = recorder.record("a", Outcome::Accept).unwrap();
        recorder.report(&decision, ScoreContext::default());
        recorder.flush().await;

        assert!(recorder.is_recorded("a"));
        assert_eq!(recorder.pending_reports(), 0);
    }
}
