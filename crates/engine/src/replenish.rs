//! # ReplenishmentController
//!
//! Keeps the queue fed. After every advance the engine calls
//! [`observe`](ReplenishmentController::observe); when the configured
//! [`RefillPolicy`] fires, one fetch is spawned. Its result comes back over a
//! channel and is applied on the engine's own tick, so the queue is only ever
//! mutated from one place.
//!
//! ## Algorithm
//! 1. Trigger check (policy, low-water-mark, nothing in flight)
//! 2. Build a `RefillRequest` from the profile snapshot and spawn the fetch
//! 3. On completion: parse and validate the payload, run the client-side
//!    filters, append whatever survives
//!
//! Failures never propagate. A network or server error becomes
//! [`RefillOutcome::Failed`], a payload that is not a candidate list becomes
//! [`RefillOutcome::Malformed`], and both leave the queue untouched.

use crate::config::{EngineConfig, RefillPolicy};
use feed_client::{CandidateFetcher, ClientResult};
use feed_model::{parse_payload, CandidateItem, CandidateQueue, ProfileSnapshot, RefillRequest};
use pipeline::FilterPipeline;
use serde_json::Value;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, instrument, warn};

/// What a completed refill did to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefillOutcome {
    /// `count` new candidates were appended
    Appended { count: usize },
    /// Nothing new came back (or nothing survived filtering and dedup)
    Empty,
    /// The payload was not a candidate list; treated as empty
    Malformed,
    /// The fetch failed; the queue is unchanged
    Failed,
}

pub struct ReplenishmentController {
    fetcher: Arc<dyn CandidateFetcher>,
    filters: FilterPipeline,
    policy: RefillPolicy,
    low_water_mark: usize,
    batch_size: usize,
    in_flight: bool,
    /// Queue length at the last cumulative trigger
    last_trigger_len: Option<usize>,
    fetches_issued: usize,
    tx: UnboundedSender<ClientResult<Value>>,
    rx: UnboundedReceiver<ClientResult<Value>>,
}

impl ReplenishmentController {
    pub fn new(fetcher: Arc<dyn CandidateFetcher>, config: &EngineConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            fetcher,
            filters: FilterPipeline::standard(),
            policy: config.refill_policy,
            low_water_mark: config.low_water_mark,
            batch_size: config.batch_size,
            in_flight: false,
            last_trigger_len: None,
            fetches_issued: 0,
            tx,
            rx,
        }
    }

    /// Replace the client-side filters applied to every batch.
    pub fn with_filters(mut self, filters: FilterPipeline) -> Self {
        self.filters = filters;
        self
    }

    pub fn policy(&self) -> RefillPolicy {
        self.policy
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Number of fetches started since construction.
    pub fn fetches_issued(&self) -> usize {
        self.fetches_issued
    }

    /// Would the policy fire for this queue right now?
    pub fn should_refill(&self, queue: &CandidateQueue) -> bool {
        if self.in_flight || self.low_water_mark == 0 {
            return false;
        }
        match self.policy {
            RefillPolicy::CumulativeMultiple => {
                let len = queue.len();
                len > 0 && len % self.low_water_mark == 0 && self.last_trigger_len != Some(len)
            }
            RefillPolicy::RemainingAhead => queue.remaining() <= self.low_water_mark,
        }
    }

    /// Check the trigger after an advance and start a fetch if it fires.
    ///
    /// # Returns
    /// `true` if a fetch was started
    pub fn observe(&mut self, queue: &CandidateQueue, snapshot: &ProfileSnapshot) -> bool {
        if !self.should_refill(queue) {
            return false;
        }
        if self.policy == RefillPolicy::CumulativeMultiple {
            self.last_trigger_len = Some(queue.len());
        }
        self.request(queue, snapshot)
    }

    /// Start a fetch regardless of policy.
    ///
    /// A second request while one is pending is dropped, not queued.
    #[instrument(skip_all, fields(offset = queue.len(), limit = self.batch_size))]
    pub fn request(&mut self, queue: &CandidateQueue, snapshot: &ProfileSnapshot) -> bool {
        if self.in_flight {
            debug!("Refill already in flight; ignoring trigger");
            return false;
        }
        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime available; refill skipped");
            return false;
        };

        let request = RefillRequest::from_snapshot(snapshot, queue.len(), self.batch_size);
        self.in_flight = true;
        self.fetches_issued += 1;
        info!(
            "Requesting refill #{} ({} ids excluded)",
            self.fetches_issued,
            request.exclude_ids.len()
        );

        let fetcher = self.fetcher.clone();
        let tx = self.tx.clone();
        runtime.spawn(async move {
            let result = fetcher.fetch_candidates(&request).await;
            // The receiver lives as long as the controller
            let _ = tx.send(result);
        });
        true
    }

    /// Apply a completed fetch, if there is one, without waiting.
    ///
    /// `snapshot` is only called when a completion has arrived.
    pub fn poll<F>(&mut self, queue: &mut CandidateQueue, snapshot: F) -> Option<RefillOutcome>
    where
        F: FnOnce() -> ProfileSnapshot,
    {
        let result = self.rx.try_recv().ok()?;
        Some(self.complete(result, queue, &snapshot()))
    }

    /// Wait for the pending fetch and apply it.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn wait(
        &mut self,
        queue: &mut CandidateQueue,
        snapshot: &ProfileSnapshot,
    ) -> Option<RefillOutcome> {
        if !self.in_flight {
            return None;
        }
        let result = self.rx.recv().await?;
        Some(self.complete(result, queue, snapshot))
    }

    /// Validate, filter and append a payload that did not come from a fetch
    /// (a cached result set, a fixture).
    pub fn ingest(
        &self,
        payload: &Value,
        queue: &mut CandidateQueue,
        snapshot: &ProfileSnapshot,
    ) -> RefillOutcome {
        let batch = match parse_payload(payload) {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Refill payload treated as empty: {}", e);
                return RefillOutcome::Malformed;
            }
        };
        for rejected in &batch.rejected {
            warn!("Dropping candidate record: {}", rejected);
        }
        self.admit(batch.items, queue, snapshot)
    }

    fn complete(
        &mut self,
        result: ClientResult<Value>,
        queue: &mut CandidateQueue,
        snapshot: &ProfileSnapshot,
    ) -> RefillOutcome {
        self.in_flight = false;
        match result {
            Ok(payload) => self.ingest(&payload, queue, snapshot),
            Err(e) if e.is_malformed() => {
                warn!("Refill response treated as empty: {}", e);
                RefillOutcome::Malformed
            }
            Err(e) => {
                error!("Refill failed: {}", e);
                RefillOutcome::Failed
            }
        }
    }

    fn admit(
        &self,
        items: Vec<CandidateItem>,
        queue: &mut CandidateQueue,
        snapshot: &ProfileSnapshot,
    ) -> RefillOutcome {
        if items.is_empty() {
            info!("Refill returned no candidates");
            return RefillOutcome::Empty;
        }

        let received = items.len();
        let kept = match self.filters.apply(items, snapshot) {
            Ok(kept) => kept,
            Err(e) => {
                error!("Filtering refill batch failed: {:#}", e);
                return RefillOutcome::Failed;
            }
        };

        let count = queue.append(kept);
        info!("Refill appended {} of {} candidates", count, received);
        if count == 0 {
            RefillOutcome::Empty
        } else {
            RefillOutcome::Appended { count }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use feed_client::ClientError;
    use serde_json::json;
    use std::sync::Mutex;

    struct Canned(Mutex<Option<ClientResult<Value>>>);

    impl Canned {
        fn new(result: ClientResult<Value>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(Some(result))))
        }
    }

    #[async_trait]
    impl CandidateFetcher for Canned {
        async fn fetch_candidates(&self, _request: &RefillRequest) -> ClientResult<Value> {
            self.0.lock().unwrap().take().unwrap_or_else(|| Ok(json!([])))
        }
    }

    fn queue_of(n: usize) -> CandidateQueue {
        CandidateQueue::from_items(
            (0..n).map(|i| CandidateItem::new(format!("q-{}", i), "Queued")).collect(),
        )
    }

    fn controller(policy: RefillPolicy, fetcher: Arc<dyn CandidateFetcher>) -> ReplenishmentController {
        let config = EngineConfig::default().with_refill_policy(policy);
        ReplenishmentController::new(fetcher, &config)
    }

    #[test]
    fn test_cumulative_trigger_only_on_multiples() {
        let controller = controller(RefillPolicy::CumulativeMultiple, Canned::new(Ok(json!([]))));

        assert!(!controller.should_refill(&queue_of(0)));
        assert!(!controller.should_refill(&queue_of(4)));
        assert!(controller.should_refill(&queue_of(5)));
        assert!(!controller.should_refill(&queue_of(8)));
        assert!(controller.should_refill(&queue_of(10)));
    }

    #[test]
    fn test_remaining_ahead_trigger_follows_cursor() {
        let controller = controller(RefillPolicy::RemainingAhead, Canned::new(Ok(json!([]))));

        let mut queue = queue_of(8);
        assert!(!controller.should_refill(&queue));
        queue.advance();
        queue.advance();
        assert!(!controller.should_refill(&queue));
        queue.advance();
        assert!(controller.should_refill(&queue));
    }

    #[test]
    fn test_zero_mark_disables_refills() {
        let config = EngineConfig::default().with_low_water_mark(0);
        let controller = ReplenishmentController::new(Canned::new(Ok(json!([]))), &config);
        assert!(!controller.should_refill(&queue_of(0)));
        assert!(!controller.should_refill(&queue_of(5)));
    }

    #[tokio::test]
    async fn test_refill_appends_validated_filtered_batch() {
        let payload = json!([
            {"id": "new-1", "title": "Fresh"},
            {"id": "q-0", "title": "Already queued"},
            {"id": "decided", "title": "Seen it"},
            {"id": "broken"}
        ]);
        let mut controller = controller(RefillPolicy::CumulativeMultiple, Canned::new(Ok(payload)));
        let mut queue = queue_of(5);
        let mut snapshot = ProfileSnapshot::new();
        snapshot.decided_ids.insert("decided".to_string());

        assert!(controller.observe(&queue, &snapshot));
        assert!(controller.is_in_flight());

        let outcome = controller.wait(&mut queue, &snapshot).await;
        assert_eq!(outcome, Some(RefillOutcome::Appended { count: 1 }));
        assert_eq!(queue.len(), 6);
        assert!(!controller.is_in_flight());
    }

    #[tokio::test]
    async fn test_single_fetch_in_flight() {
        let mut controller = controller(RefillPolicy::CumulativeMultiple, Canned::new(Ok(json!([]))));
        let queue = queue_of(5);
        let snapshot = ProfileSnapshot::new();

        assert!(controller.observe(&queue, &snapshot));
        assert!(!controller.observe(&queue, &snapshot));
        assert!(!controller.request(&queue, &snapshot));
        assert_eq!(controller.fetches_issued(), 1);
    }

    #[tokio::test]
    async fn test_fetch_errors_leave_queue_untouched() {
        let snapshot = ProfileSnapshot::new();

        let mut failing = controller(
            RefillPolicy::CumulativeMultiple,
            Canned::new(Err(ClientError::Status { status: 503, body: String::new() })),
        );
        let mut queue = queue_of(5);
        failing.request(&queue, &snapshot);
        assert_eq!(failing.wait(&mut queue, &snapshot).await, Some(RefillOutcome::Failed));
        assert_eq!(queue.len(), 5);

        let mut garbled = controller(
            RefillPolicy::CumulativeMultiple,
            Canned::new(Err(ClientError::InvalidResponse("not json".to_string()))),
        );
        garbled.request(&queue, &snapshot);
        assert_eq!(garbled.wait(&mut queue, &snapshot).await, Some(RefillOutcome::Malformed));

        let mut non_list = controller(RefillPolicy::CumulativeMultiple, Canned::new(Ok(json!({"error": "x"}))));
        non_list.request(&queue, &snapshot);
        assert_eq!(non_list.wait(&mut queue, &snapshot).await, Some(RefillOutcome::Malformed));
        assert_eq!(queue.len(), 5);
    }

    #[tokio::test]
    async fn test_wait_without_fetch_returns_none() {
        let mut controller = controller(RefillPolicy::CumulativeMultiple, Canned::new(Ok(json!([]))));
        let mut queue = queue_of(1);
        assert_eq!(controller.wait(&mut queue, &ProfileSnapshot::new()).await, None);
        assert_eq!(controller.poll(&mut queue, ProfileSnapshot::new), None);
    }

    #[tokio::test]
    async fn test_poll_builds_snapshot_only_on_completion() {
        let mut controller = controller(
            RefillPolicy::CumulativeMultiple,
            Canned::new(Ok(json!([{"id": "n-1", "title": "New"}]))),
        );
        let mut queue = queue_of(1);
        let mut built = 0;

        assert_eq!(
            controller.poll(&mut queue, || {
                built += 1;
                ProfileSnapshot::new()
            }),
            None
        );
        assert_eq!(built, 0);

        assert!(controller.request(&queue, &ProfileSnapshot::new()));
        let mut outcome = None;
        for _ in 0..100 {
            tokio::task::yield_now().await;
            outcome = controller.poll(&mut queue, || {
                built += 1;
                ProfileSnapshot::new()
            });
            if outcome.is_some() {
                break;
            }
        }

        assert_eq!(outcome, Some(RefillOutcome::Appended { count: 1 }));
        assert_eq!(built, 1);
    }

    #[test]
    fn test_request_without_runtime_is_skipped() {
        let mut controller = controller(RefillPolicy::CumulativeMultiple, Canned::new(Ok(json!([]))));
        assert!(!controller.request(&queue_of(5), &ProfileSnapshot::new()));
        assert!(!controller.is_in_flight());
    }
}
