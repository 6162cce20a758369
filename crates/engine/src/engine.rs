//! # Feed Engine
//!
//! Wires the queue, the gesture tracker, the decision ledger and the refill
//! controller together and exposes what a card screen needs: `current`,
//! `next`, a visual for the top card, pointer and button input, and a
//! settled-decision callback.
//!
//! ## Commit Ordering
//! 1. The tracker finishes the exit animation and emits `Committed`
//! 2. The decision is recorded locally
//! 3. The queue advances
//! 4. The report is spawned (not awaited)
//! 5. Settled-decision callbacks run
//! 6. The refill trigger is checked against the new queue state
//!
//! ## Design Note
//! All engine state is owned by one `FeedEngine` and mutated through
//! `&mut self`, so pointer input, animation ticks and refill completions
//! are serialized by construction. Async work (fetches and reports) runs on
//! spawned tasks and only touches the engine again through
//! [`tick`](FeedEngine::tick) / [`poll_refill`](FeedEngine::poll_refill).

use crate::config::EngineConfig;
use crate::recorder::DecisionRecorder;
use crate::replenish::{RefillOutcome, ReplenishmentController};
use feed_client::{CandidateFetcher, DecisionReporter};
use feed_model::{CandidateItem, CandidateQueue, Decision, Outcome, ProfileSnapshot};
use gesture::{
    AnimationPresenter, CardVisual, GestureTracker, PointerSample, ReleaseOutcome, SwipeDirection,
    TrackerEvent, TriggerSource,
};
use pipeline::FilterPipeline;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What the screen should render when there is no card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// A current card is available
    Ready,
    /// No current card, but a refill is in flight
    Loading,
    /// No current card and nothing pending: show the empty state
    Exhausted,
}

/// Right is accept, left is reject.
pub fn outcome_for(direction: SwipeDirection) -> Outcome {
    match direction {
        SwipeDirection::Right => Outcome::Accept,
        SwipeDirection::Left => Outcome::Reject,
    }
}

type SettledCallback = Box<dyn FnMut(&Decision) + Send>;

pub struct FeedEngine {
    config: EngineConfig,
    queue: CandidateQueue,
    tracker: GestureTracker,
    presenter: AnimationPresenter,
    recorder: DecisionRecorder,
    replenisher: ReplenishmentController,
    profile: ProfileSnapshot,
    on_settled: Vec<SettledCallback>,
}

impl FeedEngine {
    /// Create an engine with an empty queue.
    ///
    /// # Arguments
    /// * `config` - Engine and gesture tuning
    /// * `fetcher` - Recommendation collaborator used for refills
    /// * `reporter` - Persistence collaborator for decisions
    pub fn new(
        config: EngineConfig,
        fetcher: Arc<dyn CandidateFetcher>,
        reporter: Arc<dyn DecisionReporter>,
    ) -> Self {
        info!(
            "Feed engine: viewport {}px, low-water-mark {}, batch {}, policy {}",
            config.viewport_width, config.low_water_mark, config.batch_size, config.refill_policy
        );
        Self {
            queue: CandidateQueue::new(),
            tracker: GestureTracker::new(config.gesture, config.viewport_width),
            presenter: AnimationPresenter::default(),
            recorder: DecisionRecorder::new(reporter),
            replenisher: ReplenishmentController::new(fetcher, &config),
            profile: ProfileSnapshot::new(),
            on_settled: Vec::new(),
            config,
        }
    }

    pub fn with_profile(mut self, profile: ProfileSnapshot) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_presenter(mut self, presenter: AnimationPresenter) -> Self {
        self.presenter = presenter;
        self
    }

    /// Replace the client-side filters applied to refill batches.
    pub fn with_filters(mut self, filters: FilterPipeline) -> Self {
        self.replenisher = self.replenisher.with_filters(filters);
        self
    }

    /// Update the profile used for subsequent refill requests.
    pub fn set_profile(&mut self, profile: ProfileSnapshot) {
        self.profile = profile;
    }

    pub fn profile(&self) -> &ProfileSnapshot {
        &self.profile
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        self.tracker.set_viewport_width(width);
        self.config.viewport_width = self.tracker.viewport_width();
    }

    /// Register a callback run once per settled decision, after the queue
    /// has advanced.
    pub fn on_decision_settled(&mut self, callback: impl FnMut(&Decision) + Send + 'static) {
        self.on_settled.push(Box::new(callback));
    }

    //=====================================================================
    // Feeding the queue
    //=====================================================================

    /// Load a cached result set through the same validation and filters as
    /// a refill.
    pub fn seed(&mut self, payload: &Value) -> RefillOutcome {
        let snapshot = self.effective_snapshot();
        self.replenisher.ingest(payload, &mut self.queue, &snapshot)
    }

    /// Issue the initial fetch when the queue is still empty.
    pub fn prime(&mut self) -> bool {
        if !self.queue.is_empty() {
            return false;
        }
        self.request_refill()
    }

    /// Fetch more candidates now (pull-to-refresh). Ignored while a refill
    /// is already in flight.
    pub fn request_refill(&mut self) -> bool {
        let snapshot = self.effective_snapshot();
        self.replenisher.request(&self.queue, &snapshot)
    }

    /// Apply a completed refill, if any, without waiting.
    pub fn poll_refill(&mut self) -> Option<RefillOutcome> {
        let (profile, recorder) = (&self.profile, &self.recorder);
        self.replenisher
            .poll(&mut self.queue, || effective_snapshot(profile, recorder))
    }

    /// Wait for the in-flight refill, if any, and apply it.
    pub async fn settle_refill(&mut self) -> Option<RefillOutcome> {
        let snapshot = self.effective_snapshot();
        self.replenisher.wait(&mut self.queue, &snapshot).await
    }

    /// Wait for every outstanding decision report.
    pub async fn flush_reports(&mut self) {
        self.recorder.flush().await;
    }

    //=====================================================================
    // Read side
    //=====================================================================

    pub fn current(&self) -> Option<&CandidateItem> {
        self.queue.current()
    }

    pub fn next(&self) -> Option<&CandidateItem> {
        self.queue.peek_next()
    }

    pub fn status(&self) -> FeedStatus {
        if self.queue.current().is_some() {
            FeedStatus::Ready
        } else if self.replenisher.is_in_flight() {
            FeedStatus::Loading
        } else {
            FeedStatus::Exhausted
        }
    }

    /// How the top card should be drawn right now.
    pub fn visual(&self) -> CardVisual {
        self.presenter.visual(self.tracker.offset(), self.tracker.viewport_width())
    }

    pub fn queue(&self) -> &CandidateQueue {
        &self.queue
    }

    pub fn tracker(&self) -> &GestureTracker {
        &self.tracker
    }

    pub fn presenter(&self) -> &AnimationPresenter {
        &self.presenter
    }

    pub fn recorder(&self) -> &DecisionRecorder {
        &self.recorder
    }

    pub fn replenisher(&self) -> &ReplenishmentController {
        &self.replenisher
    }

    pub fn decisions(&self) -> &[Decision] {
        self.recorder.decisions()
    }

    //=====================================================================
    // Input
    //=====================================================================

    /// Pointer touched the top card. Refused when there is no card.
    pub fn pointer_down(&mut self, sample: PointerSample) -> bool {
        if self.queue.current().is_none() {
            debug!("Pointer down ignored: no current candidate");
            return false;
        }
        self.tracker.pointer_down(sample)
    }

    pub fn pointer_move(&mut self, sample: PointerSample) -> Option<f32> {
        self.tracker.pointer_move(sample)
    }

    pub fn pointer_up(&mut self, sample: PointerSample) -> ReleaseOutcome {
        self.tracker.pointer_up(sample)
    }

    pub fn pointer_cancel(&mut self, at: Duration) -> bool {
        self.tracker.pointer_cancel(at)
    }

    /// Accept button. Uses the same exit path and guard as a drag.
    pub fn accept(&mut self, at: Duration) -> bool {
        self.trigger(SwipeDirection::Right, at)
    }

    /// Reject button.
    pub fn reject(&mut self, at: Duration) -> bool {
        self.trigger(SwipeDirection::Left, at)
    }

    fn trigger(&mut self, direction: SwipeDirection, at: Duration) -> bool {
        if self.queue.current().is_none() {
            debug!("Trigger {:?} ignored: no current candidate", direction);
            return false;
        }
        self.tracker.trigger(direction, at)
    }

    /// Advance animations and apply any completed refill.
    ///
    /// # Returns
    /// The decision settled on this tick, if an exit animation finished
    pub fn tick(&mut self, at: Duration) -> Option<Decision> {
        self.poll_refill();

        match self.tracker.tick(at)? {
            TrackerEvent::Committed { direction, source } => self.finalize(direction, source),
            TrackerEvent::Cancelled => {
                debug!("Card returned to rest without a decision");
                None
            }
        }
    }

    fn finalize(&mut self, direction: SwipeDirection, source: TriggerSource) -> Option<Decision> {
        let Some(item) = self.queue.current().cloned() else {
            warn!("Commit {:?} finished with no current candidate", direction);
            return None;
        };

        let outcome = outcome_for(direction);
        let recorded = self.recorder.record(&item.id, outcome);

        // The card has left the screen either way
        self.queue.advance();

        if let Some(decision) = &recorded {
            info!("{:?} {} via {:?}", outcome, item.id, source);
            self.recorder.report(decision, item.score_context());
            for callback in self.on_settled.iter_mut() {
                callback(decision);
            }
        }

        let snapshot = self.effective_snapshot();
        self.replenisher.observe(&self.queue, &snapshot);
        recorded
    }

    fn effective_snapshot(&self) -> ProfileSnapshot {
        effective_snapshot(&self.profile, &self.recorder)
    }
}

/// The caller's profile plus everything decided in this session.
fn effective_snapshot(profile: &ProfileSnapshot, recorder: &DecisionRecorder) -> ProfileSnapshot {
    let mut snapshot = profile.clone();
    snapshot.decided_ids.extend(recorder.decided_ids().cloned());
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_client::LogReporter;
    use feed_client::JsonFileSource;
    use serde_json::json;

    fn engine() -> FeedEngine {
        FeedEngine::new(
            EngineConfig::default(),
            Arc::new(JsonFileSource::from_records(Vec::new())),
            Arc::new(LogReporter),
        )
    }

    #[test]
    fn test_outcome_mapping() {
        assert_eq!(outcome_for(SwipeDirection::Right), Outcome::Accept);
        assert_eq!(outcome_for(SwipeDirection::Left), Outcome::Reject);
    }

    #[test]
    fn test_empty_engine_is_exhausted_and_refuses_input() {
        let mut engine = engine();
        assert_eq!(engine.status(), FeedStatus::Exhausted);
        assert!(engine.current().is_none());
        assert!(!engine.pointer_down(PointerSample::new(0.0, 0.0, Duration::ZERO)));
        assert!(!engine.accept(Duration::ZERO));
    }

    #[test]
    fn test_seed_validates_and_dedups() {
        let mut engine = engine();
        let outcome = engine.seed(&json!([
            {"id": "a", "title": "A"},
            {"id": "a", "title": "A again"},
            {"id": "b"},
            {"id": 3, "title": "C"}
        ]));

        assert_eq!(outcome, RefillOutcome::Appended { count: 2 });
        assert_eq!(engine.current().map(|c| c.id.as_str()), Some("a"));
        assert_eq!(engine.next().map(|c| c.id.as_str()), Some("3"));
        assert_eq!(engine.status(), FeedStatus::Ready);
    }

    #[test]
    fn test_visual_at_rest_is_neutral() {
        let mut engine = engine();
        engine.seed(&json!([{"id": "a", "title": "A"}]));
        let visual = engine.visual();
        assert_eq!(visual.offset, 0.0);
        assert_eq!(visual.rotation_degrees, 0.0);
    }
}
