//! Drives a `FeedEngine` on a virtual clock.
//!
//! Each step synthesizes pointer samples (or presses a button), then ticks at
//! 60fps until the card is at rest and lets any pending refill land before
//! the next step.

use engine::{FeedEngine, RefillOutcome};
use feed_model::Decision;
use gesture::{PointerSample, ReleaseOutcome};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);
/// Upper bound on how long one step may animate.
const SETTLE_LIMIT: Duration = Duration::from_secs(3);
const PRESS_X: f32 = 195.0;
const PRESS_Y: f32 = 400.0;

fn default_drag_ms() -> u64 {
    400
}

/// One scripted interaction. Scripts are JSON arrays of these, e.g.
/// `[{"drag": {"dx": 150}}, "accept", {"scroll": {"dy": 200}}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Horizontal drag by `dx` px over `duration_ms`
    Drag {
        dx: f32,
        #[serde(default = "default_drag_ms")]
        duration_ms: u64,
    },
    /// Short, fast horizontal flick
    Fling { dx: f32 },
    /// Mostly vertical movement; never a swipe
    Scroll { dy: f32 },
    /// Press and release without moving
    Tap,
    Accept,
    Reject,
    /// Pull-to-refresh
    Refresh,
    /// Let time pass
    Wait { ms: u64 },
}

/// What a step did.
#[derive(Debug, Default)]
pub struct StepReport {
    /// `None` when the press was refused or the step had no pointer
    pub release: Option<ReleaseOutcome>,
    /// For button steps: whether the trigger was accepted
    pub triggered: Option<bool>,
    pub decision: Option<Decision>,
    pub refill: Option<RefillOutcome>,
}

pub struct Session {
    engine: FeedEngine,
    now: Duration,
}

impl Session {
    pub fn new(engine: FeedEngine) -> Self {
        Self {
            engine,
            now: Duration::ZERO,
        }
    }

    pub fn engine(&self) -> &FeedEngine {
        &self.engine
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Prime an empty feed and wait for the first batch.
    pub async fn start(&mut self) -> Option<RefillOutcome> {
        if self.engine.prime() {
            self.engine.settle_refill().await
        } else {
            None
        }
    }

    pub async fn run(&mut self, step: &Step) -> StepReport {
        let mut report = StepReport::default();

        match *step {
            Step::Drag { dx, duration_ms } => {
                report.release = self.gesture(dx, 0.0, duration_ms);
            }
            Step::Fling { dx } => {
                report.release = self.gesture(dx, 0.0, 60);
            }
            Step::Scroll { dy } => {
                report.release = self.gesture(dy.signum() * 4.0, dy, 300);
            }
            Step::Tap => {
                if self.engine.pointer_down(self.sample(PRESS_X, PRESS_Y)) {
                    report.release = Some(self.engine.pointer_up(self.sample(PRESS_X, PRESS_Y)));
                }
            }
            Step::Accept => report.triggered = Some(self.engine.accept(self.now)),
            Step::Reject => report.triggered = Some(self.engine.reject(self.now)),
            Step::Refresh => {
                self.engine.request_refill();
            }
            Step::Wait { ms } => {
                self.advance(Duration::from_millis(ms));
            }
        }

        report.decision = self.settle_motion();
        report.refill = self.engine.settle_refill().await;
        report
    }

    /// Finish outstanding reports before the process exits.
    pub async fn finish(&mut self) {
        self.engine.flush_reports().await;
    }

    fn sample(&self, x: f32, y: f32) -> PointerSample {
        PointerSample::new(x, y, self.now)
    }

    /// Press, move by (`dx`, `dy`) in ten samples over `duration_ms`, release.
    fn gesture(&mut self, dx: f32, dy: f32, duration_ms: u64) -> Option<ReleaseOutcome> {
        if !self.engine.pointer_down(self.sample(PRESS_X, PRESS_Y)) {
            return None;
        }

        let interval = Duration::from_millis((duration_ms / 10).max(1));
        let mut last = self.sample(PRESS_X, PRESS_Y);
        for i in 1..=10 {
            self.now += interval;
            let f = i as f32 / 10.0;
            last = self.sample(PRESS_X + dx * f, PRESS_Y + dy * f);
            self.engine.pointer_move(last);
        }
        Some(self.engine.pointer_up(last))
    }

    /// Tick until the card is at rest, returning the decision if one settled.
    fn settle_motion(&mut self) -> Option<Decision> {
        let deadline = self.now + SETTLE_LIMIT;
        let mut settled = None;
        while self.now < deadline {
            self.now += FRAME;
            if let Some(decision) = self.engine.tick(self.now) {
                settled = Some(decision);
            }
            if self.engine.tracker().is_idle() && !self.engine.tracker().is_in_flight() {
                break;
            }
        }
        settled
    }

    fn advance(&mut self, by: Duration) {
        let until = self.now + by;
        while self.now < until {
            self.now += FRAME;
            self.engine.tick(self.now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{EngineConfig, FeedStatus};
    use feed_client::{JsonFileSource, LogReporter};
    use feed_model::Outcome;
    use serde_json::json;
    use std::sync::Arc;

    fn session(count: usize) -> Session {
        let records = (1..=count)
            .map(|i| json!({"id": format!("job-{}", i), "title": format!("Role {}", i)}))
            .collect();
        let engine = FeedEngine::new(
            EngineConfig::default(),
            Arc::new(JsonFileSource::from_records(records)),
            Arc::new(LogReporter),
        );
        Session::new(engine)
    }

    #[test]
    fn test_script_format() {
        let steps: Vec<Step> = serde_json::from_value(json!([
            {"drag": {"dx": 150}},
            {"drag": {"dx": -40, "duration_ms": 900}},
            {"fling": {"dx": 50}},
            "accept",
            {"wait": {"ms": 100}}
        ]))
        .unwrap();

        assert_eq!(steps[0], Step::Drag { dx: 150.0, duration_ms: 400 });
        assert_eq!(steps[1], Step::Drag { dx: -40.0, duration_ms: 900 });
        assert_eq!(steps[3], Step::Accept);
        assert_eq!(steps[4], Step::Wait { ms: 100 });
    }

    #[tokio::test]
    async fn test_scripted_session() {
        let mut session = session(3);
        assert_eq!(session.start().await, Some(RefillOutcome::Appended { count: 3 }));

        let report = session.run(&Step::Drag { dx: 150.0, duration_ms: 400 }).await;
        assert!(matches!(report.release, Some(ReleaseOutcome::Commit(_))));
        assert_eq!(report.decision.map(|d| d.outcome), Some(Outcome::Accept));

        let report = session.run(&Step::Scroll { dy: 200.0 }).await;
        assert!(report.decision.is_none());

        let report = session.run(&Step::Tap).await;
        assert_eq!(report.release, Some(ReleaseOutcome::Ignored));
        assert!(report.decision.is_none());

        let report = session.run(&Step::Fling { dx: -60.0 }).await;
        assert_eq!(report.decision.map(|d| d.outcome), Some(Outcome::Reject));

        let report = session.run(&Step::Accept).await;
        assert_eq!(report.triggered, Some(true));
        assert!(report.decision.is_some());

        assert_eq!(session.engine().status(), FeedStatus::Exhausted);
        let report = session.run(&Step::Reject).await;
        assert_eq!(report.triggered, Some(false));

        session.finish().await;
    }
}
