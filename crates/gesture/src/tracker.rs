//! GestureTracker - drag-to-decide state machine
//!
//! Turns a stream of pointer samples into at most one commit per card:
//!
//! ```text
//! Idle ──(past dead zone, horizontal)──▶ Dragging ──release──┬─▶ Committing(dir) ──exit done──▶ Idle  (emits Committed)
//!                                                          └─▶ Cancelling ──spring at rest──▶ Idle  (emits Cancelled)
//! ```
//!
//! ## Algorithm
//! 1. A pointer-down arms a session; nothing moves until the pointer leaves
//!    the dead zone with a horizontal-dominant vector. Vertical-dominant
//!    movement is a scroll and drops the session.
//! 2. While dragging, each sample updates the offset and a smoothed velocity.
//! 3. On release the card commits if the offset reaches the distance
//!    threshold OR the velocity reaches the fling threshold; otherwise it
//!    springs back.
//! 4. A commit only becomes a `TrackerEvent::Committed` after the fly-off
//!    animation completes.
//!
//! ## Design Note
//! Drag release and the accept/reject buttons share one `in_flight` guard. It
//! is set before the exit animation starts and cleared only when that
//! animation completes, so exactly one source can ever commit a given card.

use crate::config::GestureConfig;
use crate::motion::{ExitTransition, SpringBack};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Which way a card leaves the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn sign(self) -> f32 {
        match self {
            SwipeDirection::Left => -1.0,
            SwipeDirection::Right => 1.0,
        }
    }

    /// Direction from the sign of `primary`, falling back to `fallback` when
    /// `primary` is exactly zero, and to Right when both are.
    fn from_signals(primary: f32, fallback: f32) -> Self {
        if primary > 0.0 {
            SwipeDirection::Right
        } else if primary < 0.0 {
            SwipeDirection::Left
        } else if fallback < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        }
    }
}

/// Lifecycle of the top card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Dragging,
    Committing(SwipeDirection),
    Cancelling,
}

/// What started a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerSource {
    Drag,
    Programmatic,
}

/// Immediate classification of a pointer release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Exit animation started; the commit is emitted when it completes
    Commit(SwipeDirection),
    /// Spring-back started; no decision will be emitted
    Cancel,
    /// There was no drag to release
    Ignored,
}

/// Emitted by [`GestureTracker::tick`] when an animation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    Committed {
        direction: SwipeDirection,
        source: TriggerSource,
    },
    Cancelled,
}

/// One pointer reading. `at` is time since an arbitrary fixed origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub at: Duration,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, at: Duration) -> Self {
        Self { x, y, at }
    }
}

/// Transient data for one drag. Dropped when the drag ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSession {
    origin: PointerSample,
    last: PointerSample,
    /// Card offset when the pointer went down (non-zero when a springing card is grabbed)
    pub start_offset: f32,
    pub current_offset: f32,
    /// Smoothed horizontal velocity in px/s
    pub last_velocity: f32,
}

#[derive(Debug, Clone, Copy)]
enum Motion {
    Still,
    Exit {
        transition: ExitTransition,
        direction: SwipeDirection,
        source: TriggerSource,
    },
    Spring(SpringBack),
}

/// Drag-to-decide state machine for the top card.
#[derive(Debug)]
pub struct GestureTracker {
    config: GestureConfig,
    viewport_width: f32,
    state: GestureState,
    session: Option<GestureSession>,
    motion: Motion,
    /// Visual offset of the card, read by the presenter
    offset: f32,
    in_flight: bool,
}

impl GestureTracker {
    /// Create a tracker for a viewport of the given width (px).
    ///
    /// Non-positive or non-finite widths fall back to 1px so thresholds stay
    /// well defined; callers should pass the real width via
    /// [`set_viewport_width`](Self::set_viewport_width) once layout is known.
    pub fn new(config: GestureConfig, viewport_width: f32) -> Self {
        let mut tracker = Self {
            config,
            viewport_width: 1.0,
            state: GestureState::Idle,
            session: None,
            motion: Motion::Still,
            offset: 0.0,
            in_flight: false,
        };
        tracker.set_viewport_width(viewport_width);
        tracker
    }

    pub fn set_viewport_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.viewport_width = width;
        } else {
            warn!("Ignoring invalid viewport width {}", width);
        }
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    /// Current visual offset of the card (px, positive = right).
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// An exit animation owns the card; no other commit may start.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle && self.session.is_none()
    }

    /// Pointer touched the card.
    ///
    /// # Returns
    /// `false` if the press was refused (a commit is animating, or a drag is
    /// already in progress)
    pub fn pointer_down(&mut self, sample: PointerSample) -> bool {
        if self.in_flight {
            debug!("Pointer down ignored: exit animation in flight");
            return false;
        }
        match self.state {
            GestureState::Dragging | GestureState::Committing(_) => return false,
            GestureState::Cancelling => {
                // Catch the card mid-spring and keep dragging from where it is
                self.motion = Motion::Still;
                self.state = GestureState::Idle;
            }
            GestureState::Idle => {}
        }

        self.session = Some(GestureSession {
            origin: sample,
            last: sample,
            start_offset: self.offset,
            current_offset: self.offset,
            last_velocity: 0.0,
        });
        true
    }

    /// Pointer moved.
    ///
    /// # Returns
    /// The new card offset while dragging, `None` otherwise
    pub fn pointer_move(&mut self, sample: PointerSample) -> Option<f32> {
        let session = self.session?;

        match self.state {
            GestureState::Idle => {
                let dx = sample.x - session.origin.x;
                let dy = sample.y - session.origin.y;
                if dx.hypot(dy) <= self.config.dead_zone {
                    return None;
                }
                if dx.abs() <= dy.abs() {
                    debug!("Vertical movement (dx={:.1}, dy={:.1}); treating as scroll", dx, dy);
                    self.abandon_session(sample.at);
                    return None;
                }
                debug!("Drag started (dx={:.1}, dy={:.1})", dx, dy);
                self.state = GestureState::Dragging;
            }
            GestureState::Dragging => {}
            GestureState::Committing(_) | GestureState::Cancelling => return None,
        }

        self.update_drag(sample);
        Some(self.offset)
    }

    /// Pointer lifted.
    pub fn pointer_up(&mut self, sample: PointerSample) -> ReleaseOutcome {
        match self.state {
            GestureState::Dragging => {
                self.update_drag(sample);
                let Some(session) = self.session.take() else {
                    return ReleaseOutcome::Ignored;
                };

                match self.classify(session.current_offset, session.last_velocity) {
                    Some(direction) => {
                        debug!(
                            "Release commits {:?} (offset={:.1}, velocity={:.1})",
                            direction, session.current_offset, session.last_velocity
                        );
                        self.begin_exit(direction, TriggerSource::Drag, sample.at);
                        ReleaseOutcome::Commit(direction)
                    }
                    None => {
                        debug!(
                            "Release cancels (offset={:.1}, velocity={:.1})",
                            session.current_offset, session.last_velocity
                        );
                        self.begin_spring(session.last_velocity, sample.at);
                        ReleaseOutcome::Cancel
                    }
                }
            }
            GestureState::Idle if self.session.is_some() => {
                // Tap, or a press that never left the dead zone
                self.abandon_session(sample.at);
                ReleaseOutcome::Ignored
            }
            _ => ReleaseOutcome::Ignored,
        }
    }

    /// The platform took the pointer away (system gesture, lost focus).
    ///
    /// Follows the cancel path: no decision, card springs home.
    pub fn pointer_cancel(&mut self, at: Duration) -> bool {
        if self.session.is_none() {
            return false;
        }
        let velocity = self.session.map(|s| s.last_velocity).unwrap_or(0.0);
        self.session = None;
        if self.state == GestureState::Dragging || self.offset != 0.0 {
            self.begin_spring(velocity, at);
        } else {
            self.state = GestureState::Idle;
        }
        true
    }

    /// Commit from a button instead of a drag.
    ///
    /// Shares the exit animation and the in-flight guard with drag commits.
    ///
    /// # Returns
    /// `false` if refused because a commit is already animating or a drag
    /// currently owns the card
    pub fn trigger(&mut self, direction: SwipeDirection, at: Duration) -> bool {
        if self.in_flight {
            debug!("Trigger {:?} ignored: exit animation in flight", direction);
            return false;
        }
        if self.state == GestureState::Dragging {
            debug!("Trigger {:?} ignored: drag in progress", direction);
            return false;
        }

        self.session = None;
        self.begin_exit(direction, TriggerSource::Programmatic, at);
        true
    }

    /// Advance whichever animation is running.
    ///
    /// # Returns
    /// An event when an animation finishes on this tick
    pub fn tick(&mut self, at: Duration) -> Option<TrackerEvent> {
        let event = match self.motion {
            Motion::Still => return None,
            Motion::Exit {
                transition,
                direction,
                source,
            } => {
                self.offset = transition.offset_at(at);
                if !transition.is_complete(at) {
                    return None;
                }
                TrackerEvent::Committed { direction, source }
            }
            Motion::Spring(mut spring) => {
                let settled = spring.step(at);
                self.offset = spring.offset();
                if !settled {
                    self.motion = Motion::Spring(spring);
                    return None;
                }
                TrackerEvent::Cancelled
            }
        };

        self.motion = Motion::Still;
        self.state = GestureState::Idle;
        self.offset = 0.0;
        if matches!(event, TrackerEvent::Committed { .. }) {
            self.in_flight = false;
        }
        Some(event)
    }

    /// Decide a release from its offset and velocity.
    ///
    /// Distance and fling thresholds are OR-ed. When the distance threshold
    /// holds the offset's sign picks the direction; a fling alone goes the
    /// way of the velocity.
    pub fn classify(&self, offset: f32, velocity: f32) -> Option<SwipeDirection> {
        let distance_hit = offset.abs() >= self.config.distance_threshold(self.viewport_width);
        let velocity_hit = velocity.abs() >= self.config.velocity_threshold(self.viewport_width);

        if distance_hit {
            Some(SwipeDirection::from_signals(offset, velocity))
        } else if velocity_hit {
            Some(SwipeDirection::from_signals(velocity, offset))
        } else {
            None
        }
    }

    fn update_drag(&mut self, sample: PointerSample) {
        let smoothing = self.config.velocity_smoothing.clamp(0.0, 1.0);
        if let Some(session) = self.session.as_mut() {
            let new_offset = session.start_offset + (sample.x - session.origin.x);
            let dt = sample.at.saturating_sub(session.last.at).as_secs_f32();
            if dt > 0.0 {
                let instant = (new_offset - session.current_offset) / dt;
                session.last_velocity = smoothing * instant + (1.0 - smoothing) * session.last_velocity;
            }
            session.current_offset = new_offset;
            session.last = sample;
            self.offset = new_offset;
        }
    }

    fn abandon_session(&mut self, at: Duration) {
        self.session = None;
        if self.offset != 0.0 {
            self.begin_spring(0.0, at);
        } else {
            self.state = GestureState::Idle;
        }
    }

    fn begin_exit(&mut self, direction: SwipeDirection, source: TriggerSource, at: Duration) {
        // Guard goes up before the animation exists
        self.in_flight = true;
        self.state = GestureState::Committing(direction);

        let target = direction.sign() * self.viewport_width * self.config.exit_travel_fraction;
        self.motion = Motion::Exit {
            transition: ExitTransition::new(self.offset, target, at, self.config.exit_duration),
            direction,
            source,
        };
    }

    fn begin_spring(&mut self, velocity: f32, at: Duration) {
        self.state = GestureState::Cancelling;
        self.motion = Motion::Spring(SpringBack::new(self.offset, velocity, at, self.config.spring));
    }
}
