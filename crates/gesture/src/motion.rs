//! Card motion after release: fly-off on commit, spring-back on cancel.
//!
//! Both animations are driven by timestamps handed in from outside, so they
//! step identically under a real frame clock and under a virtual test clock.

use crate::config::SpringConfig;
use std::time::Duration;

/// Integration step for the spring; large frame gaps are split into these.
const SPRING_STEP_SECS: f32 = 1.0 / 240.0;

/// Ease-out cubic: fast start, gentle landing.
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Fixed-duration translation of the card off stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExitTransition {
    from: f32,
    to: f32,
    started_at: Duration,
    duration: Duration,
}

impl ExitTransition {
    pub fn new(from: f32, to: f32, started_at: Duration, duration: Duration) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
        }
    }

    /// Linear progress in `0.0..=1.0`.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    pub fn offset_at(&self, now: Duration) -> f32 {
        self.from + (self.to - self.from) * ease_out_cubic(self.progress(now))
    }

    pub fn is_complete(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }

    pub fn target(&self) -> f32 {
        self.to
    }
}

/// Damped spring pulling the card back to offset zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringBack {
    offset: f32,
    velocity: f32,
    started_at: Duration,
    last_step: Duration,
    config: SpringConfig,
}

impl SpringBack {
    pub fn new(offset: f32, velocity: f32, started_at: Duration, config: SpringConfig) -> Self {
        Self {
            offset,
            velocity,
            started_at,
            last_step: started_at,
            config,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Advance the spring to `now`.
    ///
    /// # Returns
    /// `true` once the card is at rest (or the hard time limit is hit), at
    /// which point the offset is snapped to exactly zero.
    pub fn step(&mut self, now: Duration) -> bool {
        let omega = self.config.stiffness.max(0.0).sqrt();
        let damping = 2.0 * self.config.damping_ratio * omega;

        let mut remaining = now.saturating_sub(self.last_step).as_secs_f32();
        while remaining > 0.0 {
            let dt = remaining.min(SPRING_STEP_SECS);
            let accel = -self.config.stiffness * self.offset - damping * self.velocity;
            self.velocity += accel * dt;
            self.offset += self.velocity * dt;
            remaining -= dt;
        }
        if now > self.last_step {
            self.last_step = now;
        }

        let at_rest = self.offset.abs() <= self.config.rest_offset
            && self.velocity.abs() <= self.config.rest_velocity;
        let timed_out = now.saturating_sub(self.started_at) >= self.config.max_duration;

        if at_rest || timed_out {
            self.offset = 0.0;
            self.velocity = 0.0;
            true
        } else {
            false
        }
    }
}
