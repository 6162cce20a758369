//! Tuning constants for gesture classification and card motion.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Damped spring used to snap a released card back to neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    /// Restoring force per pixel of displacement
    pub stiffness: f32,
    /// 1.0 is critically damped; below 1.0 the card overshoots slightly
    pub damping_ratio: f32,
    /// Offset (px) under which the card counts as home
    pub rest_offset: f32,
    /// Speed (px/s) under which the card counts as still
    pub rest_velocity: f32,
    /// Hard stop so a mistuned spring can never animate forever
    pub max_duration: Duration,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 400.0,
            damping_ratio: 0.8,
            rest_offset: 0.5,
            rest_velocity: 10.0,
            max_duration: Duration::from_millis(1500),
        }
    }
}

/// Thresholds for turning a drag into a decision.
///
/// Distances and speeds are expressed as fractions of the viewport width so
/// the same feel carries over between phone and tablet layouts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Movement (px) ignored before a drag can start
    pub dead_zone: f32,
    /// Release offset that commits, as a fraction of viewport width
    pub commit_distance_fraction: f32,
    /// Release speed that commits, in viewport widths per second
    pub commit_velocity_fraction: f32,
    /// Weight of the newest sample in the velocity moving average (0..=1)
    pub velocity_smoothing: f32,
    /// Length of the fly-off animation
    pub exit_duration: Duration,
    /// How far the card travels when it flies off, in viewport widths
    pub exit_travel_fraction: f32,
    pub spring: SpringConfig,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            dead_zone: 5.0,
            commit_distance_fraction: 0.25,
            commit_velocity_fraction: 0.8,
            velocity_smoothing: 0.6,
            exit_duration: Duration::from_millis(250),
            exit_travel_fraction: 1.5,
            spring: SpringConfig::default(),
        }
    }
}

impl GestureConfig {
    /// Configure the dead zone (default: 5px)
    pub fn with_dead_zone(mut self, dead_zone: f32) -> Self {
        self.dead_zone = dead_zone;
        self
    }

    /// Configure the commit distance (default: 0.25 of the viewport)
    pub fn with_commit_distance_fraction(mut self, fraction: f32) -> Self {
        self.commit_distance_fraction = fraction;
        self
    }

    /// Configure the fling speed (default: 0.8 viewport widths per second)
    pub fn with_commit_velocity_fraction(mut self, fraction: f32) -> Self {
        self.commit_velocity_fraction = fraction;
        self
    }

    /// Configure the exit animation length (default: 250ms)
    pub fn with_exit_duration(mut self, duration: Duration) -> Self {
        self.exit_duration = duration;
        self
    }

    pub fn with_spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }

    /// Offset (px) that commits for the given viewport width.
    pub fn distance_threshold(&self, viewport_width: f32) -> f32 {
        viewport_width * self.commit_distance_fraction
    }

    /// Speed (px/s) that commits for the given viewport width.
    pub fn velocity_threshold(&self, viewport_width: f32) -> f32 {
        viewport_width * self.commit_velocity_fraction
    }
}
