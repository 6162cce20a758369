//! Engine tuning knobs.

use gesture::GestureConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// When the replenishment controller asks for more candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefillPolicy {
    /// Fire when the total number of items ever appended is a non-zero
    /// multiple of the low-water-mark, at most once per queue length.
    ///
    /// A refill that returns fewer items than the mark leaves the length off
    /// the multiple, and no further refill fires until one is requested
    /// explicitly.
    #[default]
    CumulativeMultiple,
    /// Fire whenever the items at or ahead of the cursor drop to the
    /// low-water-mark or below.
    RemainingAhead,
}

impl fmt::Display for RefillPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefillPolicy::CumulativeMultiple => write!(f, "cumulative"),
            RefillPolicy::RemainingAhead => write!(f, "remaining"),
        }
    }
}

impl FromStr for RefillPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cumulative" | "cumulative_multiple" => Ok(RefillPolicy::CumulativeMultiple),
            "remaining" | "remaining_ahead" => Ok(RefillPolicy::RemainingAhead),
            other => Err(format!("unknown refill policy '{}'", other)),
        }
    }
}

/// Configuration for [`FeedEngine`](crate::FeedEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Logical width of the card viewport in px
    pub viewport_width: f32,
    /// Queue length (or remaining count, per policy) that triggers a refill.
    /// Zero disables automatic refills.
    pub low_water_mark: usize,
    /// `limit` sent with each refill request
    pub batch_size: usize,
    pub refill_policy: RefillPolicy,
    pub gesture: GestureConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            viewport_width: 390.0,
            low_water_mark: 5,
            batch_size: 5,
            refill_policy: RefillPolicy::default(),
            gesture: GestureConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_viewport_width(mut self, width: f32) -> Self {
        self.viewport_width = width;
        self
    }

    pub fn with_low_water_mark(mut self, mark: usize) -> Self {
        self.low_water_mark = mark;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_refill_policy(mut self, policy: RefillPolicy) -> Self {
        self.refill_policy = policy;
        self
    }

    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }
}
