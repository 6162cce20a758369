//! # Gesture Crate
//!
//! Pointer handling and card motion for the swipe feed.
//!
//! ## Components
//!
//! ### GestureTracker
//! The drag-to-decide state machine:
//! - Dead zone and horizontal-dominance check before a drag starts
//! - Distance OR fling threshold on release
//! - Fly-off animation before a commit is emitted, spring-back on cancel
//! - One in-flight guard shared by drags and accept/reject buttons
//!
//! ### AnimationPresenter
//! Pure offset → rotation / opacity / tint / badge mappings. It never sees
//! the queue or the decision ledger.
//!
//! ## Example Usage
//!
//! ```ignore
//! use gesture::{GestureConfig, GestureTracker, PointerSample, TrackerEvent};
//! use std::time::Duration;
//!
//! let mut tracker = GestureTracker::new(GestureConfig::default(), 390.0);
//! tracker.pointer_down(PointerSample::new(100.0, 300.0, Duration::ZERO));
//! tracker.pointer_move(PointerSample::new(260.0, 305.0, Duration::from_millis(300)));
//! tracker.pointer_up(PointerSample::new(260.0, 305.0, Duration::from_millis(300)));
//!
//! // Drive frames until the exit animation completes
//! if let Some(TrackerEvent::Committed { direction, .. }) = tracker.tick(Duration::from_millis(600)) {
//!     println!("Committed {:?}", direction);
//! }
//! ```

pub mod config;
pub mod motion;
pub mod presenter;
pub mod tracker;

// Re-export commonly used types
pub use config::{GestureConfig, SpringConfig};
pub use presenter::{AnimationPresenter, CardVisual, Palette, Rgb, ROTATION_LIMIT_DEGREES};
pub use tracker::{
    GestureSession, GestureState, GestureTracker, PointerSample, ReleaseOutcome, SwipeDirection,
    TrackerEvent, TriggerSource,
};
