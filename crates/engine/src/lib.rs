//! # Engine Crate
//!
//! The swipe feed's decision core:
//!
//! - [`DecisionRecorder`]: one decision per candidate, fire-and-forget reports
//! - [`ReplenishmentController`]: low-water-mark refills, one in flight at a time
//! - [`FeedEngine`]: the orchestrator a card screen talks to
//!
//! ## Example Usage
//!
//! ```ignore
//! use engine::{EngineConfig, FeedEngine};
//! use feed_client::{HttpFeedClient, LogReporter};
//! use std::sync::Arc;
//!
//! let client = Arc::new(HttpFeedClient::new("http://localhost:8080/api")?);
//! let mut engine = FeedEngine::new(EngineConfig::default(), client, Arc::new(LogReporter));
//! engine.prime();
//! engine.settle_refill().await;
//!
//! engine.accept(now);
//! // ...drive engine.tick(now) every frame until it returns the decision
//! ```

pub mod config;
pub mod engine;
pub mod recorder;
pub mod replenish;

pub use config::{EngineConfig, RefillPolicy};
pub use engine::{outcome_for, FeedEngine, FeedStatus};
pub use recorder::DecisionRecorder;
pub use replenish::{RefillOutcome, ReplenishmentController};
