//! # Feed Model Crate
//!
//! This crate holds the data side of the swipe feed.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (CandidateItem, Decision, ProfileSnapshot, RefillRequest)
//! - **parser**: Validate refill payloads into CandidateItems
//! - **queue**: The append-only CandidateQueue with its cursor
//! - **error**: Error types for payload parsing
//!
//! ## Example Usage
//!
//! ```ignore
//! use feed_model::{parser, CandidateQueue};
//!
//! let batch = parser::parse_payload(&payload)?;
//! let mut queue = CandidateQueue::new();
//! queue.append(batch.items);
//!
//! if let Some(card) = queue.current() {
//!     println!("Showing {}", card.display.title);
//! }
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod queue;

// Re-export commonly used types for convenience
pub use error::{FeedModelError, Result};
pub use parser::{ParsedBatch, parse_payload, parse_payload_str};
pub use queue::CandidateQueue;
pub use types::{
    // Type aliases
    CandidateId,
    // Candidate types
    CandidateItem,
    CandidateKind,
    CompensationRange,
    DisplayFields,
    // Decision types
    Decision,
    DecisionReport,
    Outcome,
    ScoreContext,
    // Profile / request types
    ActiveFilters,
    ProfileSnapshot,
    RefillRequest,
};
