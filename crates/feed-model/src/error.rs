//! Error types for the feed-model crate.
//!
//! Rust error handling concepts demonstrated:
//! - thiserror for defining custom error types
//! - Struct-like variants that carry the context of a failure
//! - `#[from]` for automatic conversion with the `?` operator

use thiserror::Error;

/// Errors that can occur while turning a refill payload into candidates
#[derive(Error, Debug)]
pub enum FeedModelError {
    /// The payload was neither a JSON array nor an object with a `results` array
    #[error("Payload is not a candidate list: found {found}")]
    NotAList { found: String },

    /// One record inside an otherwise valid list failed validation
    ///
    /// The parser drops the record and keeps going; this variant is collected
    /// so the caller can log what was rejected.
    #[error("Invalid candidate record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The payload was not JSON at all
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, FeedModelError>;
