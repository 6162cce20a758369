//! Service contracts the feed engine consumes.
//!
//! The engine talks to two collaborators and knows them only through these
//! traits, so tests and offline runs can swap the network out entirely.

use async_trait::async_trait;
use feed_model::{DecisionReport, RefillRequest};
use serde_json::Value;
use thiserror::Error;

//=========================================================================================
// Error and Result Types
//=========================================================================================

/// Errors that can occur when talking to the feed collaborators
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to reach feed service: {0}")]
    Connection(String),

    #[error("Feed service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from feed service: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// The service answered, but with a body that is not usable JSON.
    ///
    /// The engine treats these as an empty result instead of a failure.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ClientError::InvalidResponse(_))
    }
}

/// A convenience type alias for `Result<T, ClientError>`.
pub type ClientResult<T> = Result<T, ClientError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The recommendation collaborator.
#[async_trait]
pub trait CandidateFetcher: Send + Sync {
    /// Fetch more candidates for a refill.
    ///
    /// Returns the raw JSON payload; shape validation happens in the engine
    /// so that every adapter gets the same parse-and-validate treatment.
    async fn fetch_candidates(&self, request: &RefillRequest) -> ClientResult<Value>;
}

/// The decision-persistence collaborator.
#[async_trait]
pub trait DecisionReporter: Send + Sync {
    /// Persist one accept/reject outcome.
    async fn report_decision(&self, report: &DecisionReport) -> ClientResult<()>;
}
