//! # Feed Client
//!
//! The two collaborators the feed engine depends on, expressed as async
//! traits, plus the adapters that implement them:
//!
//! - [`HttpFeedClient`]: talks to the feed service over HTTP (reqwest)
//! - [`JsonFileSource`]: serves candidates from a local JSON file
//! - [`LogReporter`]: logs decisions instead of persisting them
//!
//! Fetchers hand back the raw JSON payload. Shape validation happens in
//! `feed_model::parse_payload`, so every adapter is validated the same way.

pub mod http;
pub mod local;
pub mod ports;

pub use http::HttpFeedClient;
pub use local::{JsonFileSource, LogReporter};
pub use ports::{CandidateFetcher, ClientError, ClientResult, DecisionReporter};
