//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to refill batches.

use anyhow::Result;
use feed_model::{CandidateItem, ProfileSnapshot};

/// Core trait for filtering candidates.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` lets the pipeline live inside the engine that is moved
///   across tasks
/// - Filters take ownership of the Vec and return the kept items in their
///   original order
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a batch of candidates.
    ///
    /// # Arguments
    /// * `candidates` - The candidates to filter (takes ownership)
    /// * `context` - Profile snapshot with active filters and decided ids
    fn apply(
        &self,
        candidates: Vec<CandidateItem>,
        context: &ProfileSnapshot,
    ) -> Result<Vec<CandidateItem>>;
}
