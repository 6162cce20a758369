//! The FilterPipeline orchestrates multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::filters::{AlreadyDecidedFilter, ExternalPostingFilter, SkillOverlapFilter};
use crate::traits::Filter;
use anyhow::Result;
use feed_model::{CandidateItem, ProfileSnapshot};

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(AlreadyDecidedFilter)
///     .add_filter(ExternalPostingFilter);
///
/// let kept = pipeline.apply(candidates, &snapshot)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The pipeline every refill batch goes through.
    pub fn standard() -> Self {
        Self::new()
            .add_filter(AlreadyDecidedFilter)
            .add_filter(ExternalPostingFilter)
            .add_filter(SkillOverlapFilter::new(1))
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Apply all filters in sequence to the candidates.
    ///
    /// # Returns
    /// * `Ok(Vec<CandidateItem>)` - The candidates left after all filters
    /// * `Err` - If any filter fails
    pub fn apply(
        &self,
        candidates: Vec<CandidateItem>,
        context: &ProfileSnapshot,
    ) -> Result<Vec<CandidateItem>> {
        let mut current = candidates;
        for filter in &self.filters {
            let before = current.len();
            current = filter.apply(current, context)?;
            tracing::debug!(
                "Filter {} kept {} of {} candidates",
                filter.name(),
                current.len(),
                before
            );
        }
        Ok(current)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
