//! Filter to remove candidates the user has already decided on.
//!
//! This is always the first filter in the pipeline: a decided candidate must
//! never come back onto the stack, even if the service returns it again.

use crate::traits::Filter;
use anyhow::Result;
use feed_model::{CandidateItem, ProfileSnapshot};

/// Removes candidates whose id is in `ProfileSnapshot::decided_ids`.
///
/// ## Algorithm
/// Uses the HashSet in the snapshot for O(1) lookups.
pub struct AlreadyDecidedFilter;

impl Filter for AlreadyDecidedFilter {
    fn name(&self) -> &str {
        "AlreadyDecidedFilter"
    }

    fn apply(
        &self,
        candidates: Vec<CandidateItem>,
        context: &ProfileSnapshot,
    ) -> Result<Vec<CandidateItem>> {
        let filtered: Vec<CandidateItem> = candidates
            .into_iter()
            .filter(|candidate| !context.is_decided(&candidate.id))
            .collect();
        Ok(filtered)
    }
}
