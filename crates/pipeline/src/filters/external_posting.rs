//! Filter honouring the "hide external postings" switch.

use crate::traits::Filter;
use anyhow::Result;
use feed_model::{CandidateItem, ProfileSnapshot};

/// Drops off-platform postings when `filters.include_external` is off.
pub struct ExternalPostingFilter;

impl Filter for ExternalPostingFilter {
    fn name(&self) -> &str {
        "ExternalPostingFilter"
    }

    fn apply(
        &self,
        candidates: Vec<CandidateItem>,
        context: &ProfileSnapshot,
    ) -> Result<Vec<CandidateItem>> {
        if context.filters.include_external {
            return Ok(candidates);
        }
        Ok(candidates.into_iter().filter(|c| !c.is_external).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feed_model::ActiveFilters;

    #[test]
    fn test_external_postings_hidden_when_switched_off() {
        let candidates = vec![
            CandidateItem::new("in", "Internal"),
            CandidateItem::new("out", "External").external(),
        ];
        let context = ProfileSnapshot::new().with_filters(ActiveFilters {
            include_external: false,
            ..ActiveFilters::default()
        });

        let filtered = ExternalPostingFilter.apply(candidates.clone(), &context).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "in");

        let all = ExternalPostingFilter.apply(candidates, &ProfileSnapshot::new()).unwrap();
        assert_eq!(all.len(), 2);
    }
}
