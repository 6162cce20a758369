//! Filter to keep only candidates sharing skills with the profile.
//!
//! Only active when the user switched on "require skill match" and the
//! profile actually lists skills; otherwise every candidate passes.

use crate::traits::Filter;
use anyhow::Result;
use feed_model::{CandidateItem, ProfileSnapshot};
use std::collections::HashSet;

/// Keeps candidates with at least `min_shared` skills in common with the profile.
///
/// ## Algorithm
/// 1. Lower-case the profile skills into a HashSet
/// 2. Count each candidate's (lower-cased, trimmed) skills found in that set
/// 3. Keep candidates reaching `min_shared`
pub struct SkillOverlapFilter {
    min_shared: usize,
}

impl SkillOverlapFilter {
    /// Create a new SkillOverlapFilter.
    ///
    /// # Arguments
    /// * `min_shared` - How many skills must overlap (typically 1)
    pub fn new(min_shared: usize) -> Self {
        Self { min_shared }
    }
}

impl Filter for SkillOverlapFilter {
    fn name(&self) -> &str {
        "SkillOverlapFilter"
    }

    fn apply(
        &self,
        candidates: Vec<CandidateItem>,
        context: &ProfileSnapshot,
    ) -> Result<Vec<CandidateItem>> {
        if !context.filters.require_skill_match || context.skills.is_empty() {
            return Ok(candidates);
        }

        let profile_skills: HashSet<String> = context
            .skills
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect();

        let filtered: Vec<CandidateItem> = candidates
            .into_iter()
            .filter(|candidate| {
                let shared = candidate
                    .display
                    .skills
                    .iter()
                    .filter(|skill| profile_skills.contains(&skill.trim().to_lowercase()))
                    .count();
                shared >= self.min_shared
            })
            .collect();
        Ok(filtered)
    }
}
