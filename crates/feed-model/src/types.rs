//! Core domain types for the swipe feed.
//!
//! This module defines the data structures shared by every layer of the feed:
//! - Candidate items shown on the card stack (jobs or applicants)
//! - Decisions committed against them
//! - The profile/filter snapshot the refill request is built from
//!
//! Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (CandidateId)
//! - Serde derives for types that cross the network boundary
//! - Manual `Default` impls where the "zero" value is not the natural default

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// =============================================================================
// Type Aliases
// =============================================================================

/// Stable identifier of a candidate, unique within a feed session.
///
/// Upstream services hand out both numeric and string ids; they are
/// normalised to strings at the parse boundary.
pub type CandidateId = String;

// =============================================================================
// Candidate Types
// =============================================================================

/// Which side of the marketplace a card represents.
///
/// The engine never branches on this; it only changes what the screen renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    /// A job posting shown to a job seeker
    #[default]
    Job,
    /// An applicant profile shown to an employer
    Applicant,
}

/// Salary / rate range advertised on a card.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompensationRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: Option<String>,
}

/// Presentation payload of a candidate.
///
/// Opaque to the engine: only the presenter and the screen read these fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayFields {
    pub title: String,
    pub organization: Option<String>,
    pub compensation: Option<CompensationRange>,
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub description: Option<String>,
}

/// One card in the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub id: CandidateId,
    pub kind: CandidateKind,
    pub display: DisplayFields,
    /// Relevance score from the recommendation service (informational)
    pub match_score: f32,
    /// Promotion weight (informational)
    pub boost_weight: f32,
    /// Posting hosted outside the platform; affects rendering only
    pub is_external: bool,
}

impl CandidateItem {
    /// Create a job candidate with only an id and a title set.
    pub fn new(id: impl Into<CandidateId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: CandidateKind::Job,
            display: DisplayFields {
                title: title.into(),
                ..Default::default()
            },
            match_score: 0.0,
            boost_weight: 0.0,
            is_external: false,
        }
    }

    pub fn with_kind(mut self, kind: CandidateKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_scores(mut self, match_score: f32, boost_weight: f32) -> Self {
        self.match_score = match_score;
        self.boost_weight = boost_weight;
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.display.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn external(mut self) -> Self {
        self.is_external = true;
        self
    }

    /// Score shown on the card: match and boost combined additively.
    pub fn display_score(&self) -> f32 {
        self.match_score + self.boost_weight
    }

    /// Scores forwarded alongside a decision report.
    pub fn score_context(&self) -> ScoreContext {
        ScoreContext {
            match_score: self.match_score,
            boost_weight: self.boost_weight,
        }
    }
}

// =============================================================================
// Decision Types
// =============================================================================

/// The binary outcome of a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Accept,
    Reject,
}

/// A finalized decision. Exactly one exists per candidate that passed the cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub candidate_id: CandidateId,
    pub outcome: Outcome,
    pub committed_at: DateTime<Utc>,
}

/// Scores captured at decision time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreContext {
    pub match_score: f32,
    pub boost_weight: f32,
}

/// Body sent to the decision-persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionReport {
    pub candidate_id: CandidateId,
    pub outcome: Outcome,
    pub score_context: ScoreContext,
    pub committed_at: DateTime<Utc>,
}

impl DecisionReport {
    pub fn new(decision: &Decision, score_context: ScoreContext) -> Self {
        Self {
            candidate_id: decision.candidate_id.clone(),
            outcome: decision.outcome,
            score_context,
            committed_at: decision.committed_at,
        }
    }
}

// =============================================================================
// Profile / Request Types
// =============================================================================

/// Filters the user has switched on in the feed screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveFilters {
    /// Drop candidates whose match score is below this value
    pub min_match_score: Option<f32>,
    /// Whether postings hosted off-platform are shown
    pub include_external: bool,
    /// Require at least one skill shared with the profile
    pub require_skill_match: bool,
}

impl Default for ActiveFilters {
    fn default() -> Self {
        Self {
            min_match_score: None,
            include_external: true,
            require_skill_match: false,
        }
    }
}

/// Snapshot of the user's profile as seen by the feed.
///
/// Owned by the profile collaborator; the engine only reads a copy of it when
/// it builds a refill request or filters a refill batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub skills: Vec<String>,
    pub industries: Vec<String>,
    pub search_terms: Vec<String>,
    pub filters: ActiveFilters,
    /// Candidates already decided on; never shown again
    pub decided_ids: HashSet<CandidateId>,
}

impl ProfileSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_industries<I, S>(mut self, industries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.industries = industries.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filters(mut self, filters: ActiveFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn is_decided(&self, id: &str) -> bool {
        self.decided_ids.contains(id)
    }
}

/// Request body sent to the recommendation collaborator for more candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefillRequest {
    pub skills: Vec<String>,
    pub industries: Vec<String>,
    pub search_terms: Vec<String>,
    pub filters: ActiveFilters,
    /// Sorted so identical snapshots produce identical requests
    pub exclude_ids: Vec<CandidateId>,
    /// Number of candidates the client already holds
    pub offset: usize,
    pub limit: usize,
}

impl RefillRequest {
    pub fn from_snapshot(snapshot: &ProfileSnapshot, offset: usize, limit: usize) -> Self {
        let mut exclude_ids: Vec<CandidateId> = snapshot.decided_ids.iter().cloned().collect();
        exclude_ids.sort_unstable();

        Self {
            skills: snapshot.skills.clone(),
            industries: snapshot.industries.clone(),
            search_terms: snapshot.search_terms.clone(),
            filters: snapshot.filters.clone(),
            exclude_ids,
            offset,
            limit,
        }
    }
}
