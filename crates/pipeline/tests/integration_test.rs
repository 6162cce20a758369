//! Integration tests for the pipeline.
//!
//! These tests verify that parsing, filtering and queueing work together
//! the way a refill batch flows through them.

use feed_model::{parse_payload, ActiveFilters, CandidateQueue, ProfileSnapshot};
use pipeline::filters::*;
use pipeline::FilterPipeline;
use serde_json::json;

fn refill_payload() -> serde_json::Value {
    json!({"results": [
        {"id": "j-1", "title": "Decided Already", "match_score": 0.95, "skills": ["rust"]},
        {"id": "j-2", "title": "Low Match", "match_score": 0.2, "skills": ["rust"]},
        {"id": "j-3", "title": "External Rust", "match_score": 0.8, "skills": ["rust"], "is_external": true},
        {"id": "j-4", "title": "Good Rust Role", "match_score": 0.85, "skills": ["Rust", "tokio"]},
        {"id": "j-5", "title": "Good Java Role", "match_score": 0.9, "skills": ["java"]},
        {"id": "j-6", "match_score": 0.99}
    ]})
}

fn profile() -> ProfileSnapshot {
    let mut profile = ProfileSnapshot::new()
        .with_skills(["rust"])
        .with_filters(ActiveFilters {
            min_match_score: Some(0.5),
            include_external: false,
            require_skill_match: true,
        });
    profile.decided_ids.insert("j-1".to_string());
    profile
}

#[test]
fn test_full_pipeline_filters_correctly() {
    let batch = parse_payload(&refill_payload()).unwrap();
    assert_eq!(batch.rejected.len(), 1, "j-6 has no title");

    let kept = FilterPipeline::standard().apply(batch.items, &profile()).unwrap();

    // j-2 scores below the profile's floor but stays: scores never filter
    let ids: Vec<_> = kept.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["j-2", "j-4"]);
}

#[test]
fn test_filter_order_does_not_change_result() {
    let batch = parse_payload(&refill_payload()).unwrap();

    let reversed = FilterPipeline::new()
        .add_filter(SkillOverlapFilter::new(1))
        .add_filter(ExternalPostingFilter)
        .add_filter(AlreadyDecidedFilter);

    let kept = reversed.apply(batch.items, &profile()).unwrap();
    let ids: Vec<_> = kept.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["j-2", "j-4"]);
}

#[test]
fn test_filtered_batch_appends_to_queue() {
    let mut queue = CandidateQueue::new();
    let batch = parse_payload(&refill_payload()).unwrap();

    let kept = FilterPipeline::new()
        .add_filter(AlreadyDecidedFilter)
        .apply(batch.items, &profile())
        .unwrap();
    assert_eq!(queue.append(kept), 4);
    assert!(!queue.contains("j-1"));
    assert_eq!(queue.current().unwrap().id, "j-2");
}
