//! Parse-and-validate for refill payloads.
//!
//! The recommendation service answers with loosely shaped JSON. Nothing from
//! that payload reaches the queue until it has been checked here:
//! - the payload must be a list (a bare array, or an object with `results`)
//! - every record must carry a non-empty id and title
//! - scores must be finite numbers
//!
//! Bad records are dropped one by one and reported back in
//! [`ParsedBatch::rejected`], so one broken card never costs the whole batch.

use crate::error::{FeedModelError, Result};
use crate::types::*;
use serde::Deserialize;
use serde_json::Value;

/// Outcome of parsing one payload.
#[derive(Debug, Default)]
pub struct ParsedBatch {
    /// Records that passed validation, in payload order
    pub items: Vec<CandidateItem>,
    /// Why each dropped record was dropped
    pub rejected: Vec<FeedModelError>,
}

impl ParsedBatch {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Ids arrive as strings from some backends and as integers from others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

/// Wire shape of a candidate record before validation.
#[derive(Debug, Deserialize)]
struct RawCandidate {
    id: Option<RawId>,
    title: Option<String>,
    #[serde(default)]
    kind: Option<CandidateKind>,
    organization: Option<String>,
    compensation: Option<CompensationRange>,
    location: Option<String>,
    skills: Option<Vec<String>>,
    description: Option<String>,
    #[serde(alias = "matchScore")]
    match_score: Option<f64>,
    #[serde(alias = "boostWeight")]
    boost_weight: Option<f64>,
    #[serde(alias = "isExternal")]
    is_external: Option<bool>,
}

impl TryFrom<RawCandidate> for CandidateItem {
    type Error = FeedModelError;

    fn try_from(raw: RawCandidate) -> Result<Self> {
        let id = match raw.id {
            Some(RawId::Text(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Some(RawId::Number(n)) => n.to_string(),
            Some(RawId::Text(text)) => {
                return Err(FeedModelError::InvalidValue {
                    field: "id".to_string(),
                    value: format!("{:?}", text),
                });
            }
            None => {
                return Err(FeedModelError::InvalidValue {
                    field: "id".to_string(),
                    value: "missing".to_string(),
                });
            }
        };

        let title = raw
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| FeedModelError::InvalidValue {
                field: "title".to_string(),
                value: "missing or empty".to_string(),
            })?;

        if let Some(range) = &raw.compensation {
            if let (Some(min), Some(max)) = (range.min, range.max) {
                if min > max {
                    return Err(FeedModelError::InvalidValue {
                        field: "compensation".to_string(),
                        value: format!("min {} exceeds max {}", min, max),
                    });
                }
            }
        }

        Ok(CandidateItem {
            id,
            kind: raw.kind.unwrap_or_default(),
            display: DisplayFields {
                title,
                organization: raw.organization,
                compensation: raw.compensation,
                location: raw.location,
                skills: raw.skills.unwrap_or_default(),
                description: raw.description,
            },
            match_score: finite_score("match_score", raw.match_score)?,
            boost_weight: finite_score("boost_weight", raw.boost_weight)?,
            is_external: raw.is_external.unwrap_or(false),
        })
    }
}

fn finite_score(field: &str, value: Option<f64>) -> Result<f32> {
    let score = value.unwrap_or(0.0) as f32;
    if score.is_finite() {
        Ok(score)
    } else {
        Err(FeedModelError::InvalidValue {
            field: field.to_string(),
            value: format!("{:?}", value),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate a single record.
pub fn parse_candidate(index: usize, value: &Value) -> Result<CandidateItem> {
    let raw: RawCandidate =
        serde_json::from_value(value.clone()).map_err(|e| FeedModelError::InvalidRecord {
            index,
            reason: e.to_string(),
        })?;

    CandidateItem::try_from(raw).map_err(|e| FeedModelError::InvalidRecord {
        index,
        reason: e.to_string(),
    })
}

/// Parse a refill payload into validated candidates.
///
/// # Returns
/// * `Ok(ParsedBatch)` - valid items plus the reasons for any dropped records
/// * `Err(NotAList)` - the payload is not a list at all; callers treat this
///   as an empty result
pub fn parse_payload(payload: &Value) -> Result<ParsedBatch> {
    let records = match payload {
        Value::Array(records) => records,
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(records)) => records,
            Some(other) => {
                return Err(FeedModelError::NotAList {
                    found: format!("object with a {} `results` field", json_kind(other)),
                });
            }
            None => {
                return Err(FeedModelError::NotAList {
                    found: "object without a `results` field".to_string(),
                });
            }
        },
        other => {
            return Err(FeedModelError::NotAList {
                found: json_kind(other).to_string(),
            });
        }
    };

    let mut batch = ParsedBatch::default();
    for (index, record) in records.iter().enumerate() {
        match parse_candidate(index, record) {
            Ok(item) => batch.items.push(item),
            Err(e) => batch.rejected.push(e),
        }
    }
    Ok(batch)
}

/// Parse a payload from raw text (file fixtures, cached result sets).
pub fn parse_payload_str(text: &str) -> Result<ParsedBatch> {
    let value: Value = serde_json::from_str(text)?;
    parse_payload(&value)
}
