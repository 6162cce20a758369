//! Offline adapters: a JSON file standing in for the recommendation service
//! and a reporter that only logs.

use crate::ports::{CandidateFetcher, ClientError, ClientResult, DecisionReporter};
use async_trait::async_trait;
use feed_model::{DecisionReport, RefillRequest};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Serves candidate pages out of a JSON file loaded once up front.
///
/// The file holds either a bare array of candidate records or an object with a
/// `results` array, the same shapes the HTTP service answers with.
pub struct JsonFileSource {
    records: Vec<Value>,
}

impl JsonFileSource {
    /// Read and keep every record from `path`.
    ///
    /// Records are not validated here; they go through the same payload
    /// validation as a live refill when they are served.
    pub async fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| ClientError::InvalidResponse(format!("{}: {}", path.display(), e)))?;

        let records = match value {
            Value::Array(records) => records,
            Value::Object(mut map) => match map.remove("results") {
                Some(Value::Array(records)) => records,
                _ => {
                    return Err(ClientError::InvalidResponse(format!(
                        "{}: expected a `results` array",
                        path.display()
                    )))
                }
            },
            _ => {
                return Err(ClientError::InvalidResponse(format!(
                    "{}: expected a list of candidates",
                    path.display()
                )))
            }
        };

        info!("Loaded {} candidate records from {}", records.len(), path.display());
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<Value>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The id of a raw record, whether it was written as a string or a number.
fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[async_trait]
impl CandidateFetcher for JsonFileSource {
    async fn fetch_candidates(&self, request: &RefillRequest) -> ClientResult<Value> {
        let excluded: HashSet<&str> = request.exclude_ids.iter().map(String::as_str).collect();

        let page: Vec<Value> = self
            .records
            .iter()
            .skip(request.offset)
            .filter(|record| match record_id(record) {
                Some(id) => !excluded.contains(id.as_str()),
                None => true,
            })
            .take(request.limit)
            .cloned()
            .collect();

        debug!(
            "Serving {} records from offset {} (limit {})",
            page.len(),
            request.offset,
            request.limit
        );
        Ok(Value::Array(page))
    }
}

/// Reporter that writes each decision to the log and never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

#[async_trait]
impl DecisionReporter for LogReporter {
    async fn report_decision(&self, report: &DecisionReport) -> ClientResult<()> {
        info!(
            candidate = %report.candidate_id,
            outcome = ?report.outcome,
            match_score = report.score_context.match_score,
            "Decision recorded"
        );
        Ok(())
    }
}
