//! HTTP adapter for the feed collaborators.
//!
//! Endpoints, relative to the configured base URL:
//! - `POST candidates/search` with a `RefillRequest` body, answering a JSON
//!   candidate list
//! - `POST decisions` with a `DecisionReport` body

use crate::ports::{CandidateFetcher, ClientError, ClientResult, DecisionReporter};
use async_trait::async_trait;
use feed_model::{DecisionReport, RefillRequest};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info};

/// Default request timeout; a slow refill must not hang around forever.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest-backed client implementing both collaborator ports.
#[derive(Clone)]
pub struct HttpFeedClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFeedClient {
    /// Create a client for the feed service at `base_url`
    /// (e.g., "http://localhost:8080/api").
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Using feed service at {}", base_url);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Get the address of the feed service this client talks to.
    pub fn service_address(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

/// Turn non-2xx responses into `ClientError::Status`, keeping the body for logs.
async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl CandidateFetcher for HttpFeedClient {
    async fn fetch_candidates(&self, request: &RefillRequest) -> ClientResult<Value> {
        let url = self.endpoint("candidates/search");
        debug!(
            "Requesting up to {} candidates from {} (offset {}, excluding {})",
            request.limit,
            url,
            request.offset,
            request.exclude_ids.len()
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Candidate fetch failed: {}", e);
                ClientError::Connection(e.to_string())
            })?;

        let response = check_status(response).await?;
        // A body that breaks off mid-read is a transport failure, not a bad payload
        let body = response.bytes().await.map_err(|e| {
            error!("Candidate response body could not be read: {}", e);
            ClientError::Connection(e.to_string())
        })?;
        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl DecisionReporter for HttpFeedClient {
    async fn report_decision(&self, report: &DecisionReport) -> ClientResult<()> {
        let url = self.endpoint("decisions");
        debug!("Reporting {:?} for {} to {}", report.outcome, report.candidate_id, url);

        let response = self
            .client
            .post(&url)
            .json(report)
            .send()
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use chrono::Utc;
    use feed_model::{Outcome, ProfileSnapshot, ScoreContext};
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    // ============================================================================
    // Mock Feed Service
    // ============================================================================

    type Reports = Arc<Mutex<Vec<DecisionReport>>>;

    async fn search(Json(request): Json<RefillRequest>) -> Json<Value> {
        // Echo the paging back so tests can see the request body arrived
        Json(json!([
            {"id": format!("job-{}", request.offset), "title": "Echo", "match_score": 0.5},
            {"id": format!("excluded-{}", request.exclude_ids.len()), "title": "Echo"}
        ]))
    }

    async fn record(State(reports): State<Reports>, Json(report): Json<DecisionReport>) -> StatusCode {
        reports.lock().unwrap().push(report);
        StatusCode::NO_CONTENT
    }

    /// Start a mock feed service on a random port
    async fn start_mock_service(app: Router) -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock feed service");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock feed service failed");
        });

        (format!("http://{}", addr), handle)
    }

    fn request() -> RefillRequest {
        let mut snapshot = ProfileSnapshot::new().with_skills(["rust"]);
        snapshot.decided_ids.insert("a".to_string());
        snapshot.decided_ids.insert("b".to_string());
        RefillRequest::from_snapshot(&snapshot, 7, 5)
    }

    fn report() -> DecisionReport {
        DecisionReport {
            candidate_id: "job-1".to_string(),
            outcome: Outcome::Accept,
            score_context: ScoreContext {
                match_score: 0.8,
                boost_weight: 0.1,
            },
            committed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_fetch_candidates_posts_request() {
        let app = Router::new().route("/candidates/search", post(search));
        let (addr, handle) = start_mock_service(app).await;

        let client = HttpFeedClient::new(format!("{}/", addr)).unwrap();
        let payload = client.fetch_candidates(&request()).await.expect("fetch failed");

        let records = payload.as_array().expect("array payload");
        assert_eq!(records[0]["id"], "job-7");
        assert_eq!(records[1]["id"], "excluded-2");

        handle.abort();
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status() {
        let app = Router::new().route(
            "/candidates/search",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "ranking offline") }),
        );
        let (addr, handle) = start_mock_service(app).await;

        let client = HttpFeedClient::new(addr).unwrap();
        let err = client.fetch_candidates(&request()).await.unwrap_err();

        match err {
            ClientError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "ranking offline");
            }
            other => panic!("expected status error, got {:?}", other),
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let app = Router::new().route(
            "/candidates/search",
            post(|| async { "<html>maintenance</html>" }),
        );
        let (addr, handle) = start_mock_service(app).await;

        let client = HttpFeedClient::new(addr).unwrap();
        let err = client.fetch_candidates(&request()).await.unwrap_err();
        assert!(err.is_malformed(), "got {:?}", err);

        handle.abort();
    }

    #[tokio::test]
    async fn test_truncated_body_is_connection_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Promise more bytes than are sent, then hang up
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 200\r\n\r\n[{\"id\": ",
                )
                .await;
            let _ = socket.shutdown().await;
        });

        let client = HttpFeedClient::new(format!("http://{}", addr)).unwrap();
        let err = client.fetch_candidates(&request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)), "got {:?}", err);
        assert!(!err.is_malformed());

        handle.abort();
    }

    #[tokio::test]
    async fn test_report_decision_posts_body() {
        let reports: Reports = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/decisions", post(record))
            .with_state(reports.clone());
        let (addr, handle) = start_mock_service(app).await;

        let client = HttpFeedClient::new(addr).unwrap();
        client.report_decision(&report()).await.expect("report failed");

        let stored = reports.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].candidate_id, "job-1");
        assert_eq!(stored[0].outcome, Outcome::Accept);

        handle.abort();
    }

    #[tokio::test]
    async fn test_unreachable_service_is_connection_error() {
        // Grab a free port, then close it again
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpFeedClient::with_timeout(format!("http://{}", addr), Duration::from_secs(2)).unwrap();
        let err = client.report_decision(&report()).await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)), "got {:?}", err);
    }
}
