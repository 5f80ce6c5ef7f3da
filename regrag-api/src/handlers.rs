//! The four external endpoints: standard query, agentic query,
//! knowledge summary, and health.

use std::time::Duration;

use axum::extract::State;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use regrag_core::{AnswerResult, Drawing, KnowledgeSummary, RequestId};
use regrag_orchestrator::Mode;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::state::AppState;

const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(2);
const HEALTH_PROBE_QUERY: &str = "health check reachability probe";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Attach the correlating request id as an `x-request-id` response
/// header, so a caller can tie this HTTP response back to the orchestrator
/// logs and reasoning trace for the same call.
fn with_request_id_header(request_id: &RequestId, body: impl IntoResponse) -> Response {
    let mut response = body.into_response();
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Body shared by `/query` and `/query-agentic`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// The user's question.
    pub question: String,
    /// The drawing attached to this request, if any. Never persisted.
    #[serde(default)]
    pub drawing: Option<Drawing>,
    /// Client-reported timestamp of the drawing's last edit; currently
    /// informational only, carried for forward compatibility with
    /// caching behavior on the client side.
    #[serde(default)]
    pub drawing_updated_at: Option<String>,
    /// Override for the retrieval gateway's default `top_k`.
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// `POST /query`: one retrieval/prompt/LLM pass through the fallback ladder.
pub async fn query(State(state): State<AppState>, Json(body): Json<QueryRequest>) -> ApiResult<Response> {
    let request_id = RequestId::generate();
    let result = state
        .orchestrator
        .answer(body.question, body.drawing, Mode::Standard, None, body.top_k, &request_id)
        .await?;
    Ok(with_request_id_header(&request_id, Json(result)))
}

/// `POST /query-agentic`: the bounded reasoning loop, silently falling
/// back to the standard path on failure.
pub async fn query_agentic(State(state): State<AppState>, Json(body): Json<QueryRequest>) -> ApiResult<Response> {
    let request_id = RequestId::generate();
    let result = state
        .orchestrator
        .answer(body.question, body.drawing, Mode::Agentic, None, body.top_k, &request_id)
        .await?;
    Ok(with_request_id_header(&request_id, Json(result)))
}

/// `GET /knowledge-summary`: the cached corpus overview. Never fails —
/// serves the hard-coded fallback until the first successful rebuild.
pub async fn knowledge_summary(State(state): State<AppState>) -> Json<KnowledgeSummary> {
    Json(state.knowledge.current())
}

/// Liveness and index-reachability response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`: this endpoint is a liveness check, not a
    /// dependency check, and never returns a non-2xx status.
    pub status: &'static str,
    /// Whether a bounded probe query against the vector index succeeded.
    pub vector_index_reachable: bool,
    /// Whether that probe returned any hits at all.
    pub index_non_empty: bool,
}

/// `GET /health`: always 200. Dependency health is reported in the body,
/// not the status code, so an orchestrator/load balancer never mistakes
/// "the index is still warming up" for "this process is dead".
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let probe = tokio::time::timeout(HEALTH_PROBE_TIMEOUT, state.gateway.retrieve(HEALTH_PROBE_QUERY, Some(1)));
    let (vector_index_reachable, index_non_empty) = match probe.await {
        Ok(Ok(chunks)) => (true, !chunks.is_empty()),
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "health check retrieval probe failed");
            (false, false)
        }
        Err(_) => {
            tracing::warn!("health check retrieval probe timed out");
            (false, false)
        }
    };
    Json(HealthResponse {
        status: "ok",
        vector_index_reachable,
        index_non_empty,
    })
}
