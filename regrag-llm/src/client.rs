//! HTTP provider and the retrying client built on top of it.

use crate::provider::Provider;
use crate::types::{CompletionRequest, CompletionResponse, Message, StopReason, ToolSchema};
use regrag_core::error::LlmError;
use std::time::Duration;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Default sampling temperature for conversational answers.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
/// Default max output tokens for a conversational answer.
pub const DEFAULT_ANSWER_MAX_TOKENS: u32 = 500;
/// Default max output tokens for a knowledge-summary generation call.
pub const DEFAULT_SUMMARY_MAX_TOKENS: u32 = 1_500;

const TRANSPORT_RETRY_BUDGET: usize = 2;
const TRANSPORT_BACKOFF: Duration = Duration::from_millis(500);
const DEFAULT_RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(2);
const MAX_RATE_LIMIT_RETRIES: usize = 3;

fn map_http_status(status: reqwest::StatusCode, body: &str, retry_after: Option<Duration>) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::AuthFailed(body.to_string()),
        429 => LlmError::RateLimited {
            retry_after_secs: retry_after
                .unwrap_or(DEFAULT_RATE_LIMIT_BACKOFF)
                .as_secs(),
        },
        400..=499 => LlmError::InvalidResponse(format!("HTTP {status}: {body}")),
        _ => LlmError::RequestFailed(format!("HTTP {status}: {body}")),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::RequestFailed(err.to_string())
    }
}

fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
    let value = headers.get(reqwest::header::RETRY_AFTER)?.to_str().ok()?;
    value.parse::<u64>().ok().map(Duration::from_secs)
}

/// Raw HTTP transport to a single completion endpoint. Expects the
/// endpoint to accept [`CompletionRequest`] JSON and return
/// [`CompletionResponse`] JSON — vendor adapters can wrap this with
/// their own request/response mapping at the HTTP layer if needed.
#[derive(Clone)]
pub struct HttpProvider {
    endpoint: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl HttpProvider {
    /// Build a provider against the given completion endpoint.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            client: reqwest::Client::new(),
        }
    }
}

impl Provider for HttpProvider {
    fn complete(
        &self,
        mut request: CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send {
        if request.model.is_none() {
            request.model = Some(self.model.clone());
        }
        let endpoint = self.endpoint.clone();
        let api_key = self.api_key.clone();
        let client = self.client.clone();

        async move {
            tracing::debug!(url = %endpoint, model = ?request.model, "sending completion request");

            let response = client
                .post(&endpoint)
                .bearer_auth(&api_key)
                .timeout(DEFAULT_TIMEOUT)
                .json(&request)
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            let retry_after = parse_retry_after(response.headers());
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(map_http_status(status, &body, retry_after));
            }

            response
                .json::<CompletionResponse>()
                .await
                .map_err(|e| LlmError::InvalidResponse(format!("invalid JSON response: {e}")))
        }
    }
}

/// LLM Client (C4): wraps a [`Provider`] with request timeout, transport
/// retry budget, and 429 backoff policy, exposing the two public
/// operations the rest of the system calls.
#[derive(Clone)]
pub struct LlmClient<P: Provider> {
    provider: P,
}

impl<P: Provider> LlmClient<P> {
    /// Wrap a provider with the client's retry/backoff policy.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    async fn complete_with_retry(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut transport_attempt = 0usize;
        let mut rate_limit_attempt = 0usize;
        loop {
            match self.provider.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(LlmError::RateLimited { retry_after_secs }) => {
                    if rate_limit_attempt >= MAX_RATE_LIMIT_RETRIES {
                        return Err(LlmError::RateLimited { retry_after_secs });
                    }
                    tracing::warn!(retry_after_secs, "llm rate limited, backing off");
                    tokio::time::sleep(Duration::from_secs(retry_after_secs)).await;
                    rate_limit_attempt += 1;
                }
                Err(err) if err.is_retryable() && transport_attempt < TRANSPORT_RETRY_BUDGET => {
                    tracing::warn!(attempt = transport_attempt + 1, error = %err, "llm transport error, retrying");
                    tokio::time::sleep(TRANSPORT_BACKOFF).await;
                    transport_attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Plain chat completion: returns the model's final text.
    pub async fn complete(&self, messages: Vec<Message>) -> Result<String, LlmError> {
        self.complete_with_options(messages, DEFAULT_TEMPERATURE, DEFAULT_ANSWER_MAX_TOKENS)
            .await
    }

    /// Plain chat completion at a caller-chosen temperature, for callers
    /// that need determinism (e.g. the tool-internal sub-LLM calls, which
    /// are pinned to 0.0) rather than the conversational default.
    pub async fn complete_with_temperature(
        &self,
        messages: Vec<Message>,
        temperature: f64,
    ) -> Result<String, LlmError> {
        self.complete_with_options(messages, temperature, DEFAULT_ANSWER_MAX_TOKENS).await
    }

    /// Plain chat completion with an explicit temperature and max-tokens
    /// budget, for callers with their own output-length contract (e.g.
    /// the knowledge-summary generation call, which needs more headroom
    /// than a conversational answer).
    pub async fn complete_with_options(
        &self,
        messages: Vec<Message>,
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: None,
            messages,
            tools: Vec::new(),
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
        };
        let response = self.complete_with_retry(request).await?;
        match response.text {
            Some(text) => Ok(text),
            None => Ok(String::new()),
        }
    }

    /// Tool-enabled completion: returns either a final assistant
    /// message or one or more tool-call intents. When both are present
    /// on the wire, callers should treat the tool calls as authoritative
    /// (see [`CompletionResponse::has_tool_calls`]).
    pub async fn complete_with_tools(
        &self,
        messages: Vec<Message>,
        tools: Vec<ToolSchema>,
    ) -> Result<CompletionResponse, LlmError> {
        let request = CompletionRequest {
            model: None,
            messages,
            tools,
            max_tokens: Some(DEFAULT_ANSWER_MAX_TOKENS),
            temperature: Some(DEFAULT_TEMPERATURE),
        };
        self.complete_with_retry(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedProvider {
        responses: std::sync::Mutex<Vec<Result<CompletionResponse, LlmError>>>,
        calls: Arc<AtomicUsize>,
    }

    impl Provider for ScriptedProvider {
        fn complete(
            &self,
            _request: CompletionRequest,
        ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = self.responses.lock().unwrap().remove(0);
            async move { result }
        }
    }

    fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            text: Some(text.to_string()),
            tool_calls: vec![],
            stop_reason: StopReason::EndTurn,
        }
    }

    #[tokio::test]
    async fn retries_transport_failures_up_to_budget() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = ScriptedProvider {
            responses: std::sync::Mutex::new(vec![
                Err(LlmError::RequestFailed("timeout".into())),
                Err(LlmError::RequestFailed("timeout".into())),
                Ok(text_response("hello")),
            ]),
            calls: calls.clone(),
        };
        let client = LlmClient::new(provider);
        let result = client.complete(vec![Message::user("hi")]).await.unwrap();
        assert_eq!(result, "hello");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_error_surfaces_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = ScriptedProvider {
            responses: std::sync::Mutex::new(vec![Err(LlmError::AuthFailed("bad key".into()))]),
            calls: calls.clone(),
        };
        let client = LlmClient::new(provider);
        let result = client.complete(vec![Message::user("hi")]).await;
        assert!(matches!(result, Err(LlmError::AuthFailed(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rate_limit_backs_off_then_succeeds() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = ScriptedProvider {
            responses: std::sync::Mutex::new(vec![
                Err(LlmError::RateLimited { retry_after_secs: 0 }),
                Ok(text_response("ok")),
            ]),
            calls: calls.clone(),
        };
        let client = LlmClient::new(provider);
        let result = client.complete(vec![Message::user("hi")]).await.unwrap();
        assert_eq!(result, "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn tool_calls_are_surfaced_from_complete_with_tools() {
        let calls = Arc::new(AtomicUsize::new(0));
        let response = CompletionResponse {
            text: None,
            tool_calls: vec![crate::types::ToolCallIntent {
                id: "tu_1".into(),
                name: "retrieve_regulations".into(),
                arguments: serde_json::json!({"query": "extension depth"}),
            }],
            stop_reason: StopReason::ToolUse,
        };
        let provider = ScriptedProvider {
            responses: std::sync::Mutex::new(vec![Ok(response)]),
            calls: calls.clone(),
        };
        let client = LlmClient::new(provider);
        let result = client
            .complete_with_tools(vec![Message::user("hi")], vec![])
            .await
            .unwrap();
        assert!(result.has_tool_calls());
    }
}
