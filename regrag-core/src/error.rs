//! Error taxonomy for the orchestrator and its collaborators.

use thiserror::Error;

/// Errors surfaced directly to the HTTP caller as validation failures.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RequestError {
    /// The question string was empty or whitespace-only.
    #[error("question must not be empty")]
    InvalidQuestion,

    /// The question exceeded the maximum accepted length.
    #[error("question exceeds the {limit} character limit")]
    QuestionTooLong {
        /// The configured limit that was exceeded.
        limit: usize,
    },
}

/// Errors from the retrieval gateway (C2).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The backend was unreachable or returned a non-ok status after the
    /// retry budget was exhausted.
    #[error("retrieval backend unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected the request's credentials; never retried.
    #[error("retrieval backend authentication failed: {0}")]
    AuthFailed(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl RetrievalError {
    /// Whether retrying this request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RetrievalError::Unavailable(_))
    }
}

/// Errors from the LLM client (C4).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP or network transport failure.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The provider rate-limited the request (HTTP 429).
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying, from `Retry-After` or the default.
        retry_after_secs: u64,
    },

    /// Authentication/authorization failed.
    #[error("auth failed: {0}")]
    AuthFailed(String),

    /// A non-429 4xx response, or a response that could not be parsed.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The request deadline elapsed before the provider responded.
    #[error("request timed out")]
    Timeout,

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl LlmError {
    /// Whether retrying this request at the transport level might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::RequestFailed(_) | LlmError::RateLimited { .. }
        )
    }
}

/// Errors from tool argument parsing and dispatch (C5).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ToolError {
    /// The model emitted arguments that do not match the tool's schema.
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments {
        /// Name of the tool whose arguments failed validation.
        tool: String,
        /// Description of what was wrong.
        message: String,
    },

    /// No tool is registered under the requested name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The tool's own execution failed. Tools are expected to catch this
    /// and return `{success: false, error}` instead of propagating it;
    /// this variant exists for dispatcher-level failures (e.g. a
    /// collaborator the tool depends on panicked).
    #[error("tool execution failed: {0}")]
    ExecutionFailed(String),
}

/// Errors from the agentic loop (C6). Caught by the orchestrator and
/// converted into a silent standard-mode fallback; never surfaced raw.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AgenticError {
    /// An LLM call inside the loop failed in a way the loop could not
    /// recover from locally.
    #[error("llm error: {0}")]
    Llm(#[from] LlmError),

    /// A tool dispatch failed in a way the loop could not recover from
    /// locally (distinct from a tool's own `success=false` result).
    #[error("tool dispatch error: {0}")]
    Tool(#[from] ToolError),

    /// The loop's cancellation token fired before a text answer emerged.
    #[error("agentic loop canceled")]
    Canceled,
}

/// Top-level error returned by the orchestrator's public `answer` entry
/// point. A "no-answer" outcome is not represented here — it is a
/// first-class `AnswerResult`, not an error.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Caller-supplied request failed validation.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The per-request deadline elapsed before a result could be produced.
    #[error("request timed out")]
    RequestTimeout,

    /// The process configuration is invalid; fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),
}
