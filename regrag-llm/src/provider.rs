//! The `Provider` trait backing the LLM client.
//!
//! Uses RPITIT (return-position `impl Trait` in traits) and is
//! intentionally not object-safe — the client owns the retry/backoff
//! policy and is generic over exactly one concrete provider at a time.

use crate::types::{CompletionRequest, CompletionResponse};
use regrag_core::error::LlmError;
use std::future::Future;

/// A backend capable of producing one completion per call. Implemented
/// once per vendor (Anthropic-style HTTP here; others follow the same
/// shape).
pub trait Provider: Send + Sync {
    /// Send a completion request to the provider.
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
