#![deny(missing_docs)]
//! LLM Client (C4): plain and tool-enabled completions, with request
//! timeout, transport retry budget, and rate-limit backoff policy
//! applied uniformly over any [`Provider`].

pub mod client;
pub mod provider;
pub mod types;

pub use client::{HttpProvider, LlmClient};
pub use provider::Provider;
pub use types::{
    CompletionRequest, CompletionResponse, Message, Role, StopReason, ToolCallIntent, ToolSchema,
};
