#![deny(missing_docs)]
//! Shared data model, typed ids, and error taxonomy for the regulation
//! RAG orchestrator.
//!
//! Every other crate in this workspace depends on this one for the
//! request/response shapes (`Question`, `Drawing`, `AnswerResult`, ...),
//! the error kinds each component can raise, and a couple of wire-stable
//! newtypes (`RequestId`, `DurationMs`).

pub mod agentic;
pub mod answer;
pub mod conversation;
pub mod drawing;
pub mod duration;
pub mod error;
pub mod id;
pub mod knowledge;
pub mod question;
pub mod retrieval;

pub use agentic::AgenticState;
pub use answer::{AnswerResult, AnswerType};
pub use conversation::{ConversationTurn, PendingToolCall, ToolCall};
pub use drawing::{Drawing, DrawingObject, ObjectKind, Point};
pub use duration::DurationMs;
pub use id::RequestId;
pub use knowledge::KnowledgeSummary;
pub use question::Question;
pub use retrieval::{ContentType, RetrievedChunk};
