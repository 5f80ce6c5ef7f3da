//! The orchestrator's public response shape.

use crate::conversation::ToolCall;
use crate::knowledge::KnowledgeSummary;
use crate::retrieval::RetrievedChunk;
use serde::{Deserialize, Serialize};

/// Which fallback tier produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerType {
    /// Tier 3: regulation text only, no drawing.
    Pdf,
    /// Tier 2: drawing only, no retrieval.
    Drawing,
    /// Tier 1: both retrieved chunks and drawing context in one answer.
    Hybrid,
    /// Tier 4: no usable grounding; a knowledge summary is attached.
    NoAnswer,
}

/// The external response of the orchestrator's `answer` entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Human-readable answer text.
    pub answer: String,
    /// Which tier produced this answer.
    pub answer_type: AnswerType,
    /// Sources cited, with selection flags set where the model marked a
    /// chunk as the one actually used.
    #[serde(default)]
    pub sources: Vec<RetrievedChunk>,
    /// Whether the drawing contributed to this answer.
    pub drawing_context_used: bool,
    /// The full reasoning trace, present only for agentic-mode requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_steps: Option<Vec<ToolCall>>,
    /// Present exactly when `answer_type == NoAnswer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_summary: Option<KnowledgeSummary>,
    /// Set when the agentic loop fell back to standard mode, or hit its
    /// iteration cap, so callers and logs can see why.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_note: Option<String>,
}

impl AnswerResult {
    /// Whether this result satisfies the hybrid-tier invariant: sources
    /// non-empty and drawing context used.
    pub fn is_valid_hybrid(&self) -> bool {
        if self.answer_type != AnswerType::Hybrid {
            return true;
        }
        self.drawing_context_used && !self.sources.is_empty()
    }

    /// Whether this result satisfies the no-answer invariant: a
    /// knowledge summary must be attached.
    pub fn is_valid_no_answer(&self) -> bool {
        if self.answer_type != AnswerType::NoAnswer {
            return true;
        }
        self.knowledge_summary.is_some()
    }
}
