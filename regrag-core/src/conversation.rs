//! Conversation turns and tool-call records threaded through the
//! agentic loop.

use crate::duration::DurationMs;
use serde::{Deserialize, Serialize};

/// One execution record of a tool invocation.
///
/// Created when the loop observes a tool-call response from the LLM,
/// appended to the trace, and echoed back to the LLM as the next turn's
/// input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Monotonically assigned step index within the request.
    pub step: u32,
    /// Name of the tool invoked; one of the five registered tool names.
    pub tool_name: String,
    /// The exact parsed arguments the LLM emitted.
    pub arguments: serde_json::Value,
    /// The tool's structured result, or its `{success: false, error}`
    /// payload — tools never let errors escape as exceptions.
    pub result: serde_json::Value,
    /// Wall-clock duration of the call.
    pub duration: DurationMs,
}

impl ToolCall {
    /// Whether the tool's own result payload reports success.
    pub fn succeeded(&self) -> bool {
        self.result
            .get("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

/// A role-tagged message in the strictly append-only conversation trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ConversationTurn {
    /// Assembled once per request, establishing the assistant's role and
    /// (in agentic mode) the tool contract.
    System {
        /// The system prompt text.
        text: String,
    },
    /// The question plus any context attachments (retrieved chunks,
    /// serialized drawing).
    User {
        /// The user-facing prompt text.
        text: String,
    },
    /// Model output. May embed tool-use requests alongside, or instead
    /// of, prose — `tool_calls` is empty for a terminal text answer.
    Assistant {
        /// The assistant's text, when it produced one this turn.
        #[serde(default)]
        text: Option<String>,
        /// Tool names and arguments the model asked to invoke this turn,
        /// in emission order.
        #[serde(default)]
        tool_calls: Vec<PendingToolCall>,
    },
    /// One per prior [`ToolCall`], carrying its result back to the model.
    Tool {
        /// The tool-call step this result corresponds to.
        step: u32,
        /// The tool's result payload.
        result: serde_json::Value,
    },
}

/// A tool invocation the model requested but that has not yet been
/// dispatched and recorded as a [`ToolCall`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingToolCall {
    /// Name of the tool to invoke.
    pub tool_name: String,
    /// The model's raw, not-yet-validated arguments.
    pub arguments: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_call_succeeded_reads_result_flag() {
        let call = ToolCall {
            step: 1,
            tool_name: "calculate_drawing_dimensions".into(),
            arguments: json!({}),
            result: json!({"success": true, "dimensions": {}}),
            duration: DurationMs::ZERO,
        };
        assert!(call.succeeded());
    }

    #[test]
    fn tool_call_defaults_to_not_succeeded_on_malformed_result() {
        let call = ToolCall {
            step: 1,
            tool_name: "calculate_drawing_dimensions".into(),
            arguments: json!({}),
            result: json!("not an object"),
            duration: DurationMs::ZERO,
        };
        assert!(!call.succeeded());
    }

    #[test]
    fn conversation_turn_role_tag_roundtrips() {
        let turn = ConversationTurn::User {
            text: "hello".into(),
        };
        let value = serde_json::to_value(&turn).unwrap();
        assert_eq!(value["role"], "user");
        let back: ConversationTurn = serde_json::from_value(value).unwrap();
        matches!(back, ConversationTurn::User { .. });
    }
}
