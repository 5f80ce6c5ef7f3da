//! Internal wire types for completion requests and responses.
//!
//! These are the lingua franca between the client and any provider
//! backend — not a specific vendor's schema. Providers convert to/from
//! these.

use serde::{Deserialize, Serialize};

/// Role in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message (instructions).
    System,
    /// User message.
    User,
    /// Assistant (model) message.
    Assistant,
    /// Tool result message.
    Tool,
}

/// A tool-call intent the model emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallIntent {
    /// Unique identifier for this tool use, echoed back in the result.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// Parsed arguments.
    pub arguments: serde_json::Value,
}

/// A message in the provider conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message author.
    pub role: Role,
    /// Plain text content, when this message is not a tool result.
    #[serde(default)]
    pub text: Option<String>,
    /// Tool-call intents the model emitted as part of this message.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallIntent>,
    /// Set on a `Tool` role message: which tool_call id this result
    /// answers, and whether it was an error.
    #[serde(default)]
    pub tool_result_for: Option<String>,
}

impl Message {
    /// A plain system message.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: Some(text.into()),
            tool_calls: Vec::new(),
            tool_result_for: None,
        }
    }

    /// A plain user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: Some(text.into()),
            tool_calls: Vec::new(),
            tool_result_for: None,
        }
    }

    /// A tool-result message.
    pub fn tool_result(tool_call_id: impl Into<String>, result_text: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            text: Some(result_text.into()),
            tool_calls: Vec::new(),
            tool_result_for: Some(tool_call_id.into()),
        }
    }
}

/// JSON-Schema description of a tool for the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name (wire-stable, see the tool registry).
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// JSON Schema for the tool's input.
    pub input_schema: serde_json::Value,
}

/// Request sent to a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Model identifier (None = provider default).
    #[serde(default)]
    pub model: Option<String>,
    /// Conversation messages.
    pub messages: Vec<Message>,
    /// Available tools; empty for a plain completion.
    #[serde(default)]
    pub tools: Vec<ToolSchema>,
    /// Maximum output tokens.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// Why the provider stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Model produced a final text response.
    EndTurn,
    /// Model wants to use one or more tools.
    ToolUse,
    /// Hit the max_tokens limit.
    MaxTokens,
}

/// Response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Final assistant text, when the model produced one.
    #[serde(default)]
    pub text: Option<String>,
    /// Tool-call intents, in emission order. Present together with
    /// `text` only when the provider chooses to narrate before acting;
    /// per the client contract, callers treat tool calls as taking
    /// precedence when both are present.
    #[serde(default)]
    pub tool_calls: Vec<ToolCallIntent>,
    /// Why the provider stopped.
    pub stop_reason: StopReason,
}

impl CompletionResponse {
    /// Whether the model asked to invoke at least one tool.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_serde_roundtrip() {
        for role in [Role::System, Role::User, Role::Assistant, Role::Tool] {
            let json = serde_json::to_string(&role).unwrap();
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(role, back);
        }
    }

    #[test]
    fn has_tool_calls_reflects_emitted_intents() {
        let empty = CompletionResponse {
            text: Some("done".into()),
            tool_calls: vec![],
            stop_reason: StopReason::EndTurn,
        };
        assert!(!empty.has_tool_calls());

        let with_calls = CompletionResponse {
            text: None,
            tool_calls: vec![ToolCallIntent {
                id: "tu_1".into(),
                name: "retrieve_regulations".into(),
                arguments: serde_json::json!({"query": "extension depth"}),
            }],
            stop_reason: StopReason::ToolUse,
        };
        assert!(with_calls.has_tool_calls());
    }
}
