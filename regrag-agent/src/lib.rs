#![deny(missing_docs)]
//! Agentic Loop (C6): drives the reason-act-observe cycle over an
//! [`AgenticState`], calling the model through an [`LlmClient`] and
//! dispatching emitted tool calls through a [`ToolRegistry`].

use regrag_core::conversation::{ConversationTurn, PendingToolCall, ToolCall};
use regrag_core::duration::DurationMs;
use regrag_core::error::AgenticError;
use regrag_core::AgenticState;
use regrag_llm::{LlmClient, Message, Provider, Role, ToolCallIntent, ToolSchema};
use regrag_tool::ToolRegistry;
use std::time::Instant;

/// Result of running the loop to completion: a text answer, the trace
/// already recorded on the [`AgenticState`], and whether the iteration
/// cap was hit before a text response arrived.
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    /// The model's final prose answer, or the best partial answer
    /// available when the iteration cap was reached.
    pub text: String,
    /// Set when the loop stopped because `state.max_iterations` was
    /// reached without a text response.
    pub iteration_cap_reached: bool,
}

fn turns_to_messages(turns: &[ConversationTurn]) -> Vec<Message> {
    let mut messages = Vec::with_capacity(turns.len());
    let mut step_counter = 0u32;
    for turn in turns {
        match turn {
            ConversationTurn::System { text } => messages.push(Message::system(text.clone())),
            ConversationTurn::User { text } => messages.push(Message::user(text.clone())),
            ConversationTurn::Assistant { text, tool_calls } => {
                let intents = tool_calls
                    .iter()
                    .map(|pending| {
                        step_counter += 1;
                        ToolCallIntent {
                            id: format!("tu_{step_counter}"),
                            name: pending.tool_name.clone(),
                            arguments: pending.arguments.clone(),
                        }
                    })
                    .collect();
                messages.push(Message {
                    role: Role::Assistant,
                    text: text.clone(),
                    tool_calls: intents,
                    tool_result_for: None,
                });
            }
            ConversationTurn::Tool { step, result } => {
                messages.push(Message::tool_result(format!("tu_{step}"), result.to_string()));
            }
        }
    }
    messages
}

fn tool_schemas(tools: &ToolRegistry) -> Vec<ToolSchema> {
    tools
        .iter()
        .map(|tool| ToolSchema {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.input_schema(),
        })
        .collect()
}

fn best_partial_answer(state: &AgenticState) -> String {
    for turn in state.turns.iter().rev() {
        if let ConversationTurn::Assistant { text: Some(text), .. } = turn {
            if !text.is_empty() {
                return text.clone();
            }
        }
    }
    "Unable to produce a verified answer within the available reasoning steps.".to_string()
}

/// Drives the agentic loop (C6) for one request.
pub struct AgenticLoop<P: Provider> {
    llm: LlmClient<P>,
}

impl<P: Provider> AgenticLoop<P> {
    /// Wrap an LLM client with the loop's reasoning policy.
    pub fn new(llm: LlmClient<P>) -> Self {
        Self { llm }
    }

    /// Seed `state` with the system and user turns if it has none yet,
    /// then iterate until a text answer arrives or the cap is reached.
    pub async fn run(
        &self,
        state: &mut AgenticState,
        tools: &ToolRegistry,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<AgentOutcome, AgenticError> {
        if state.turns.is_empty() {
            state.push_turn(ConversationTurn::System {
                text: system_prompt.to_string(),
            });
            state.push_turn(ConversationTurn::User {
                text: user_prompt.to_string(),
            });
        }

        let schemas = tool_schemas(tools);

        loop {
            if state.at_cap() {
                tracing::warn!(iteration = state.iteration, "agentic loop hit iteration cap");
                return Ok(AgentOutcome {
                    text: best_partial_answer(state),
                    iteration_cap_reached: true,
                });
            }
            state.iteration += 1;

            let messages = turns_to_messages(&state.turns);
            let response = self
                .llm
                .complete_with_tools(messages, schemas.clone())
                .await?;

            if response.has_tool_calls() {
                let pending: Vec<PendingToolCall> = response
                    .tool_calls
                    .iter()
                    .map(|intent| PendingToolCall {
                        tool_name: intent.name.clone(),
                        arguments: intent.arguments.clone(),
                    })
                    .collect();
                state.push_turn(ConversationTurn::Assistant {
                    text: response.text.clone(),
                    tool_calls: pending,
                });

                for intent in &response.tool_calls {
                    let start = Instant::now();
                    let result = match tools.get(&intent.name) {
                        Some(tool) => match tool.call(intent.arguments.clone()).await {
                            Ok(value) => value,
                            Err(err) => serde_json::json!({
                                "success": false,
                                "error": err.to_string(),
                            }),
                        },
                        None => serde_json::json!({
                            "success": false,
                            "error": format!("unknown tool: {}", intent.name),
                        }),
                    };
                    let duration = DurationMs::from(start.elapsed());

                    state.record_tool_call(ToolCall {
                        step: 0,
                        tool_name: intent.name.clone(),
                        arguments: intent.arguments.clone(),
                        result: result.clone(),
                        duration,
                    });
                    let step = state.tool_calls.len() as u32;
                    state.push_turn(ConversationTurn::Tool { step, result });
                }
                continue;
            }

            match response.text {
                Some(text) if !text.is_empty() => {
                    return Ok(AgentOutcome {
                        text,
                        iteration_cap_reached: false,
                    });
                }
                _ => {
                    return Ok(AgentOutcome {
                        text: "Unable to produce an answer.".to_string(),
                        iteration_cap_reached: false,
                    });
                }
            }
        }
    }
}
