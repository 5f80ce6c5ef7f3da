//! Per-request agentic state threaded through the reasoning loop.

use crate::conversation::{ConversationTurn, ToolCall};
use crate::drawing::Drawing;
use crate::question::Question;

/// Default iteration cap for the agentic loop.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// Everything the agentic loop needs for one request. Created at request
/// entry, passed by reference to the loop and dispatcher, and discarded
/// once the response is produced — no singleton holds request-scoped
/// data.
#[derive(Debug, Clone)]
pub struct AgenticState {
    /// The question being answered.
    pub question: Question,
    /// The drawing supplied with this request, shared read-only across
    /// tools via this state.
    pub drawing: Option<Drawing>,
    /// The growing, strictly append-only list of conversation turns.
    pub turns: Vec<ConversationTurn>,
    /// The growing list of tool-call records.
    pub tool_calls: Vec<ToolCall>,
    /// Iterations consumed so far.
    pub iteration: u32,
    /// Iteration cap; the loop finishes with the best partial answer if
    /// reached without a text response.
    pub max_iterations: u32,
}

impl AgenticState {
    /// Start a fresh state for a request.
    pub fn new(question: Question, drawing: Option<Drawing>) -> Self {
        Self {
            question,
            drawing,
            turns: Vec::new(),
            tool_calls: Vec::new(),
            iteration: 0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Override the iteration cap (e.g. from a request's `turns` field).
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Whether the drawing is present and carries at least one object.
    pub fn drawing_present(&self) -> bool {
        self.drawing.as_ref().is_some_and(|d| !d.is_empty())
    }

    /// Whether the iteration cap has been reached.
    pub fn at_cap(&self) -> bool {
        self.iteration >= self.max_iterations
    }

    /// Append a turn to the trace.
    pub fn push_turn(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    /// Record a completed tool call, assigning it the next step index.
    pub fn record_tool_call(&mut self, mut call: ToolCall) {
        call.step = self.tool_calls.len() as u32 + 1;
        self.tool_calls.push(call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_not_at_cap() {
        let state = AgenticState::new(Question::new("q").unwrap(), None);
        assert!(!state.at_cap());
        assert_eq!(state.max_iterations, DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn at_cap_once_iteration_reaches_max() {
        let mut state =
            AgenticState::new(Question::new("q").unwrap(), None).with_max_iterations(2);
        state.iteration = 2;
        assert!(state.at_cap());
    }

    #[test]
    fn drawing_present_requires_nonempty_objects() {
        let state = AgenticState::new(Question::new("q").unwrap(), Some(Drawing::empty()));
        assert!(!state.drawing_present());
    }

    #[test]
    fn record_tool_call_assigns_sequential_steps() {
        use crate::conversation::ToolCall;
        use crate::duration::DurationMs;
        use serde_json::json;

        let mut state = AgenticState::new(Question::new("q").unwrap(), None);
        for _ in 0..3 {
            state.record_tool_call(ToolCall {
                step: 0,
                tool_name: "retrieve_regulations".into(),
                arguments: json!({}),
                result: json!({"success": true}),
                duration: DurationMs::ZERO,
            });
        }
        let steps: Vec<u32> = state.tool_calls.iter().map(|c| c.step).collect();
        assert_eq!(steps, vec![1, 2, 3]);
    }
}
