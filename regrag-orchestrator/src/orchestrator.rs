//! Orchestrator (C9): the single public entry point, dispatching to the
//! agentic or standard path and applying the fallback ladder.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use regrag_agent::AgenticLoop;
use regrag_core::conversation::ToolCall;
use regrag_core::error::{AgenticError, OrchestratorError};
use regrag_core::{AgenticState, AnswerResult, AnswerType, Drawing, Question, RequestId, RetrievedChunk};
use regrag_llm::{LlmClient, Message, Provider};
use regrag_prompt::PromptAssembler;
use regrag_retrieval::RetrievalGateway;
use regrag_tool::SubLlm;

use crate::config::Config;
use crate::fallback::{self, Tier};
use crate::intent::{self, Intent};
use crate::knowledge_service::KnowledgeSummaryService;

/// Which path a request runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// A single retrieval/prompt/LLM pass, through the fallback ladder.
    Standard,
    /// The bounded reasoning loop, falling back to standard on failure.
    Agentic,
}

fn collect_retrieved_chunks(tool_calls: &[ToolCall]) -> Vec<RetrievedChunk> {
    let mut seen = HashSet::new();
    let mut chunks = Vec::new();
    for call in tool_calls {
        if call.tool_name != "retrieve_regulations" || !call.succeeded() {
            continue;
        }
        let Some(raw) = call.result.get("regulations") else {
            continue;
        };
        let Ok(hits) = serde_json::from_value::<Vec<RetrievedChunk>>(raw.clone()) else {
            continue;
        };
        for hit in hits {
            let key = (hit.document.clone(), hit.page, hit.paragraph, hit.content.clone());
            if seen.insert(key) {
                chunks.push(hit);
            }
        }
    }
    chunks
}

fn tier_to_answer_type(tier: Tier) -> AnswerType {
    match tier {
        Tier::Hybrid => AnswerType::Hybrid,
        Tier::DrawingOnly => AnswerType::Drawing,
        Tier::RegulationsOnly => AnswerType::Pdf,
        Tier::KnowledgeSummary => AnswerType::NoAnswer,
    }
}

/// Single entry point `answer(...)`, wiring C2 through C8 together.
pub struct Orchestrator<P: Provider + Clone + 'static> {
    llm: LlmClient<P>,
    gateway: Arc<RetrievalGateway>,
    prompts: PromptAssembler,
    knowledge: Arc<KnowledgeSummaryService<P>>,
    config: Config,
}

impl<P: Provider + Clone + 'static> Orchestrator<P> {
    /// Wire an orchestrator from its collaborators and process config.
    pub fn new(
        llm: LlmClient<P>,
        gateway: Arc<RetrievalGateway>,
        knowledge: Arc<KnowledgeSummaryService<P>>,
        config: Config,
    ) -> Self {
        Self {
            llm,
            gateway,
            prompts: PromptAssembler::default(),
            knowledge,
            config,
        }
    }

    fn knowledge_summary_result(&self, drawing_context_used: bool, trace_note: Option<String>) -> AnswerResult {
        AnswerResult {
            answer: "I don't have enough grounded information to answer that confidently.".to_string(),
            answer_type: AnswerType::NoAnswer,
            sources: Vec::new(),
            drawing_context_used,
            reasoning_steps: None,
            knowledge_summary: Some(self.knowledge.current()),
            trace_note,
        }
    }

    /// Answer one question, racing the work against the configured
    /// per-request deadline. `request_id` correlates this call across
    /// logs, the reasoning trace, and (at the HTTP layer) the
    /// `x-request-id` response header; callers should generate one per
    /// incoming request rather than reusing it across calls.
    #[allow(clippy::too_many_arguments)]
    pub async fn answer(
        &self,
        question_text: impl Into<String>,
        drawing: Option<Drawing>,
        mode: Mode,
        max_iterations: Option<u32>,
        top_k: Option<usize>,
        request_id: &RequestId,
    ) -> Result<AnswerResult, OrchestratorError> {
        let question = Question::new(question_text)?;
        let intent = intent::classify(&question.text);

        let mut state = AgenticState::new(question.clone(), drawing.clone())
            .with_max_iterations(max_iterations.unwrap_or(self.config.max_iterations));

        let deadline = Duration::from_secs(self.config.request_deadline_seconds);
        match tokio::time::timeout(
            deadline,
            self.dispatch(&mut state, question, drawing, mode, intent, top_k, request_id),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    request_id = %request_id,
                    steps_completed = state.tool_calls.len(),
                    "request deadline elapsed before an answer was produced"
                );
                Err(OrchestratorError::RequestTimeout)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn dispatch(
        &self,
        state: &mut AgenticState,
        question: Question,
        drawing: Option<Drawing>,
        mode: Mode,
        intent: Intent,
        top_k: Option<usize>,
        request_id: &RequestId,
    ) -> Result<AnswerResult, OrchestratorError> {
        if mode == Mode::Agentic {
            match self.run_agentic(state, &question, drawing.clone()).await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    tracing::warn!(
                        request_id = %request_id,
                        error = %err,
                        "agentic loop failed, falling back to standard mode"
                    );
                    let note = format!("agentic mode failed ({err}); fell back to standard mode");
                    return self
                        .run_standard(state, &question, drawing, intent, Some(note), top_k, request_id)
                        .await;
                }
            }
        }
        self.run_standard(state, &question, drawing, intent, None, top_k, request_id).await
    }

    async fn run_agentic(
        &self,
        state: &mut AgenticState,
        question: &Question,
        drawing: Option<Drawing>,
    ) -> Result<AnswerResult, AgenticError> {
        let sub_llm: Arc<dyn SubLlm> = Arc::new(self.llm.clone());
        let registry = regrag_tool::build_registry(
            drawing.clone().unwrap_or_else(Drawing::empty),
            self.gateway.clone(),
            sub_llm,
        );
        let agentic_loop = AgenticLoop::new(self.llm.clone());
        let system_prompt = regrag_prompt::agentic_system_prompt();
        let outcome = agentic_loop.run(state, &registry, &system_prompt, &question.text).await?;

        let chunks = collect_retrieved_chunks(&state.tool_calls);
        let chunks_present = !chunks.is_empty();
        let drawing_present = state.drawing_present();
        let intent = intent::classify(&question.text);

        let initial_tier = fallback::choose_initial_tier(chunks_present, drawing_present, intent);
        let final_tier = fallback::finalize_tier(initial_tier, &outcome.text, &self.config.refusal_phrases);

        let trace_note = outcome
            .iteration_cap_reached
            .then(|| "agentic loop reached its iteration cap".to_string());

        if final_tier == Tier::KnowledgeSummary {
            let mut result = self.knowledge_summary_result(drawing_present, trace_note);
            result.reasoning_steps = Some(state.tool_calls.clone());
            return Ok(result);
        }

        Ok(AnswerResult {
            answer: outcome.text,
            answer_type: tier_to_answer_type(final_tier),
            sources: chunks,
            drawing_context_used: matches!(final_tier, Tier::Hybrid | Tier::DrawingOnly),
            reasoning_steps: Some(state.tool_calls.clone()),
            knowledge_summary: None,
            trace_note,
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_standard(
        &self,
        _state: &mut AgenticState,
        question: &Question,
        drawing: Option<Drawing>,
        intent: Intent,
        trace_note: Option<String>,
        top_k: Option<usize>,
        request_id: &RequestId,
    ) -> Result<AnswerResult, OrchestratorError> {
        let drawing_present = drawing.as_ref().is_some_and(|d| !d.is_empty());
        let shortcut = drawing_present && intent == Intent::DrawingOnly;

        let chunks = if shortcut {
            Vec::new()
        } else {
            match self
                .gateway
                .retrieve(&question.text, Some(top_k.unwrap_or(self.config.top_k_default)))
                .await
            {
                Ok(chunks) => chunks,
                Err(err) => {
                    tracing::warn!(request_id = %request_id, error = %err, "retrieval unavailable, demoting tier");
                    Vec::new()
                }
            }
        };
        let chunks_present = !chunks.is_empty();

        let initial_tier = fallback::choose_initial_tier(chunks_present, drawing_present, intent);
        if initial_tier == Tier::KnowledgeSummary {
            return Ok(self.knowledge_summary_result(drawing_present, trace_note));
        }

        let prompt = if intent == Intent::ComplianceWithAdjustment && drawing_present && initial_tier != Tier::DrawingOnly {
            let regulations: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
            self.prompts
                .compliance_with_adjustment(drawing.as_ref().expect("drawing_present checked"), &regulations, question)
        } else {
            match initial_tier {
                Tier::DrawingOnly => self
                    .prompts
                    .drawing_only(drawing.as_ref().expect("drawing_present checked"), question),
                _ => self.prompts.standard_qa(&chunks, drawing.as_ref(), question),
            }
        };

        let messages = vec![Message::system(prompt.system), Message::user(prompt.user)];
        let answer_text = match self.llm.complete(messages).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(
                    request_id = %request_id,
                    error = %err,
                    "llm call failed, demoting to knowledge summary"
                );
                return Ok(self.knowledge_summary_result(drawing_present, trace_note));
            }
        };

        let final_tier = fallback::finalize_tier(initial_tier, &answer_text, &self.config.refusal_phrases);
        if final_tier == Tier::KnowledgeSummary {
            return Ok(self.knowledge_summary_result(drawing_present, trace_note));
        }

        let sources = if final_tier == Tier::DrawingOnly { Vec::new() } else { chunks };

        Ok(AnswerResult {
            answer: answer_text,
            answer_type: tier_to_answer_type(final_tier),
            sources,
            drawing_context_used: matches!(final_tier, Tier::Hybrid | Tier::DrawingOnly),
            reasoning_steps: None,
            knowledge_summary: None,
            trace_note,
        })
    }
}
