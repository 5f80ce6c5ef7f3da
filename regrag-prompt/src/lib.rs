#![deny(missing_docs)]
//! Prompt Assembler: turns a question, retrieved chunks, and an
//! optional drawing into the system/user message pair for one of the
//! four named templates.

use regrag_core::{Drawing, Question, RetrievedChunk};

/// Rough token estimate: 4 characters per token, matching the
/// estimator used elsewhere in this workspace's LLM plumbing.
fn estimate_tokens(text: &str) -> usize {
    text.len() / 4
}

/// Default token budget for the retrieved-context section of a prompt.
pub const DEFAULT_CONTEXT_TOKEN_BUDGET: usize = 12_000;

/// System prompt for [`Template::StandardQa`].
pub const STANDARD_QA_SYSTEM: &str =
    "You are an expert on building regulations. Answer only from the \
     provided context. If the context does not contain enough \
     information to answer, say so plainly rather than guessing.";

/// System prompt for [`Template::DrawingOnly`].
pub const DRAWING_ONLY_SYSTEM: &str =
    "You are an expert on building regulations and architectural \
     drawings. Describe and analyze the drawing provided literally, \
     based only on its geometry and properties.";

/// System prompt for [`Template::ComplianceWithAdjustment`].
pub const COMPLIANCE_WITH_ADJUSTMENT_SYSTEM: &str =
    "You are an expert on building regulations. Identify violations in \
     the supplied drawing against the cited regulations, then emit an \
     adjusted drawing in the same schema that resolves them, along with \
     a list of the changes made.";

/// System prompt for the `analyze_drawing_compliance` tool's sub-call.
pub const ANALYZE_COMPLIANCE_SYSTEM: &str =
    "You are an expert on building regulations. Given measured values from \
     a drawing and a set of regulation texts, decide which regulations the \
     drawing violates and which it satisfies. Respond with a JSON object \
     of the form {\"violations\": [string], \"compliant\": [string]}.";

/// System prompt for the `verify_compliance` tool's sub-call.
pub const VERIFY_COMPLIANCE_SYSTEM: &str =
    "You are an expert on building regulations. Given freshly measured \
     values from a drawing and a set of regulation texts, decide whether \
     the drawing now satisfies every regulation. Respond with a JSON \
     object of the form {\"compliant\": bool, \"explanation\": string, \
     \"remaining_issues\": [string]}.";

const AGENTIC_TOOL_LINES: &str = "\
- retrieve_regulations: search the regulation corpus for relevant text\n\
- analyze_drawing_compliance: check the current drawing against supplied regulation text\n\
- calculate_drawing_dimensions: measure plot area, extension depth, or building height from the current drawing\n\
- generate_compliant_design: produce an adjusted drawing that resolves stated violations\n\
- verify_compliance: re-measure the current drawing and confirm it now satisfies the supplied regulations";

/// System prompt for [`Template::AgenticSystem`].
pub fn agentic_system_prompt() -> String {
    format!(
        "You are an expert on building regulations, working autonomously \
         with the following tools:\n{AGENTIC_TOOL_LINES}\n\n\
         Stop calling tools and respond in prose once you have a \
         verified answer."
    )
}

/// The four named prompt templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Hybrid and regulations-only paths: retrieved chunks plus an
    /// optional drawing section.
    StandardQa,
    /// Drawing-only path: no retrieved-chunks section.
    DrawingOnly,
    /// Compliance-with-adjustment path: asks for violations plus an
    /// adjusted drawing.
    ComplianceWithAdjustment,
    /// The agentic loop's system message.
    AgenticSystem,
}

/// An assembled system/user prompt pair, ready to seed conversation
/// turns.
#[derive(Debug, Clone)]
pub struct AssembledPrompt {
    /// The system prompt text.
    pub system: String,
    /// The user prompt text.
    pub user: String,
    /// Chunks that were dropped from the context section for exceeding
    /// the token budget, lowest-relevance first. Empty when everything
    /// fit.
    pub dropped_chunks: usize,
}

/// Builds prompts from the four named templates, enforcing a context
/// token budget by dropping the lowest-relevance chunks from the tail.
/// The question itself is never truncated.
pub struct PromptAssembler {
    context_token_budget: usize,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self {
            context_token_budget: DEFAULT_CONTEXT_TOKEN_BUDGET,
        }
    }
}

impl PromptAssembler {
    /// Build an assembler with a non-default context token budget.
    pub fn with_context_token_budget(context_token_budget: usize) -> Self {
        Self {
            context_token_budget,
        }
    }

    fn render_chunks_section(&self, chunks: &[RetrievedChunk]) -> (String, usize) {
        let mut ordered: Vec<&RetrievedChunk> = chunks.iter().collect();
        ordered.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        let mut kept = Vec::new();
        let mut budget_used = 0usize;
        let mut dropped = 0usize;
        for chunk in ordered {
            let rendered = format!("{} {}\n", chunk.marker(), chunk.content);
            let cost = estimate_tokens(&rendered);
            if budget_used + cost > self.context_token_budget && !kept.is_empty() {
                dropped += 1;
                continue;
            }
            budget_used += cost;
            kept.push(rendered);
        }
        (kept.concat(), dropped)
    }

    fn render_drawing_section(&self, drawing: &Drawing) -> String {
        let json = serde_json::to_string_pretty(drawing).unwrap_or_default();
        format!("Drawing:\n{json}\n")
    }

    /// Render `STANDARD_QA`: retrieved chunks, an optional drawing
    /// section, then the question.
    pub fn standard_qa(
        &self,
        chunks: &[RetrievedChunk],
        drawing: Option<&Drawing>,
        question: &Question,
    ) -> AssembledPrompt {
        let (chunks_section, dropped_chunks) = self.render_chunks_section(chunks);
        let mut user = String::new();
        user.push_str("Retrieved regulation context:\n");
        user.push_str(&chunks_section);
        if let Some(d) = drawing {
            user.push_str(&self.render_drawing_section(d));
        }
        user.push_str("\nQuestion: ");
        user.push_str(&question.text);

        AssembledPrompt {
            system: STANDARD_QA_SYSTEM.to_string(),
            user,
            dropped_chunks,
        }
    }

    /// Render `DRAWING_ONLY`: the drawing section and the question,
    /// with no retrieved-chunks section.
    pub fn drawing_only(&self, drawing: &Drawing, question: &Question) -> AssembledPrompt {
        let mut user = String::new();
        user.push_str(&self.render_drawing_section(drawing));
        user.push_str("\nQuestion: ");
        user.push_str(&question.text);

        AssembledPrompt {
            system: DRAWING_ONLY_SYSTEM.to_string(),
            user,
            dropped_chunks: 0,
        }
    }

    /// Render `COMPLIANCE_WITH_ADJUSTMENT`: the drawing, the cited
    /// regulation texts, and the question.
    pub fn compliance_with_adjustment(
        &self,
        drawing: &Drawing,
        regulations: &[String],
        question: &Question,
    ) -> AssembledPrompt {
        let mut user = String::new();
        user.push_str(&self.render_drawing_section(drawing));
        user.push_str("Cited regulations:\n");
        for (i, reg) in regulations.iter().enumerate() {
            user.push_str(&format!("{}. {}\n", i + 1, reg));
        }
        user.push_str("\nQuestion: ");
        user.push_str(&question.text);

        AssembledPrompt {
            system: COMPLIANCE_WITH_ADJUSTMENT_SYSTEM.to_string(),
            user,
            dropped_chunks: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regrag_core::ContentType;

    fn chunk(doc: &str, score: f64, content: &str) -> RetrievedChunk {
        RetrievedChunk {
            document: doc.into(),
            page: 1,
            paragraph: None,
            title: None,
            content: content.into(),
            content_type: ContentType::Text,
            score,
            selected: None,
        }
    }

    #[test]
    fn question_is_never_truncated_even_with_huge_context() {
        let assembler = PromptAssembler::with_context_token_budget(1);
        let chunks = vec![chunk("a", 0.9, &"x".repeat(10_000))];
        let question = Question::new("What are the extension depth limits?").unwrap();
        let prompt = assembler.standard_qa(&chunks, None, &question);
        assert!(prompt.user.contains("What are the extension depth limits?"));
    }

    #[test]
    fn drops_lowest_relevance_chunks_first_when_over_budget() {
        let assembler = PromptAssembler::with_context_token_budget(20);
        let chunks = vec![
            chunk("high", 0.95, &"a".repeat(40)),
            chunk("low", 0.1, &"b".repeat(400)),
        ];
        let question = Question::new("q").unwrap();
        let prompt = assembler.standard_qa(&chunks, None, &question);
        assert!(prompt.user.contains("high"));
        assert!(!prompt.user.contains("low"));
        assert_eq!(prompt.dropped_chunks, 1);
    }

    #[test]
    fn drawing_only_omits_chunks_section() {
        let drawing = Drawing::empty();
        let question = Question::new("describe my drawing").unwrap();
        let assembler = PromptAssembler::default();
        let prompt = assembler.drawing_only(&drawing, &question);
        assert!(!prompt.user.contains("Retrieved regulation context"));
    }

    #[test]
    fn agentic_system_prompt_lists_all_five_tools() {
        let prompt = agentic_system_prompt();
        for tool in [
            "retrieve_regulations",
            "analyze_drawing_compliance",
            "calculate_drawing_dimensions",
            "generate_compliant_design",
            "verify_compliance",
        ] {
            assert!(prompt.contains(tool));
        }
        assert!(prompt.contains("Stop calling tools"));
    }
}
