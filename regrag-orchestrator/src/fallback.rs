//! Fallback Ladder (C8): the four-tier cascade and refusal detection
//! applied after a path's LLM call.

use crate::intent::Intent;

/// Which of the four tiers a request ultimately resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Retrieved chunks and drawing both present, answer non-refusal.
    Hybrid,
    /// No usable chunks (or a drawing-only intent) with a drawing present.
    DrawingOnly,
    /// Drawing absent, chunks present.
    RegulationsOnly,
    /// No usable chunks and no drawing, or any tier's answer refused.
    KnowledgeSummary,
}

/// Case-insensitive substring match against the canonical refusal-phrase
/// list. This list is the contract; callers must not extend it
/// heuristically.
pub fn is_refusal(answer_text: &str, refusal_phrases: &[String]) -> bool {
    let lower = answer_text.to_lowercase();
    refusal_phrases.iter().any(|phrase| lower.contains(&phrase.to_lowercase()))
}

/// Choose which tier's template to run, before the LLM call, from the
/// shape of the available context alone.
pub fn choose_initial_tier(chunks_present: bool, drawing_present: bool, intent: Intent) -> Tier {
    let drawing_only_shortcut = (!chunks_present || intent == Intent::DrawingOnly) && drawing_present;
    if drawing_only_shortcut {
        Tier::DrawingOnly
    } else if chunks_present && drawing_present {
        Tier::Hybrid
    } else if chunks_present {
        Tier::RegulationsOnly
    } else {
        Tier::KnowledgeSummary
    }
}

/// Redirect to the knowledge-summary tier if the produced answer matches
/// a refusal phrase; otherwise keep the tier the caller attempted.
pub fn finalize_tier(initial: Tier, answer_text: &str, refusal_phrases: &[String]) -> Tier {
    if initial != Tier::KnowledgeSummary && is_refusal(answer_text, refusal_phrases) {
        tracing::info!(cause = "refusal_match", "fallback ladder redirecting to knowledge summary");
        Tier::KnowledgeSummary
    } else {
        tracing::info!(?initial, "fallback ladder settled tier");
        initial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases() -> Vec<String> {
        crate::config::DEFAULT_REFUSAL_PHRASES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn detects_refusal_phrase_case_insensitively() {
        assert!(is_refusal("I CANNOT ANSWER this one", &phrases()));
    }

    #[test]
    fn non_refusal_text_passes_through() {
        assert!(!is_refusal("the plot area is 400 square meters", &phrases()));
    }

    #[test]
    fn hybrid_chosen_when_chunks_and_drawing_present() {
        let tier = choose_initial_tier(true, true, Intent::GeneralRag);
        assert_eq!(tier, Tier::Hybrid);
    }

    #[test]
    fn drawing_only_intent_shortcuts_past_retrieval() {
        let tier = choose_initial_tier(true, true, Intent::DrawingOnly);
        assert_eq!(tier, Tier::DrawingOnly);
    }

    #[test]
    fn no_chunks_no_drawing_is_knowledge_summary() {
        let tier = choose_initial_tier(false, false, Intent::GeneralRag);
        assert_eq!(tier, Tier::KnowledgeSummary);
    }

    #[test]
    fn regulations_only_when_drawing_absent() {
        let tier = choose_initial_tier(true, false, Intent::GeneralRag);
        assert_eq!(tier, Tier::RegulationsOnly);
    }

    #[test]
    fn refusal_redirects_hybrid_to_knowledge_summary() {
        let tier = finalize_tier(Tier::Hybrid, "I cannot answer that", &phrases());
        assert_eq!(tier, Tier::KnowledgeSummary);
    }
}
