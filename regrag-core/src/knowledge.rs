//! The corpus-wide knowledge summary artifact (C10's data shape).

use serde::{Deserialize, Serialize};

/// Suggested questions the hard-coded fallback always offers, guiding
/// Tier-4 responders toward the hybrid capability even before any
/// summary has ever been generated.
pub const FALLBACK_SUGGESTED_QUESTIONS: &[&str] = &[
    "What are the extension depth limits for residential properties?",
    "Describe my drawing and tell me its plot area.",
    "Is my building drawing compliant with height restrictions?",
];

/// `{ overview, topics, suggested_questions }`, persisted as a single
/// serialized artifact and regenerated wholesale on every index rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeSummary {
    /// A short prose overview of what the corpus covers.
    pub overview: String,
    /// Topic tags extracted from the sampled corpus.
    pub topics: Vec<String>,
    /// At least three drawing-oriented suggested questions.
    pub suggested_questions: Vec<String>,
    /// RFC-3339 timestamp of when this artifact was generated. Must be
    /// strictly greater than the most recent index-build start time.
    pub generated_at: String,
}

impl KnowledgeSummary {
    /// The stable, hard-coded object served while no real summary has
    /// ever been generated, or while one is mid-rebuild (the artifact is
    /// deleted before rebuild content changes, so a reader never sees
    /// stale content — only this fallback).
    pub fn fallback() -> Self {
        Self {
            overview: "This corpus covers building regulations including plot coverage, \
                       extension depth limits, height restrictions, and setback rules. \
                       A full summary has not yet been generated."
                .to_string(),
            topics: vec![
                "plot coverage".into(),
                "extension depth".into(),
                "height restrictions".into(),
            ],
            suggested_questions: FALLBACK_SUGGESTED_QUESTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            generated_at: "1970-01-01T00:00:00Z".to_string(),
        }
    }

    /// Whether this summary satisfies the Tier-4 drawing-guidance
    /// invariant: at least three drawing-oriented suggested questions.
    pub fn has_enough_suggested_questions(&self) -> bool {
        self.suggested_questions.len() >= 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_meets_its_own_suggested_question_invariant() {
        assert!(KnowledgeSummary::fallback().has_enough_suggested_questions());
    }
}
