//! Intent Classifier (C7): a deterministic phrase-bag router over the
//! lower-cased question text.

/// The three routing categories, in precedence order (first match wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// The question asks the assistant to describe or measure the
    /// supplied drawing with no regulation lookup implied.
    DrawingOnly,
    /// The question asks for an adjusted, compliant drawing.
    ComplianceWithAdjustment,
    /// Everything else: a general regulations question.
    GeneralRag,
}

const DRAWING_ONLY_PHRASES: &[&str] = &[
    "describe my drawing",
    "what is in my drawing",
    "my building drawing",
    "describe my building",
    "analyze my design",
    "what are the dimensions",
    "layers are in my drawing",
];

const COMPLIANCE_WITH_ADJUSTMENT_PHRASES: &[&str] = &[
    "adjust",
    "fix",
    "make compliant",
    "provide compliant",
    "compliant json",
    "compliant design",
];

/// Classify a question's intent. Deterministic: the same input always
/// yields the same category.
pub fn classify(question_text: &str) -> Intent {
    let lower = question_text.to_lowercase();
    if DRAWING_ONLY_PHRASES.iter().any(|p| lower.contains(p)) {
        Intent::DrawingOnly
    } else if COMPLIANCE_WITH_ADJUSTMENT_PHRASES.iter().any(|p| lower.contains(p)) {
        Intent::ComplianceWithAdjustment
    } else {
        Intent::GeneralRag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_only_takes_precedence_over_compliance() {
        let intent = classify("Please describe my drawing and fix any issues");
        assert_eq!(intent, Intent::DrawingOnly);
    }

    #[test]
    fn compliance_phrase_is_detected() {
        assert_eq!(
            classify("Can you provide compliant JSON for this extension?"),
            Intent::ComplianceWithAdjustment
        );
    }

    #[test]
    fn unmatched_question_is_general_rag() {
        assert_eq!(
            classify("What are the extension depth limits?"),
            Intent::GeneralRag
        );
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("DESCRIBE MY DRAWING"), Intent::DrawingOnly);
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "analyze my design for compliance";
        assert_eq!(classify(text), classify(text));
    }
}
