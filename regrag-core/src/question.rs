//! The inbound question and its validation rule.

use crate::error::RequestError;
use serde::{Deserialize, Serialize};

/// Default cap on question length, in UTF-8 characters.
pub const MAX_QUESTION_CHARS: usize = 4_000;

/// A natural-language question about building regulations, plus an
/// optional hint steering the intent classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// The raw question text.
    pub text: String,
    /// Caller-supplied hint about intent, if any. Advisory only — the
    /// classifier still runs and may disagree.
    #[serde(default)]
    pub intent_hint: Option<String>,
}

impl Question {
    /// Build a question, rejecting empty or oversize text up front.
    pub fn new(text: impl Into<String>) -> Result<Self, RequestError> {
        let text = text.into();
        Self::validate(&text)?;
        Ok(Self {
            text,
            intent_hint: None,
        })
    }

    fn validate(text: &str) -> Result<(), RequestError> {
        if text.trim().is_empty() {
            return Err(RequestError::InvalidQuestion);
        }
        if text.chars().count() > MAX_QUESTION_CHARS {
            return Err(RequestError::QuestionTooLong {
                limit: MAX_QUESTION_CHARS,
            });
        }
        Ok(())
    }

    /// Lower-cased text, used by the intent classifier's phrase matching.
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}
