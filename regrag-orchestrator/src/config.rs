//! Process-wide configuration, loaded once at startup from environment
//! variables with typed defaults. An invalid value is fatal (spec.md's
//! `ConfigurationError`): the process should refuse to serve rather than
//! run with a silently-wrong threshold.

use regrag_core::error::OrchestratorError;
use std::path::PathBuf;

/// Case-insensitive refusal phrases; substring match on an LLM answer
/// triggers the no-answer fallback (Tier 4). This is the canonical list
/// from the fallback ladder's contract — implementations must not extend
/// it heuristically.
pub const DEFAULT_REFUSAL_PHRASES: &[&str] = &[
    "i cannot answer",
    "i can't answer",
    "cannot answer this question",
    "not enough information",
    "insufficient information",
    "doesn't contain",
];

/// Recognized configuration keys (spec.md §6), loaded from environment
/// variables at process startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model identifier passed to the LLM client.
    pub llm_model: String,
    /// Sampling temperature for conversational answers.
    pub llm_temperature: f64,
    /// Max output tokens for a conversational answer.
    pub llm_answer_max_tokens: u32,
    /// Max output tokens for a knowledge-summary generation call.
    pub llm_summary_max_tokens: u32,
    /// Default `top_k` for retrieval when the caller does not specify one.
    pub top_k_default: usize,
    /// Minimum relevance score a retrieved chunk must meet to be usable.
    pub relevance_threshold: f64,
    /// Iteration cap for the agentic loop.
    pub max_iterations: u32,
    /// Per-request deadline, in seconds.
    pub request_deadline_seconds: u64,
    /// Canonical refusal phrases (case-insensitive substring match).
    pub refusal_phrases: Vec<String>,
    /// Path of the persisted `KnowledgeSummary` artifact (spec.md §6).
    pub knowledge_summary_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_model: "claude-sonnet".to_string(),
            llm_temperature: 0.3,
            llm_answer_max_tokens: 500,
            llm_summary_max_tokens: 1500,
            top_k_default: 5,
            relevance_threshold: 0.7,
            max_iterations: 10,
            request_deadline_seconds: 120,
            refusal_phrases: DEFAULT_REFUSAL_PHRASES.iter().map(|s| s.to_string()).collect(),
            knowledge_summary_path: PathBuf::from("knowledge_summary.json"),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, OrchestratorError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse()
            .map_err(|_| OrchestratorError::Configuration(format!("{key} is not valid: {raw:?}"))),
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// [`Config::default`] for anything unset. Fails fast on a value that
    /// is present but cannot be parsed.
    pub fn from_env() -> Result<Self, OrchestratorError> {
        let defaults = Self::default();
        Ok(Self {
            llm_model: std::env::var("REGRAG_LLM_MODEL").unwrap_or(defaults.llm_model),
            llm_temperature: parse_env("REGRAG_LLM_TEMPERATURE", defaults.llm_temperature)?,
            llm_answer_max_tokens: parse_env(
                "REGRAG_LLM_ANSWER_MAX_TOKENS",
                defaults.llm_answer_max_tokens,
            )?,
            llm_summary_max_tokens: parse_env(
                "REGRAG_LLM_SUMMARY_MAX_TOKENS",
                defaults.llm_summary_max_tokens,
            )?,
            top_k_default: parse_env("REGRAG_TOP_K_DEFAULT", defaults.top_k_default)?,
            relevance_threshold: parse_env(
                "REGRAG_RELEVANCE_THRESHOLD",
                defaults.relevance_threshold,
            )?,
            max_iterations: parse_env("REGRAG_MAX_ITERATIONS", defaults.max_iterations)?,
            request_deadline_seconds: parse_env(
                "REGRAG_REQUEST_DEADLINE_SECONDS",
                defaults.request_deadline_seconds,
            )?,
            refusal_phrases: defaults.refusal_phrases,
            knowledge_summary_path: parse_env(
                "REGRAG_KNOWLEDGE_SUMMARY_PATH",
                defaults.knowledge_summary_path,
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = Config::default();
        assert_eq!(config.llm_temperature, 0.3);
        assert_eq!(config.top_k_default, 5);
        assert_eq!(config.relevance_threshold, 0.7);
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.request_deadline_seconds, 120);
        assert_eq!(config.refusal_phrases.len(), 6);
        assert_eq!(config.knowledge_summary_path, PathBuf::from("knowledge_summary.json"));
    }

    #[test]
    fn invalid_env_value_is_a_configuration_error() {
        let result = parse_env::<f64>("REGRAG_TEST_DOES_NOT_EXIST_TOKEN", 0.3);
        assert_eq!(result.unwrap(), 0.3);

        std::env::set_var("REGRAG_TEST_BAD_FLOAT", "not-a-number");
        let result = parse_env::<f64>("REGRAG_TEST_BAD_FLOAT", 0.3);
        std::env::remove_var("REGRAG_TEST_BAD_FLOAT");
        assert!(matches!(result, Err(OrchestratorError::Configuration(_))));
    }
}
