//! Knowledge Summary Service (C10): produces, persists, and caches a
//! corpus overview, regenerated at (re)index time.

use async_trait::async_trait;
use regrag_core::error::{LlmError, RetrievalError};
use regrag_core::KnowledgeSummary;
use regrag_llm::{LlmClient, Message, Provider};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Number of chunks sampled from the index per rebuild.
const SAMPLE_CHUNK_COUNT: usize = 20;

const SUMMARY_GENERATION_SYSTEM: &str =
    "You are summarizing a corpus of building regulation text for an end \
     user. Given sampled excerpts, respond with a JSON object of the form \
     {\"overview\": string, \"topics\": [string], \"suggested_questions\": \
     [string]}. Include at least three suggested_questions oriented \
     around analyzing a submitted drawing.";

/// Source of sampled chunk text for summary generation, abstracting the
/// external indexing collaborator. Implemented by the ingestion pipeline.
#[async_trait]
pub trait ChunkSampler: Send + Sync {
    /// Sample up to `count` representative chunks of corpus text.
    async fn sample(&self, count: usize) -> Result<Vec<String>, RetrievalError>;
}

/// Errors from a rebuild attempt. The artifact is left deleted (serving
/// the hard-coded fallback) until a rebuild succeeds.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RebuildError {
    /// Sampling chunks from the index failed.
    #[error("chunk sampling failed: {0}")]
    Sample(#[from] RetrievalError),
    /// The summary-generation LLM call failed.
    #[error("summary generation failed: {0}")]
    Llm(#[from] LlmError),
    /// Writing the rebuilt artifact to disk failed.
    #[error("persisting knowledge summary to {}: {source}", path.display())]
    Persist {
        /// The configured artifact path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[derive(Deserialize)]
struct GeneratedSummary {
    overview: String,
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    suggested_questions: Vec<String>,
}

/// Holds the process-wide `KnowledgeSummary` artifact. Read-mostly;
/// writes only occur through [`KnowledgeSummaryService::rebuild`], which
/// the external indexing job calls directly — no background task or
/// polling loop lives inside this service.
///
/// The artifact is also persisted as a single serialized blob at `path`
/// so a restart serves the last good summary instead of falling back to
/// [`KnowledgeSummary::fallback`]. `path` is `None` only for in-memory
/// test fixtures that don't exercise persistence.
pub struct KnowledgeSummaryService<P: Provider> {
    artifact: RwLock<Option<KnowledgeSummary>>,
    llm: LlmClient<P>,
    summary_max_tokens: u32,
    path: Option<PathBuf>,
}

impl<P: Provider> KnowledgeSummaryService<P> {
    /// Create a service backed by a persisted artifact at `path`. If a
    /// readable, well-formed blob already exists there (e.g. across a
    /// restart), it is loaded eagerly so `current()` serves it
    /// immediately rather than the hard-coded fallback.
    pub fn new(llm: LlmClient<P>, summary_max_tokens: u32, path: PathBuf) -> Self {
        let loaded = load_from_disk(&path);
        Self {
            artifact: RwLock::new(loaded),
            llm,
            summary_max_tokens,
            path: Some(path),
        }
    }

    /// Create a service with no backing path: the artifact lives only in
    /// process memory and is never loaded from or written to disk. For
    /// tests that don't exercise the persistence requirement.
    pub fn new_in_memory(llm: LlmClient<P>, summary_max_tokens: u32) -> Self {
        Self {
            artifact: RwLock::new(None),
            llm,
            summary_max_tokens,
            path: None,
        }
    }

    /// The current artifact, or [`KnowledgeSummary::fallback`] while none
    /// has ever been generated (or one is mid-rebuild).
    pub fn current(&self) -> KnowledgeSummary {
        self.artifact
            .read()
            .expect("knowledge summary lock poisoned")
            .clone()
            .unwrap_or_else(KnowledgeSummary::fallback)
    }

    /// Rebuild the artifact: delete first (so no reader ever observes
    /// stale content across a rebuild), sample chunks, generate a fresh
    /// summary, persist it to disk, then install it in memory as the
    /// final step.
    pub async fn rebuild(&self, sampler: &dyn ChunkSampler) -> Result<(), RebuildError> {
        {
            let mut guard = self.artifact.write().expect("knowledge summary lock poisoned");
            *guard = None;
        }

        let chunks = sampler.sample(SAMPLE_CHUNK_COUNT).await?;
        let mut user = String::from("Sampled corpus excerpts:\n");
        for (i, chunk) in chunks.iter().enumerate() {
            user.push_str(&format!("{}. {}\n", i + 1, chunk));
        }

        let response = self
            .llm
            .complete_with_options(
                vec![Message::system(SUMMARY_GENERATION_SYSTEM), Message::user(user)],
                regrag_llm::client::DEFAULT_TEMPERATURE,
                self.summary_max_tokens,
            )
            .await?;

        let generated_at = chrono::Utc::now().to_rfc3339();
        let summary = match serde_json::from_str::<GeneratedSummary>(&response) {
            Ok(parsed) if parsed.suggested_questions.len() >= 3 => KnowledgeSummary {
                overview: parsed.overview,
                topics: parsed.topics,
                suggested_questions: parsed.suggested_questions,
                generated_at,
            },
            Ok(parsed) => KnowledgeSummary {
                overview: parsed.overview,
                topics: parsed.topics,
                suggested_questions: regrag_core::knowledge::FALLBACK_SUGGESTED_QUESTIONS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                generated_at,
            },
            Err(_) => KnowledgeSummary {
                overview: response,
                topics: Vec::new(),
                suggested_questions: regrag_core::knowledge::FALLBACK_SUGGESTED_QUESTIONS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                generated_at,
            },
        };

        if let Some(path) = &self.path {
            persist_to_disk(path, &summary).await?;
        }

        let mut guard = self.artifact.write().expect("knowledge summary lock poisoned");
        *guard = Some(summary);
        Ok(())
    }
}

/// Load a persisted artifact, tolerating a missing file or an unparsable
/// blob (treated as "nothing has ever been generated" rather than a
/// startup failure).
fn load_from_disk(path: &Path) -> Option<KnowledgeSummary> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read persisted knowledge summary");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(summary) => Some(summary),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "persisted knowledge summary is malformed, ignoring");
            None
        }
    }
}

/// Write `summary` to `path`, atomically: serialize to a sibling temp
/// file, then rename it over the target so a reader never observes a
/// partially written blob.
async fn persist_to_disk(path: &Path, summary: &KnowledgeSummary) -> Result<(), RebuildError> {
    let body = serde_json::to_string_pretty(summary).expect("KnowledgeSummary is always serializable");
    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, &body)
        .await
        .map_err(|source| RebuildError::Persist {
            path: path.to_path_buf(),
            source,
        })?;
    tokio::fs::rename(&temp_path, path)
        .await
        .map_err(|source| RebuildError::Persist {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regrag_llm::{CompletionRequest, CompletionResponse, StopReason};
    use std::future::Future;

    struct FixedProvider(&'static str);

    impl Provider for FixedProvider {
        fn complete(
            &self,
            _request: CompletionRequest,
        ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
            let text = self.0.to_string();
            async move {
                Ok(CompletionResponse {
                    text: Some(text),
                    tool_calls: vec![],
                    stop_reason: StopReason::EndTurn,
                })
            }
        }
    }

    struct FixedSampler(Vec<String>);

    #[async_trait]
    impl ChunkSampler for FixedSampler {
        async fn sample(&self, _count: usize) -> Result<Vec<String>, RetrievalError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn current_is_fallback_before_any_rebuild() {
        let service = KnowledgeSummaryService::new_in_memory(LlmClient::new(FixedProvider("")), 1500);
        assert_eq!(service.current().overview, KnowledgeSummary::fallback().overview);
    }

    #[tokio::test]
    async fn rebuild_installs_generated_summary() {
        let service = KnowledgeSummaryService::new_in_memory(
            LlmClient::new(FixedProvider(
                r#"{"overview": "covers extension rules", "topics": ["extensions"], "suggested_questions": ["a", "b", "c"]}"#,
            )),
            1500,
        );
        let sampler = FixedSampler(vec!["chunk one".into()]);
        service.rebuild(&sampler).await.unwrap();
        let summary = service.current();
        assert_eq!(summary.overview, "covers extension rules");
        assert_eq!(summary.suggested_questions.len(), 3);
    }

    #[tokio::test]
    async fn malformed_generation_falls_back_to_canonical_suggested_questions() {
        let service =
            KnowledgeSummaryService::new_in_memory(LlmClient::new(FixedProvider("not json")), 1500);
        let sampler = FixedSampler(vec!["chunk one".into()]);
        service.rebuild(&sampler).await.unwrap();
        assert!(service.current().has_enough_suggested_questions());
    }

    #[tokio::test]
    async fn rebuild_persists_artifact_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knowledge_summary.json");
        let service = KnowledgeSummaryService::new(
            LlmClient::new(FixedProvider(
                r#"{"overview": "covers extension rules", "topics": ["extensions"], "suggested_questions": ["a", "b", "c"]}"#,
            )),
            1500,
            path.clone(),
        );
        let sampler = FixedSampler(vec!["chunk one".into()]);
        service.rebuild(&sampler).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let persisted: KnowledgeSummary = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.overview, "covers extension rules");
        assert!(!dir.path().join("knowledge_summary.tmp").exists());
    }

    #[tokio::test]
    async fn new_loads_previously_persisted_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knowledge_summary.json");
        let existing = KnowledgeSummary {
            overview: "persisted from a prior process".into(),
            topics: vec!["setbacks".into()],
            suggested_questions: vec!["a".into(), "b".into(), "c".into()],
            generated_at: "2024-01-01T00:00:00Z".into(),
        };
        std::fs::write(&path, serde_json::to_string(&existing).unwrap()).unwrap();

        let service = KnowledgeSummaryService::new(LlmClient::new(FixedProvider("")), 1500, path);
        assert_eq!(service.current().overview, "persisted from a prior process");
    }

    #[test]
    fn new_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does_not_exist.json");
        let service = KnowledgeSummaryService::new(LlmClient::new(FixedProvider("")), 1500, path);
        assert_eq!(service.current().overview, KnowledgeSummary::fallback().overview);
    }
}
