#![deny(missing_docs)]
//! Retrieval Gateway: the only component that talks to the external
//! vector index.
//!
//! [`RetrievalGateway`] owns retry/backoff policy and top-k/threshold
//! bounds; [`VectorIndexBackend`] is the thin, swappable transport
//! boundary (HTTP in production, an in-memory fake in tests).

use async_trait::async_trait;
use regrag_core::error::RetrievalError;
use regrag_core::retrieval::{ContentType, RetrievedChunk};
use std::sync::Arc;
use std::time::Duration;

/// Default number of hits requested when the caller does not specify one.
pub const DEFAULT_TOP_K: usize = 5;
/// Lower bound on `top_k`.
pub const MIN_TOP_K: usize = 1;
/// Upper bound on `top_k`.
pub const MAX_TOP_K: usize = 20;
/// Default minimum relevance score a hit must clear to be returned.
pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 0.7;

const RETRY_BACKOFFS_MS: [u64; 3] = [100, 400, 1_600];

/// One hit as returned by the vector index backend, before the gateway
/// applies threshold filtering.
#[derive(Debug, Clone)]
pub struct RawHit {
    /// Source document identifier.
    pub document: String,
    /// Page number.
    pub page: u32,
    /// Paragraph index, if tracked.
    pub paragraph: Option<u32>,
    /// Section title, if tracked.
    pub title: Option<String>,
    /// Chunk text.
    pub content: String,
    /// Text vs. OCR content.
    pub content_type: ContentType,
    /// Relevance score in `[0, 1]`.
    pub score: f64,
}

impl From<RawHit> for RetrievedChunk {
    fn from(hit: RawHit) -> Self {
        RetrievedChunk {
            document: hit.document,
            page: hit.page,
            paragraph: hit.paragraph,
            title: hit.title,
            content: hit.content,
            content_type: hit.content_type,
            score: hit.score,
            selected: None,
        }
    }
}

/// The transport boundary to the external vector index. Implementations
/// own their own connection pooling/auth; the gateway owns retry policy.
#[async_trait]
pub trait VectorIndexBackend: Send + Sync {
    /// Submit a query and return hits ordered by decreasing relevance.
    /// Implementations should return `RetrievalError::AuthFailed` for
    /// credential problems so the gateway does not retry them.
    async fn search(&self, query_text: &str, top_k: usize) -> Result<Vec<RawHit>, RetrievalError>;
}

/// HTTP implementation of [`VectorIndexBackend`] against the contract in
/// the external interfaces section: POST `{ query_text, top_k }`,
/// receive `[{ document, page, paragraph?, title?, content,
/// content_type, score }]`.
pub struct HttpVectorIndex {
    base_url: String,
    client: reqwest::Client,
}

impl HttpVectorIndex {
    /// Build a client against the given base URL (e.g.
    /// `http://vector-index.internal`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[derive(serde::Deserialize)]
struct WireHit {
    document: String,
    page: u32,
    paragraph: Option<u32>,
    title: Option<String>,
    content: String,
    content_type: ContentType,
    score: f64,
}

impl From<WireHit> for RawHit {
    fn from(h: WireHit) -> Self {
        RawHit {
            document: h.document,
            page: h.page,
            paragraph: h.paragraph,
            title: h.title,
            content: h.content,
            content_type: h.content_type,
            score: h.score,
        }
    }
}

#[async_trait]
impl VectorIndexBackend for HttpVectorIndex {
    async fn search(&self, query_text: &str, top_k: usize) -> Result<Vec<RawHit>, RetrievalError> {
        let url = self.search_url();
        tracing::debug!(url = %url, top_k, "querying vector index");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "query_text": query_text, "top_k": top_k }))
            .send()
            .await
            .map_err(|e| RetrievalError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::AuthFailed(body));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::Unavailable(format!(
                "HTTP {status}: {body}"
            )));
        }

        let hits: Vec<WireHit> = response
            .json()
            .await
            .map_err(|e| RetrievalError::Unavailable(format!("invalid JSON response: {e}")))?;
        Ok(hits.into_iter().map(RawHit::from).collect())
    }
}

/// The Retrieval Gateway: bounds `top_k`, retries the backend on
/// transient failure with exponential backoff (100ms, 400ms, 1.6s), and
/// never retries authentication failures.
pub struct RetrievalGateway {
    backend: Arc<dyn VectorIndexBackend>,
    relevance_threshold: f64,
}

impl RetrievalGateway {
    /// Build a gateway over the given backend with the default
    /// relevance threshold.
    pub fn new(backend: Arc<dyn VectorIndexBackend>) -> Self {
        Self {
            backend,
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
        }
    }

    /// Override the relevance threshold applied to results.
    pub fn with_relevance_threshold(mut self, threshold: f64) -> Self {
        self.relevance_threshold = threshold;
        self
    }

    /// Query the backend for `top_k` hits (bounded to `[1, 20]`,
    /// defaulting to 5), retrying transient failures up to three times
    /// with exponential backoff, and filtering out hits below the
    /// configured relevance threshold.
    pub async fn retrieve(
        &self,
        query_text: &str,
        top_k: Option<usize>,
    ) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        let top_k = top_k.unwrap_or(DEFAULT_TOP_K).clamp(MIN_TOP_K, MAX_TOP_K);

        let mut attempt = 0usize;
        loop {
            match self.backend.search(query_text, top_k).await {
                Ok(hits) => {
                    let threshold = self.relevance_threshold;
                    return Ok(hits
                        .into_iter()
                        .map(RetrievedChunk::from)
                        .filter(|c| c.score >= threshold)
                        .collect());
                }
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) if attempt >= RETRY_BACKOFFS_MS.len() => return Err(err),
                Err(err) => {
                    let backoff = RETRY_BACKOFFS_MS[attempt];
                    tracing::warn!(
                        attempt = attempt + 1,
                        backoff_ms = backoff,
                        error = %err,
                        "retrieval backend call failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyBackend {
        fail_times: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VectorIndexBackend for FlakyBackend {
        async fn search(
            &self,
            _query_text: &str,
            _top_k: usize,
        ) -> Result<Vec<RawHit>, RetrievalError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_times {
                return Err(RetrievalError::Unavailable("timeout".into()));
            }
            Ok(vec![RawHit {
                document: "doc".into(),
                page: 1,
                paragraph: None,
                title: None,
                content: "text".into(),
                content_type: ContentType::Text,
                score: 0.9,
            }])
        }
    }

    struct AuthFailingBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl VectorIndexBackend for AuthFailingBackend {
        async fn search(
            &self,
            _query_text: &str,
            _top_k: usize,
        ) -> Result<Vec<RawHit>, RetrievalError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(RetrievalError::AuthFailed("bad credentials".into()))
        }
    }

    #[tokio::test]
    async fn retries_transient_failures_then_succeeds() {
        let backend = Arc::new(FlakyBackend {
            fail_times: 2,
            calls: AtomicUsize::new(0),
        });
        let gateway = RetrievalGateway::new(backend.clone());
        let result = gateway.retrieve("query", None).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_three_retries() {
        let backend = Arc::new(FlakyBackend {
            fail_times: 10,
            calls: AtomicUsize::new(0),
        });
        let gateway = RetrievalGateway::new(backend.clone());
        let result = gateway.retrieve("query", None).await;
        assert!(result.is_err());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn never_retries_auth_failures() {
        let backend = Arc::new(AuthFailingBackend {
            calls: AtomicUsize::new(0),
        });
        let gateway = RetrievalGateway::new(backend.clone());
        let result = gateway.retrieve("query", None).await;
        assert!(matches!(result, Err(RetrievalError::AuthFailed(_))));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn top_k_is_clamped_to_bounds() {
        struct CapturingBackend {
            seen_top_k: std::sync::Mutex<usize>,
        }
        #[async_trait]
        impl VectorIndexBackend for CapturingBackend {
            async fn search(
                &self,
                _query_text: &str,
                top_k: usize,
            ) -> Result<Vec<RawHit>, RetrievalError> {
                *self.seen_top_k.lock().unwrap() = top_k;
                Ok(vec![])
            }
        }
        let backend = Arc::new(CapturingBackend {
            seen_top_k: std::sync::Mutex::new(0),
        });
        let gateway = RetrievalGateway::new(backend.clone());
        gateway.retrieve("q", Some(999)).await.unwrap();
        assert_eq!(*backend.seen_top_k.lock().unwrap(), MAX_TOP_K);

        gateway.retrieve("q", Some(0)).await.unwrap();
        assert_eq!(*backend.seen_top_k.lock().unwrap(), MIN_TOP_K);
    }

    #[tokio::test]
    async fn filters_hits_below_relevance_threshold() {
        struct MixedScoreBackend;
        #[async_trait]
        impl VectorIndexBackend for MixedScoreBackend {
            async fn search(
                &self,
                _query_text: &str,
                _top_k: usize,
            ) -> Result<Vec<RawHit>, RetrievalError> {
                Ok(vec![
                    RawHit {
                        document: "a".into(),
                        page: 1,
                        paragraph: None,
                        title: None,
                        content: "x".into(),
                        content_type: ContentType::Text,
                        score: 0.95,
                    },
                    RawHit {
                        document: "b".into(),
                        page: 1,
                        paragraph: None,
                        title: None,
                        content: "y".into(),
                        content_type: ContentType::Text,
                        score: 0.2,
                    },
                ])
            }
        }
        let gateway = RetrievalGateway::new(Arc::new(MixedScoreBackend));
        let result = gateway.retrieve("q", None).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].document, "a");
    }
}
