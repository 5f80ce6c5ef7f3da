//! Shared collaborators handed to every handler.

use std::sync::Arc;

use regrag_llm::HttpProvider;
use regrag_orchestrator::{KnowledgeSummaryService, Orchestrator};
use regrag_retrieval::RetrievalGateway;

/// Per-process state, cloned (cheaply, via `Arc`) into each request.
#[derive(Clone)]
pub struct AppState {
    /// The single entry point for both query modes.
    pub orchestrator: Arc<Orchestrator<HttpProvider>>,
    /// Used directly by the health check to probe index reachability.
    pub gateway: Arc<RetrievalGateway>,
    /// Used directly by the knowledge-summary endpoint.
    pub knowledge: Arc<KnowledgeSummaryService<HttpProvider>>,
}
