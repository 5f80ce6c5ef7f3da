use regrag_api::{create_router, AppState};
use regrag_llm::{HttpProvider, LlmClient};
use regrag_orchestrator::{Config, KnowledgeSummaryService, Orchestrator};
use regrag_retrieval::{HttpVectorIndex, RetrievalGateway};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("regrag-api error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "regrag_api=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let llm_endpoint = std::env::var("REGRAG_LLM_ENDPOINT")
        .map_err(|_| "REGRAG_LLM_ENDPOINT must be set")?;
    let llm_api_key = std::env::var("REGRAG_LLM_API_KEY").map_err(|_| "REGRAG_LLM_API_KEY must be set")?;
    let vector_index_url =
        std::env::var("REGRAG_VECTOR_INDEX_URL").map_err(|_| "REGRAG_VECTOR_INDEX_URL must be set")?;

    let provider = HttpProvider::new(llm_endpoint, llm_api_key, config.llm_model.clone());
    let llm = LlmClient::new(provider);

    let backend = Arc::new(HttpVectorIndex::new(vector_index_url));
    let gateway = Arc::new(RetrievalGateway::new(backend).with_relevance_threshold(config.relevance_threshold));

    let knowledge = Arc::new(KnowledgeSummaryService::new(
        llm.clone(),
        config.llm_summary_max_tokens,
        config.knowledge_summary_path.clone(),
    ));
    let orchestrator = Arc::new(Orchestrator::new(llm, gateway.clone(), knowledge.clone(), config));

    let state = AppState {
        orchestrator,
        gateway,
        knowledge,
    };

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8080);
    let addr = SocketAddr::from_str(&format!("{host}:{port}")).unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], port)));

    let router = create_router(state);
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
