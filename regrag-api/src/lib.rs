#![deny(missing_docs)]
//! The HTTP surface: `/query`, `/query-agentic`, `/knowledge-summary`, and
//! `/health`, wired over the orchestrator's single public entry point.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ApiResult};
pub use handlers::{HealthResponse, QueryRequest};
pub use routes::create_router;
pub use state::AppState;
