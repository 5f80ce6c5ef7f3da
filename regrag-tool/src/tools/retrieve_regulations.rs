//! Tool 1: `retrieve_regulations`.

use crate::registry::ToolDyn;
use crate::schemas::retrieve_regulations_schema;
use regrag_core::error::ToolError;
use regrag_retrieval::RetrievalGateway;
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

#[derive(Deserialize)]
struct Args {
    query: String,
    #[serde(default)]
    top_k: Option<usize>,
}

/// Calls the retrieval gateway (C2) and reports hits back to the model.
pub struct RetrieveRegulations {
    gateway: Arc<RetrievalGateway>,
}

impl RetrieveRegulations {
    /// Wrap a gateway as a tool.
    pub fn new(gateway: Arc<RetrievalGateway>) -> Self {
        Self { gateway }
    }
}

impl ToolDyn for RetrieveRegulations {
    fn name(&self) -> &str {
        "retrieve_regulations"
    }

    fn description(&self) -> &str {
        "Search the regulation corpus for text relevant to a query."
    }

    fn input_schema(&self) -> serde_json::Value {
        retrieve_regulations_schema()
    }

    fn call(
        &self,
        input: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>> {
        Box::pin(async move {
            let args: Args = serde_json::from_value(input).map_err(|e| ToolError::InvalidArguments {
                tool: self.name().to_string(),
                message: e.to_string(),
            })?;

            match self.gateway.retrieve(&args.query, args.top_k).await {
                Ok(chunks) => Ok(json!({
                    "success": true,
                    "count": chunks.len(),
                    "regulations": chunks,
                })),
                Err(err) => Ok(json!({
                    "success": false,
                    "error": err.to_string(),
                })),
            }
        })
    }
}
