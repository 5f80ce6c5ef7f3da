//! Tool 5: `verify_compliance`.

use crate::registry::{SubLlm, ToolDyn};
use crate::schemas::verify_compliance_schema;
use regrag_core::error::ToolError;
use regrag_core::Drawing;
use regrag_geometry::all_dimensions;
use regrag_prompt::VERIFY_COMPLIANCE_SYSTEM;
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

#[derive(Deserialize)]
struct Args {
    regulations: Vec<String>,
}

#[derive(Deserialize)]
struct Verdict {
    compliant: bool,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    remaining_issues: Vec<String>,
}

/// Re-measures the current drawing (C1) and asks the model to confirm it
/// now satisfies the supplied regulations.
pub struct VerifyCompliance {
    drawing: Drawing,
    llm: Arc<dyn SubLlm>,
}

impl VerifyCompliance {
    /// Bind this tool to the current request's drawing and sub-LLM.
    pub fn new(drawing: Drawing, llm: Arc<dyn SubLlm>) -> Self {
        Self { drawing, llm }
    }
}

impl ToolDyn for VerifyCompliance {
    fn name(&self) -> &str {
        "verify_compliance"
    }

    fn description(&self) -> &str {
        "Re-measure the current drawing and confirm it now satisfies the supplied regulations."
    }

    fn input_schema(&self) -> serde_json::Value {
        verify_compliance_schema()
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

            let measurements = all_dimensions(&self.drawing);
            let measurements_json = serde_json::to_string_pretty(&measurements).unwrap_or_default();

            let mut user = String::new();
            user.push_str("Re-measured values:\n");
            user.push_str(&measurements_json);
            user.push_str("\n\nRegulations:\n");
            for (i, reg) in args.regulations.iter().enumerate() {
                user.push_str(&format!("{}. {}\n", i + 1, reg));
            }

            match self.llm.complete(VERIFY_COMPLIANCE_SYSTEM, &user).await {
                Ok(text) => match serde_json::from_str::<Verdict>(&text) {
                    Ok(verdict) => Ok(json!({
                        "success": true,
                        "compliant": verdict.compliant,
                        "explanation": verdict.explanation,
                        "remaining_issues": verdict.remaining_issues,
                    })),
                    Err(e) => Ok(json!({
                        "success": false,
                        "error": format!("model response was not a valid verdict: {e}"),
                    })),
                },
                Err(err) => Ok(json!({
                    "success": false,
                    "error": err.to_string(),
                })),
            }
        })
    }
}
