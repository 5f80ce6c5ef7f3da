//! Tool 4: `generate_compliant_design`.

use crate::registry::{SubLlm, ToolDyn};
use crate::schemas::generate_compliant_design_schema;
use regrag_core::error::ToolError;
use regrag_core::Drawing;
use regrag_prompt::COMPLIANCE_WITH_ADJUSTMENT_SYSTEM;
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

#[derive(Deserialize)]
struct Args {
    original_drawing: Drawing,
    violations: Vec<String>,
    regulations: Vec<String>,
}

#[derive(Deserialize)]
struct Adjustment {
    adjusted_drawing: Drawing,
    #[serde(default)]
    changes_made: Vec<String>,
    #[serde(default)]
    compliance_verification: String,
}

/// Produces an adjusted drawing that resolves stated violations, via a
/// sub-LLM call using the `COMPLIANCE_WITH_ADJUSTMENT` template.
pub struct GenerateCompliantDesign {
    llm: Arc<dyn SubLlm>,
}

impl GenerateCompliantDesign {
    /// Bind this tool to the current request's sub-LLM.
    pub fn new(llm: Arc<dyn SubLlm>) -> Self {
        Self { llm }
    }
}

impl ToolDyn for GenerateCompliantDesign {
    fn name(&self) -> &str {
        "generate_compliant_design"
    }

    fn description(&self) -> &str {
        "Produce an adjusted drawing that resolves stated violations."
    }

    fn input_schema(&self) -> serde_json::Value {
        generate_compliant_design_schema()
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

            let mut user = String::new();
            let drawing_json = serde_json::to_string_pretty(&args.original_drawing).unwrap_or_default();
            user.push_str("Original drawing:\n");
            user.push_str(&drawing_json);
            user.push_str("\n\nViolations:\n");
            for (i, v) in args.violations.iter().enumerate() {
                user.push_str(&format!("{}. {}\n", i + 1, v));
            }
            user.push_str("\nCited regulations:\n");
            for (i, reg) in args.regulations.iter().enumerate() {
                user.push_str(&format!("{}. {}\n", i + 1, reg));
            }
            user.push_str(
                "\nRespond with a JSON object of the form {\"adjusted_drawing\": Drawing, \
                 \"changes_made\": [string], \"compliance_verification\": string}.",
            );

            match self.llm.complete(COMPLIANCE_WITH_ADJUSTMENT_SYSTEM, &user).await {
                Ok(text) => match serde_json::from_str::<Adjustment>(&text) {
                    Ok(adjustment) => Ok(json!({
                        "success": true,
                        "adjusted_drawing": adjustment.adjusted_drawing,
                        "changes_made": adjustment.changes_made,
                        "compliance_verification": adjustment.compliance_verification,
                    })),
                    Err(e) => Ok(json!({
                        "success": false,
                        "error": format!("model response was not a valid adjustment: {e}"),
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

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use regrag_core::error::LlmError;

    struct FixedLlm(&'static str);

    #[async_trait]
    impl SubLlm for FixedLlm {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn returns_adjusted_drawing_from_response() {
        let llm = Arc::new(FixedLlm(
            r#"{"adjusted_drawing": {"objects": []}, "changes_made": ["shortened extension"], "compliance_verification": "now within limit"}"#,
        ));
        let tool = GenerateCompliantDesign::new(llm);
        let result = tool
            .call(json!({
                "original_drawing": {"objects": []},
                "violations": ["extension too deep"],
                "regulations": ["extension depth limit 6m"],
            }))
            .await
            .unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(result["changes_made"][0], "shortened extension");
    }

    #[tokio::test]
    async fn malformed_response_is_reported_as_failure() {
        let llm = Arc::new(FixedLlm("not json"));
        let tool = GenerateCompliantDesign::new(llm);
        let result = tool
            .call(json!({
                "original_drawing": {"objects": []},
                "violations": [],
                "regulations": [],
            }))
            .await
            .unwrap();
        assert_eq!(result["success"], false);
    }
}
