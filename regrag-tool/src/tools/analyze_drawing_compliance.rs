//! Tool 2: `analyze_drawing_compliance`.

use crate::registry::{SubLlm, ToolDyn};
use crate::schemas::analyze_drawing_compliance_schema;
use regrag_core::error::ToolError;
use regrag_core::Drawing;
use regrag_geometry::all_dimensions;
use regrag_prompt::ANALYZE_COMPLIANCE_SYSTEM;
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
    #[serde(default)]
    violations: Vec<String>,
    #[serde(default)]
    compliant: Vec<String>,
}

/// Checks the current drawing against supplied regulation texts, via a
/// sub-LLM call seeded with the drawing's measured dimensions (C1).
pub struct AnalyzeDrawingCompliance {
    drawing: Drawing,
    llm: Arc<dyn SubLlm>,
}

impl AnalyzeDrawingCompliance {
    /// Bind this tool to the current request's drawing and sub-LLM.
    pub fn new(drawing: Drawing, llm: Arc<dyn SubLlm>) -> Self {
        Self { drawing, llm }
    }
}

impl ToolDyn for AnalyzeDrawingCompliance {
    fn name(&self) -> &str {
        "analyze_drawing_compliance"
    }

    fn description(&self) -> &str {
        "Check the current drawing against supplied regulation text."
    }

    fn input_schema(&self) -> serde_json::Value {
        analyze_drawing_compliance_schema()
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
            user.push_str("Measured values:\n");
            user.push_str(&measurements_json);
            user.push_str("\n\nRegulations:\n");
            for (i, reg) in args.regulations.iter().enumerate() {
                user.push_str(&format!("{}. {}\n", i + 1, reg));
            }

            match self.llm.complete(ANALYZE_COMPLIANCE_SYSTEM, &user).await {
                Ok(text) => match serde_json::from_str::<Verdict>(&text) {
                    Ok(verdict) => Ok(json!({
                        "success": true,
                        "violations": verdict.violations,
                        "compliant": verdict.compliant,
                        "measurements": measurements,
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

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use regrag_core::error::LlmError;
    use regrag_core::{DrawingObject, ObjectKind, Point};

    struct FixedLlm(&'static str);

    #[async_trait]
    impl SubLlm for FixedLlm {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    fn plot_boundary_drawing() -> Drawing {
        Drawing {
            objects: vec![DrawingObject {
                kind: ObjectKind::Polyline,
                layer: Some("Plot Boundary".into()),
                points: vec![
                    Point::xy(0.0, 0.0),
                    Point::xy(20_000.0, 0.0),
                    Point::xy(20_000.0, 20_000.0),
                    Point::xy(0.0, 20_000.0),
                ],
                closed: true,
                properties: serde_json::Value::Null,
            }],
        }
    }

    #[tokio::test]
    async fn reports_violations_from_verdict() {
        let llm = Arc::new(FixedLlm(
            r#"{"violations": ["extension exceeds 6m depth"], "compliant": []}"#,
        ));
        let tool = AnalyzeDrawingCompliance::new(plot_boundary_drawing(), llm);
        let result = tool
            .call(json!({"regulations": ["extension depth limit 6m"]}))
            .await
            .unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(result["violations"][0], "extension exceeds 6m depth");
        assert_eq!(result["measurements"]["plot_area_m2"], 400.0);
    }

    #[tokio::test]
    async fn malformed_verdict_is_reported_as_failure_not_error() {
        let llm = Arc::new(FixedLlm("not json"));
        let tool = AnalyzeDrawingCompliance::new(plot_boundary_drawing(), llm);
        let result = tool.call(json!({"regulations": []})).await.unwrap();
        assert_eq!(result["success"], false);
    }
}
