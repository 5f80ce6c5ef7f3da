//! Object-safe tool abstraction and the per-request registry.

use async_trait::async_trait;
use regrag_core::error::{LlmError, ToolError};
use regrag_llm::{Message, Provider};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Object-safe trait every registered tool implements. Tools are stored
/// as `Arc<dyn ToolDyn>` in [`ToolRegistry`] and dispatched by name.
pub trait ToolDyn: Send + Sync {
    /// The tool's unique, wire-stable name.
    fn name(&self) -> &str;

    /// Human-readable description surfaced to the model.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool. Implementations catch their own internal
    /// errors and return a `{success: false, error}` JSON value rather
    /// than propagating them — the `Err` case here is reserved for
    /// dispatcher-level failures, e.g. malformed arguments caught
    /// before the tool body runs.
    fn call(
        &self,
        input: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>>;
}

/// Registry of tools available to one agentic loop run. Built fresh per
/// request so that drawing-dependent tools can be constructed with that
/// request's [`regrag_core::Drawing`] already bound.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolDyn>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Overwrites any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn ToolDyn>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolDyn>> {
        self.tools.get(name)
    }

    /// Iterate over all registered tools.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ToolDyn>> {
        self.tools.values()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Sub-calls issued from inside a tool are pinned to this temperature:
/// determinism matters more than creativity when judging compliance,
/// distinct from the conversational default used for top-level answers.
const SUB_LLM_TEMPERATURE: f64 = 0.0;

/// The bounded sub-LLM interface injected into tools that need to
/// re-enter the model (2, 4, 5). Object-safe so tools can hold it as
/// `Arc<dyn SubLlm>` regardless of which concrete [`Provider`] backs
/// the outer client. Tools that use this MUST NOT invoke the agentic
/// loop recursively — it is the loop's job alone to count iterations.
#[async_trait]
pub trait SubLlm: Send + Sync {
    /// One-shot system/user completion, with no tool schemas exposed.
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

#[async_trait]
impl<P> SubLlm for regrag_llm::LlmClient<P>
where
    P: Provider + Send + Sync + 'static,
{
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let messages = vec![Message::system(system), Message::user(user)];
        self.complete_with_temperature(messages, SUB_LLM_TEMPERATURE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn _assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn tool_dyn_is_object_safe() {
        _assert_send_sync::<Arc<dyn ToolDyn>>();
    }

    struct EchoTool;

    impl ToolDyn for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes input back"
        }
        fn input_schema(&self) -> serde_json::Value {
            json!({"type": "object"})
        }
        fn call(
            &self,
            input: serde_json::Value,
        ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>> {
            Box::pin(async move { Ok(json!({"echoed": input})) })
        }
    }

    #[test]
    fn registry_add_and_get() {
        let mut reg = ToolRegistry::new();
        assert!(reg.is_empty());
        reg.register(Arc::new(EchoTool));
        assert_eq!(reg.len(), 1);
        assert!(reg.get("echo").is_some());
        assert!(reg.get("nonexistent").is_none());
    }

    #[test]
    fn registry_overwrite_keeps_single_entry() {
        let mut reg = ToolRegistry::new();
        reg.register(Arc::new(EchoTool));
        reg.register(Arc::new(EchoTool));
        assert_eq!(reg.len(), 1);
    }

    #[tokio::test]
    async fn registry_call_tool() {
        let mut reg = ToolRegistry::new();
        reg.register(Arc::new(EchoTool));
        let tool = reg.get("echo").unwrap();
        let result = tool.call(json!({"msg": "hi"})).await.unwrap();
        assert_eq!(result, json!({"echoed": {"msg": "hi"}}));
    }
}
