#![deny(missing_docs)]
//! Tool Registry & Dispatcher (C5): the closed set of five tools the
//! agentic loop can call, and the per-request factory that wires them to
//! their collaborators.

mod registry;
mod schemas;
mod tools;

pub use registry::{SubLlm, ToolDyn, ToolRegistry};
pub use schemas::{
    analyze_drawing_compliance_schema, calculate_drawing_dimensions_schema,
    generate_compliant_design_schema, retrieve_regulations_schema, verify_compliance_schema,
};
pub use tools::{
    AnalyzeDrawingCompliance, CalculateDrawingDimensions, GenerateCompliantDesign,
    RetrieveRegulations, VerifyCompliance,
};

use regrag_core::Drawing;
use regrag_retrieval::RetrievalGateway;
use std::sync::Arc;

/// Build a fresh registry of all five tools for one request, binding the
/// drawing-dependent tools (2, 3, 5) to this request's [`Drawing`] and
/// the model-reentrant tools (2, 4, 5) to the shared bounded [`SubLlm`].
pub fn build_registry(
    drawing: Drawing,
    gateway: Arc<RetrievalGateway>,
    llm: Arc<dyn SubLlm>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(RetrieveRegulations::new(gateway)));
    registry.register(Arc::new(AnalyzeDrawingCompliance::new(
        drawing.clone(),
        llm.clone(),
    )));
    registry.register(Arc::new(CalculateDrawingDimensions::new(drawing.clone())));
    registry.register(Arc::new(GenerateCompliantDesign::new(llm.clone())));
    registry.register(Arc::new(VerifyCompliance::new(drawing, llm)));
    registry
}
