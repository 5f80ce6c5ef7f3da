//! JSON-Schema declarations for the five tools, wire-stable per the
//! tool-call protocol.

use serde_json::{json, Value};

/// Schema for `retrieve_regulations`.
pub fn retrieve_regulations_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {"type": "string"},
            "top_k": {"type": "integer"}
        },
        "required": ["query"]
    })
}

/// Schema for `analyze_drawing_compliance`.
pub fn analyze_drawing_compliance_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "regulations": {
                "type": "array",
                "items": {"type": "string"}
            }
        },
        "required": ["regulations"]
    })
}

/// Schema for `calculate_drawing_dimensions`.
pub fn calculate_drawing_dimensions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "dimension_type": {
                "type": "string",
                "enum": ["plot_area", "extension_depth", "building_height", "all"]
            }
        },
        "required": ["dimension_type"]
    })
}

/// Schema for `generate_compliant_design`.
pub fn generate_compliant_design_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "original_drawing": {"type": "object"},
            "violations": {
                "type": "array",
                "items": {"type": "string"}
            },
            "regulations": {
                "type": "array",
                "items": {"type": "string"}
            }
        },
        "required": ["original_drawing", "violations", "regulations"]
    })
}

/// Schema for `verify_compliance`.
pub fn verify_compliance_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "regulations": {
                "type": "array",
                "items": {"type": "string"}
            }
        },
        "required": ["regulations"]
    })
}
