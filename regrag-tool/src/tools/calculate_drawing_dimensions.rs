//! Tool 3: `calculate_drawing_dimensions`.

use crate::registry::ToolDyn;
use crate::schemas::calculate_drawing_dimensions_schema;
use regrag_core::error::ToolError;
use regrag_core::Drawing;
use regrag_geometry::{all_dimensions, building_height, extension_depth, plot_area};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::pin::Pin;

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum DimensionType {
    PlotArea,
    ExtensionDepth,
    BuildingHeight,
    All,
}

#[derive(Deserialize)]
struct Args {
    dimension_type: DimensionType,
}

/// Pure geometry call (C1); reads the current drawing from the request
/// context, never from model-supplied arguments.
pub struct CalculateDrawingDimensions {
    drawing: Drawing,
}

impl CalculateDrawingDimensions {
    /// Bind this tool to the current request's drawing.
    pub fn new(drawing: Drawing) -> Self {
        Self { drawing }
    }
}

impl ToolDyn for CalculateDrawingDimensions {
    fn name(&self) -> &str {
        "calculate_drawing_dimensions"
    }

    fn description(&self) -> &str {
        "Measure plot area, extension depth, or building height from the current drawing."
    }

    fn input_schema(&self) -> serde_json::Value {
        calculate_drawing_dimensions_schema()
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

            let dimensions = match args.dimension_type {
                DimensionType::PlotArea => json!({ "plot_area_m2": plot_area(&self.drawing) }),
                DimensionType::ExtensionDepth => {
                    json!({ "extension_depth_m": extension_depth(&self.drawing) })
                }
                DimensionType::BuildingHeight => {
                    json!({ "building_height_m": building_height(&self.drawing) })
                }
                DimensionType::All => serde_json::to_value(all_dimensions(&self.drawing))
                    .unwrap_or(serde_json::Value::Null),
            };

            Ok(json!({
                "success": true,
                "dimensions": dimensions,
            }))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regrag_core::{DrawingObject, ObjectKind, Point};

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
    async fn computes_plot_area_in_square_meters() {
        let tool = CalculateDrawingDimensions::new(plot_boundary_drawing());
        let result = tool
            .call(json!({"dimension_type": "plot_area"}))
            .await
            .unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(result["dimensions"]["plot_area_m2"], 400.0);
    }

    #[tokio::test]
    async fn all_returns_every_dimension() {
        let tool = CalculateDrawingDimensions::new(plot_boundary_drawing());
        let result = tool.call(json!({"dimension_type": "all"})).await.unwrap();
        assert_eq!(result["dimensions"]["plot_area_m2"], 400.0);
        assert_eq!(result["dimensions"]["extension_depth_m"], "not determinable");
    }
}
