//! The five tool implementations.

mod analyze_drawing_compliance;
mod calculate_drawing_dimensions;
mod generate_compliant_design;
mod retrieve_regulations;
mod verify_compliance;

pub use analyze_drawing_compliance::AnalyzeDrawingCompliance;
pub use calculate_drawing_dimensions::CalculateDrawingDimensions;
pub use generate_compliant_design::GenerateCompliantDesign;
pub use retrieve_regulations::RetrieveRegulations;
pub use verify_compliance::VerifyCompliance;
