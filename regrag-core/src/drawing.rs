//! The ephemeral per-request drawing.
//!
//! A [`Drawing`] is never written into the retrieval index — it travels
//! with a single request and is discarded once the response is sent.

use serde::{Deserialize, Serialize};

/// What kind of geometric primitive an object represents.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// A closed or open chain of line segments.
    Polyline,
    /// A single line segment.
    Line,
    /// Anything the analyzer does not recognize. Ignored, not rejected.
    Other(String),
}

/// A point in the drawing's coordinate space. `z` is absent for 2-D
/// geometry and present when the drawing carries 3-D height data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate, in the drawing's native unit (documented as
    /// millimeters; the analyzer does not infer or convert units).
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate, when the object carries 3-D points.
    #[serde(default)]
    pub z: Option<f64>,
}

impl Point {
    /// Construct a 2-D point.
    pub fn xy(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    /// Construct a 3-D point.
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }
}

/// One geometric object in a [`Drawing`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawingObject {
    /// The object's primitive kind.
    pub kind: ObjectKind,
    /// Free-form layer name, e.g. "Walls", "Plot Boundary", "Highway".
    /// Missing or unrecognized layers are ignored by the analyzer, not
    /// treated as errors.
    #[serde(default)]
    pub layer: Option<String>,
    /// Ordered vertex list.
    #[serde(default)]
    pub points: Vec<Point>,
    /// Whether a polyline's last vertex implicitly connects to its first.
    #[serde(default)]
    pub closed: bool,
    /// Open-ended property bag (e.g. `{"height": 9.5}`).
    #[serde(default)]
    pub properties: serde_json::Value,
}

impl DrawingObject {
    /// The object's `height` property, if present and numeric.
    pub fn height_property(&self) -> Option<f64> {
        self.properties.get("height")?.as_f64()
    }

    /// Whether this object sits on the named layer (case-sensitive,
    /// exact match — the analyzer does not normalize layer names).
    pub fn is_on_layer(&self, layer: &str) -> bool {
        self.layer.as_deref() == Some(layer)
    }
}

/// An ordered list of geometric objects, passed fresh with every request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Drawing {
    /// The objects that make up the drawing.
    #[serde(default)]
    pub objects: Vec<DrawingObject>,
}

impl Drawing {
    /// A drawing with no objects at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the drawing carries any geometry at all.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// All objects on the given layer, in document order.
    pub fn objects_on_layer<'a>(&'a self, layer: &'a str) -> impl Iterator<Item = &'a DrawingObject> {
        self.objects.iter().filter(move |o| o.is_on_layer(layer))
    }
}
