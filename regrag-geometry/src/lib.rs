#![deny(missing_docs)]
//! Pure, side-effect-free geometric analysis over a [`Drawing`].
//!
//! Every function here tolerates malformed or missing geometry by
//! returning [`Dimension::NotDeterminable`] rather than failing — the
//! analyzer never panics and never returns a `Result`. Coordinates are
//! treated as a single consistent unit, documented as millimeters; see
//! the crate-level note on unit ambiguity in the orchestrator's design
//! notes.

use regrag_core::{Drawing, DrawingObject, ObjectKind, Point};
use serde::{Deserialize, Serialize};

/// A bounding box over a set of 2-D points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum x.
    pub xmin: f64,
    /// Minimum y.
    pub ymin: f64,
    /// Maximum x.
    pub xmax: f64,
    /// Maximum y.
    pub ymax: f64,
}

impl BoundingBox {
    /// Height of the box along y.
    pub fn y_extent(&self) -> f64 {
        (self.ymax - self.ymin).abs()
    }
}

/// A measured dimension, or the sentinel the analyzer returns instead of
/// failing when the input does not support the measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    /// A successfully computed value.
    Value(f64),
    /// The measurement could not be made from the supplied geometry.
    NotDeterminable,
}

/// The sentinel string returned in place of a value when a measurement
/// cannot be made.
pub const NOT_DETERMINABLE: &str = "not determinable";

impl Serialize for Dimension {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Dimension::Value(v) => serializer.serialize_f64(*v),
            Dimension::NotDeterminable => serializer.serialize_str(NOT_DETERMINABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Dimension::Value)
                .ok_or_else(|| serde::de::Error::custom("dimension number out of range")),
            serde_json::Value::String(s) if s == NOT_DETERMINABLE => Ok(Dimension::NotDeterminable),
            other => Err(serde::de::Error::custom(format!(
                "expected a number or \"not determinable\", got {other}"
            ))),
        }
    }
}

impl Dimension {
    /// The numeric value, if determinable.
    pub fn value(&self) -> Option<f64> {
        match self {
            Dimension::Value(v) => Some(*v),
            Dimension::NotDeterminable => None,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Value(v) => write!(f, "{v}"),
            Dimension::NotDeterminable => write!(f, "{NOT_DETERMINABLE}"),
        }
    }
}

/// All three headline measurements in one call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllDimensions {
    /// See [`plot_area`].
    pub plot_area_m2: Dimension,
    /// See [`extension_depth`].
    pub extension_depth_m: Dimension,
    /// See [`building_height`].
    pub building_height_m: Dimension,
}

const PLOT_BOUNDARY_LAYER: &str = "Plot Boundary";
const WALLS_LAYER: &str = "Walls";

/// Internal helper: the axis-aligned bounding box of an object's points.
/// Returns `None` for an object with no points.
pub fn bounding_box(object: &DrawingObject) -> Option<BoundingBox> {
    let mut points = object.points.iter();
    let first = points.next()?;
    let mut bbox = BoundingBox {
        xmin: first.x,
        ymin: first.y,
        xmax: first.x,
        ymax: first.y,
    };
    for p in points {
        bbox.xmin = bbox.xmin.min(p.x);
        bbox.ymin = bbox.ymin.min(p.y);
        bbox.xmax = bbox.xmax.max(p.x);
        bbox.ymax = bbox.ymax.max(p.y);
    }
    Some(bbox)
}

/// Shoelace formula over a polygon's vertices. Duplicate consecutive
/// points collapse naturally (they contribute zero cross-product area);
/// self-intersecting polygons are accepted, and the signed result's
/// absolute value is returned.
fn shoelace_area(points: &[Point]) -> Option<f64> {
    if points.len() < 3 {
        return None;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = &points[i];
        let b = &points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    Some((sum / 2.0).abs())
}

fn is_polyline(object: &DrawingObject) -> bool {
    matches!(object.kind, ObjectKind::Polyline)
}

/// Area of the closed polyline on layer "Plot Boundary", in square
/// meters. Coordinates are assumed to be in millimeters; the raw
/// shoelace result is divided by `1e6`. When multiple plot-boundary
/// polylines exist, the one with the largest absolute area wins.
pub fn plot_area(drawing: &Drawing) -> Dimension {
    let best = drawing
        .objects_on_layer(PLOT_BOUNDARY_LAYER)
        .filter(|o| is_polyline(o))
        .filter_map(|o| shoelace_area(&o.points))
        .fold(None::<f64>, |acc, area| match acc {
            Some(max) if max >= area => Some(max),
            _ => Some(area),
        });
    match best {
        Some(area_mm2) => Dimension::Value(area_mm2 / 1_000_000.0),
        None => Dimension::NotDeterminable,
    }
}

/// Depth of the extension, in meters: the absolute delta between the
/// y-extents of the *second* "Walls" polyline's bounding box. Returns
/// [`Dimension::NotDeterminable`] when fewer than two "Walls" polylines
/// exist.
pub fn extension_depth(drawing: &Drawing) -> Dimension {
    let walls: Vec<&DrawingObject> = drawing
        .objects_on_layer(WALLS_LAYER)
        .filter(|o| is_polyline(o))
        .collect();
    match walls.get(1).and_then(|o| bounding_box(o)) {
        Some(bbox) => Dimension::Value(bbox.y_extent() / 1_000.0),
        None => Dimension::NotDeterminable,
    }
}

/// Building height, in meters: a `height` property on any object, or
/// the maximum z-coordinate among all points, whichever is found first.
pub fn building_height(drawing: &Drawing) -> Dimension {
    for object in &drawing.objects {
        if let Some(h) = object.height_property() {
            return Dimension::Value(h);
        }
    }
    let max_z = drawing
        .objects
        .iter()
        .flat_map(|o| o.points.iter())
        .filter_map(|p| p.z)
        .fold(None::<f64>, |acc, z| match acc {
            Some(max) if max >= z => Some(max),
            _ => Some(z),
        });
    match max_z {
        Some(z) => Dimension::Value(z),
        None => Dimension::NotDeterminable,
    }
}

/// Union of [`plot_area`], [`extension_depth`], and [`building_height`].
pub fn all_dimensions(drawing: &Drawing) -> AllDimensions {
    AllDimensions {
        plot_area_m2: plot_area(drawing),
        extension_depth_m: extension_depth(drawing),
        building_height_m: building_height(drawing),
    }
}
