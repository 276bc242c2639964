use serde::{Deserialize, Serialize};

/// A 2-D primitive lying in a sketch's local XY plane.
///
/// Persisted untagged; the field set identifies the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SketchGeometry {
    Circle(SketchCircle),
    LineSegment(SketchLineSegment),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SketchCircle {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SketchLineSegment {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl SketchGeometry {
    pub fn circle(center: [f64; 2], radius: f64) -> Self {
        SketchGeometry::Circle(SketchCircle {
            center_x: center[0],
            center_y: center[1],
            radius,
        })
    }

    pub fn segment(start: [f64; 2], end: [f64; 2]) -> Self {
        SketchGeometry::LineSegment(SketchLineSegment {
            start_x: start[0],
            start_y: start[1],
            end_x: end[0],
            end_y: end[1],
        })
    }

    /// Axis-aligned 2-D bounds as `(min, max)`.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        match self {
            SketchGeometry::Circle(c) => {
                let r = c.radius.abs();
                (
                    [c.center_x - r, c.center_y - r],
                    [c.center_x + r, c.center_y + r],
                )
            }
            SketchGeometry::LineSegment(s) => (
                [s.start_x.min(s.end_x), s.start_y.min(s.end_y)],
                [s.start_x.max(s.end_x), s.start_y.max(s.end_y)],
            ),
        }
    }
}
