use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind tag of a feature object.
///
/// Serialized as the part identifier stored in the `shape` field of a
/// persisted object (e.g. `"Part::Box"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShapeKind {
    #[serde(rename = "Part::Box")]
    Box,
    #[serde(rename = "Part::Cone")]
    Cone,
    #[serde(rename = "Part::Cylinder")]
    Cylinder,
    #[serde(rename = "Part::Sphere")]
    Sphere,
    #[serde(rename = "Part::Torus")]
    Torus,
    #[serde(rename = "Part::Cut")]
    Cut,
    #[serde(rename = "Part::MultiFuse")]
    Fuse,
    #[serde(rename = "Part::MultiCommon")]
    Intersection,
    #[serde(rename = "Part::Extrusion")]
    Extrusion,
    #[serde(rename = "Part::Chamfer")]
    Chamfer,
    #[serde(rename = "Part::Fillet")]
    Fillet,
    #[serde(rename = "Sketcher::SketchObject")]
    Sketch,
    #[serde(rename = "Part::Any")]
    Opaque,
}

impl ShapeKind {
    /// Every kind, in registry order.
    pub const ALL: [ShapeKind; 13] = [
        ShapeKind::Box,
        ShapeKind::Cone,
        ShapeKind::Cylinder,
        ShapeKind::Sphere,
        ShapeKind::Torus,
        ShapeKind::Cut,
        ShapeKind::Fuse,
        ShapeKind::Intersection,
        ShapeKind::Extrusion,
        ShapeKind::Chamfer,
        ShapeKind::Fillet,
        ShapeKind::Sketch,
        ShapeKind::Opaque,
    ];

    /// The persisted part identifier.
    pub fn tag(self) -> &'static str {
        match self {
            ShapeKind::Box => "Part::Box",
            ShapeKind::Cone => "Part::Cone",
            ShapeKind::Cylinder => "Part::Cylinder",
            ShapeKind::Sphere => "Part::Sphere",
            ShapeKind::Torus => "Part::Torus",
            ShapeKind::Cut => "Part::Cut",
            ShapeKind::Fuse => "Part::MultiFuse",
            ShapeKind::Intersection => "Part::MultiCommon",
            ShapeKind::Extrusion => "Part::Extrusion",
            ShapeKind::Chamfer => "Part::Chamfer",
            ShapeKind::Fillet => "Part::Fillet",
            ShapeKind::Sketch => "Sketcher::SketchObject",
            ShapeKind::Opaque => "Part::Any",
        }
    }

    /// Prefix used when auto-naming objects of this kind ("Box 1", "Cut 2", ...).
    pub fn name_prefix(self) -> &'static str {
        match self {
            ShapeKind::Box => "Box",
            ShapeKind::Cone => "Cone",
            ShapeKind::Cylinder => "Cylinder",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Torus => "Torus",
            ShapeKind::Cut => "Cut",
            ShapeKind::Fuse => "Fuse",
            ShapeKind::Intersection => "Intersection",
            ShapeKind::Extrusion => "Extrusion",
            ShapeKind::Chamfer => "Chamfer",
            ShapeKind::Fillet => "Fillet",
            ShapeKind::Sketch => "Sketch",
            ShapeKind::Opaque => "OCCShape",
        }
    }

    /// Primitive solids built directly by the kernel.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            ShapeKind::Box
                | ShapeKind::Cone
                | ShapeKind::Cylinder
                | ShapeKind::Sphere
                | ShapeKind::Torus
        )
    }

    /// Kinds whose operands are hidden when the feature is created.
    pub fn consumes_operands(self) -> bool {
        matches!(
            self,
            ShapeKind::Cut
                | ShapeKind::Fuse
                | ShapeKind::Intersection
                | ShapeKind::Extrusion
                | ShapeKind::Chamfer
                | ShapeKind::Fillet
        )
    }

    /// Whether parameters of this kind carry a color.
    pub fn has_color(self) -> bool {
        !matches!(self, ShapeKind::Sketch | ShapeKind::Opaque)
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShapeKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| s.to_string())
    }
}
