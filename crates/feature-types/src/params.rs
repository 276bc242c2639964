//! Typed parameter records, one per [`ShapeKind`].
//!
//! Field names persist in PascalCase (`Length`, `LengthFwd`, `Placement`, ...).
//! Every record deserializes with defaults for omitted fields.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::kind::ShapeKind;
use crate::placement::Placement;
use crate::sketch::SketchGeometry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct BoxParams {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            length: 1.0,
            width: 1.0,
            height: 1.0,
            placement: Placement::default(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CylinderParams {
    pub radius: f64,
    pub height: f64,
    /// Revolve angle in degrees.
    pub angle: f64,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Default for CylinderParams {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height: 1.0,
            angle: 360.0,
            placement: Placement::default(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ConeParams {
    pub radius1: f64,
    pub radius2: f64,
    pub height: f64,
    /// Revolve angle in degrees.
    pub angle: f64,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Default for ConeParams {
    fn default() -> Self {
        Self {
            radius1: 1.0,
            radius2: 0.5,
            height: 1.0,
            angle: 360.0,
            placement: Placement::default(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SphereParams {
    pub radius: f64,
    /// Lower latitude bound in degrees.
    pub angle1: f64,
    /// Upper latitude bound in degrees.
    pub angle2: f64,
    /// Longitude sweep in degrees.
    pub angle3: f64,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius: 5.0,
            angle1: -90.0,
            angle2: 90.0,
            angle3: 360.0,
            placement: Placement::default(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct TorusParams {
    /// Distance from the torus centre to the tube centre.
    pub radius1: f64,
    /// Tube radius.
    pub radius2: f64,
    pub angle1: f64,
    pub angle2: f64,
    pub angle3: f64,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Default for TorusParams {
    fn default() -> Self {
        Self {
            radius1: 10.0,
            radius2: 2.0,
            angle1: -180.0,
            angle2: 180.0,
            angle3: 360.0,
            placement: Placement::default(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct CutParams {
    pub base: String,
    pub tool: String,
    pub refine: bool,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

/// Shared by Fuse and Intersection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MultiParams {
    pub shapes: Vec<String>,
    pub refine: bool,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ExtrusionParams {
    pub base: String,
    pub dir: [f64; 3],
    pub length_fwd: f64,
    pub length_rev: f64,
    pub solid: bool,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Default for ExtrusionParams {
    fn default() -> Self {
        Self {
            base: String::new(),
            dir: [0.0, 0.0, 1.0],
            length_fwd: 10.0,
            length_rev: 0.0,
            solid: false,
            placement: Placement::default(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ChamferParams {
    pub base: String,
    pub edge: u32,
    pub dist: f64,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Default for ChamferParams {
    fn default() -> Self {
        Self {
            base: String::new(),
            edge: 0,
            dist: 0.1,
            placement: Placement::default(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct FilletParams {
    pub base: String,
    pub edge: u32,
    pub radius: f64,
    pub placement: Placement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

impl Default for FilletParams {
    fn default() -> Self {
        Self {
            base: String::new(),
            edge: 0,
            radius: 0.1,
            placement: Placement::default(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SketchParams {
    pub geometry: Vec<SketchGeometry>,
    pub attachment_offset: Placement,
    pub placement: Placement,
}

/// Foreign geometry passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct OpaqueParams {
    pub content: String,
    /// Content-type tag such as `"BREP"`, `"STEP"` or `"STL"`.
    #[serde(rename = "Type")]
    pub content_type: String,
    pub placement: Placement,
}

/// Parameters of a feature object, one variant per kind.
///
/// Serializes as the bare record; the kind tag lives beside it on the object.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameters {
    Box(BoxParams),
    Cone(ConeParams),
    Cylinder(CylinderParams),
    Sphere(SphereParams),
    Torus(TorusParams),
    Cut(CutParams),
    Fuse(MultiParams),
    Intersection(MultiParams),
    Extrusion(ExtrusionParams),
    Chamfer(ChamferParams),
    Fillet(FilletParams),
    Sketch(SketchParams),
    Opaque(OpaqueParams),
}

impl Parameters {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Parameters::Box(_) => ShapeKind::Box,
            Parameters::Cone(_) => ShapeKind::Cone,
            Parameters::Cylinder(_) => ShapeKind::Cylinder,
            Parameters::Sphere(_) => ShapeKind::Sphere,
            Parameters::Torus(_) => ShapeKind::Torus,
            Parameters::Cut(_) => ShapeKind::Cut,
            Parameters::Fuse(_) => ShapeKind::Fuse,
            Parameters::Intersection(_) => ShapeKind::Intersection,
            Parameters::Extrusion(_) => ShapeKind::Extrusion,
            Parameters::Chamfer(_) => ShapeKind::Chamfer,
            Parameters::Fillet(_) => ShapeKind::Fillet,
            Parameters::Sketch(_) => ShapeKind::Sketch,
            Parameters::Opaque(_) => ShapeKind::Opaque,
        }
    }

    /// Operand names in the order the kind consumes them.
    pub fn operands(&self) -> Vec<&str> {
        match self {
            Parameters::Cut(p) => vec![p.base.as_str(), p.tool.as_str()],
            Parameters::Fuse(p) | Parameters::Intersection(p) => {
                p.shapes.iter().map(String::as_str).collect()
            }
            Parameters::Extrusion(p) => vec![p.base.as_str()],
            Parameters::Chamfer(p) => vec![p.base.as_str()],
            Parameters::Fillet(p) => vec![p.base.as_str()],
            _ => Vec::new(),
        }
    }

    pub fn placement(&self) -> &Placement {
        match self {
            Parameters::Box(p) => &p.placement,
            Parameters::Cone(p) => &p.placement,
            Parameters::Cylinder(p) => &p.placement,
            Parameters::Sphere(p) => &p.placement,
            Parameters::Torus(p) => &p.placement,
            Parameters::Cut(p) => &p.placement,
            Parameters::Fuse(p) | Parameters::Intersection(p) => &p.placement,
            Parameters::Extrusion(p) => &p.placement,
            Parameters::Chamfer(p) => &p.placement,
            Parameters::Fillet(p) => &p.placement,
            Parameters::Sketch(p) => &p.placement,
            Parameters::Opaque(p) => &p.placement,
        }
    }

    fn color_slot(&mut self) -> Option<&mut Option<Color>> {
        match self {
            Parameters::Box(p) => Some(&mut p.color),
            Parameters::Cone(p) => Some(&mut p.color),
            Parameters::Cylinder(p) => Some(&mut p.color),
            Parameters::Sphere(p) => Some(&mut p.color),
            Parameters::Torus(p) => Some(&mut p.color),
            Parameters::Cut(p) => Some(&mut p.color),
            Parameters::Fuse(p) | Parameters::Intersection(p) => Some(&mut p.color),
            Parameters::Extrusion(p) => Some(&mut p.color),
            Parameters::Chamfer(p) => Some(&mut p.color),
            Parameters::Fillet(p) => Some(&mut p.color),
            Parameters::Sketch(_) | Parameters::Opaque(_) => None,
        }
    }

    /// The stored color, if the kind carries one and it is set.
    pub fn color(&self) -> Option<&Color> {
        match self {
            Parameters::Box(p) => p.color.as_ref(),
            Parameters::Cone(p) => p.color.as_ref(),
            Parameters::Cylinder(p) => p.color.as_ref(),
            Parameters::Sphere(p) => p.color.as_ref(),
            Parameters::Torus(p) => p.color.as_ref(),
            Parameters::Cut(p) => p.color.as_ref(),
            Parameters::Fuse(p) | Parameters::Intersection(p) => p.color.as_ref(),
            Parameters::Extrusion(p) => p.color.as_ref(),
            Parameters::Chamfer(p) => p.color.as_ref(),
            Parameters::Fillet(p) => p.color.as_ref(),
            Parameters::Sketch(_) | Parameters::Opaque(_) => None,
        }
    }

    /// Replace the color. Returns the previous value, or `Err(color)` back
    /// when the kind has no color slot.
    pub fn set_color(&mut self, color: Option<Color>) -> Result<Option<Color>, Option<Color>> {
        match self.color_slot() {
            Some(slot) => Ok(std::mem::replace(slot, color)),
            None => Err(color),
        }
    }

    /// Check numeric fields are finite and operand lists are well formed.
    ///
    /// Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if !self.placement().is_finite() {
            return Err("placement contains a non-finite value".into());
        }
        let numbers: Vec<(&str, f64)> = match self {
            Parameters::Box(p) => vec![
                ("Length", p.length),
                ("Width", p.width),
                ("Height", p.height),
            ],
            Parameters::Cylinder(p) => vec![
                ("Radius", p.radius),
                ("Height", p.height),
                ("Angle", p.angle),
            ],
            Parameters::Cone(p) => vec![
                ("Radius1", p.radius1),
                ("Radius2", p.radius2),
                ("Height", p.height),
                ("Angle", p.angle),
            ],
            Parameters::Sphere(p) => vec![
                ("Radius", p.radius),
                ("Angle1", p.angle1),
                ("Angle2", p.angle2),
                ("Angle3", p.angle3),
            ],
            Parameters::Torus(p) => vec![
                ("Radius1", p.radius1),
                ("Radius2", p.radius2),
                ("Angle1", p.angle1),
                ("Angle2", p.angle2),
                ("Angle3", p.angle3),
            ],
            Parameters::Extrusion(p) => vec![
                ("Dir", p.dir[0]),
                ("Dir", p.dir[1]),
                ("Dir", p.dir[2]),
                ("LengthFwd", p.length_fwd),
                ("LengthRev", p.length_rev),
            ],
            Parameters::Chamfer(p) => vec![("Dist", p.dist)],
            Parameters::Fillet(p) => vec![("Radius", p.radius)],
            Parameters::Sketch(p) => {
                if !p.attachment_offset.is_finite() {
                    return Err("attachment offset contains a non-finite value".into());
                }
                Vec::new()
            }
            _ => Vec::new(),
        };
        if let Some((field, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{field} is not a finite number"));
        }

        match self {
            Parameters::Fuse(p) | Parameters::Intersection(p) if p.shapes.len() < 2 => {
                Err(format!("Shapes needs at least 2 entries, got {}", p.shapes.len()))
            }
            _ if self.operands().iter().any(|name| name.is_empty()) => {
                Err("operand reference is empty".into())
            }
            _ => Ok(()),
        }
    }
}

impl Serialize for Parameters {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Parameters::Box(p) => p.serialize(serializer),
            Parameters::Cone(p) => p.serialize(serializer),
            Parameters::Cylinder(p) => p.serialize(serializer),
            Parameters::Sphere(p) => p.serialize(serializer),
            Parameters::Torus(p) => p.serialize(serializer),
            Parameters::Cut(p) => p.serialize(serializer),
            Parameters::Fuse(p) | Parameters::Intersection(p) => p.serialize(serializer),
            Parameters::Extrusion(p) => p.serialize(serializer),
            Parameters::Chamfer(p) => p.serialize(serializer),
            Parameters::Fillet(p) => p.serialize(serializer),
            Parameters::Sketch(p) => p.serialize(serializer),
            Parameters::Opaque(p) => p.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omitted_fields_take_documented_defaults() {
        let torus: TorusParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(torus.radius1, 10.0);
        assert_eq!(torus.radius2, 2.0);
        assert_eq!((torus.angle1, torus.angle2, torus.angle3), (-180.0, 180.0, 360.0));

        let extrusion: ExtrusionParams = serde_json::from_value(json!({"Base": "Sketch 1"})).unwrap();
        assert_eq!(extrusion.dir, [0.0, 0.0, 1.0]);
        assert_eq!(extrusion.length_fwd, 10.0);
        assert!(!extrusion.solid);
    }

    #[test]
    fn serializes_pascal_case_without_absent_color() {
        let value = serde_json::to_value(Parameters::Extrusion(ExtrusionParams {
            base: "Sketch 1".into(),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(value["Base"], "Sketch 1");
        assert_eq!(value["LengthFwd"], 10.0);
        assert_eq!(value["LengthRev"], 0.0);
        assert!(value.get("Color").is_none());
    }

    #[test]
    fn opaque_content_type_persists_as_type() {
        let value = serde_json::to_value(OpaqueParams {
            content: "ISO-10303-21;".into(),
            content_type: "step".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(value["Type"], "step");
        assert_eq!(value["Content"], "ISO-10303-21;");
    }

    #[test]
    fn sketch_and_opaque_refuse_color() {
        let mut sketch = Parameters::Sketch(SketchParams::default());
        assert!(sketch.set_color(Some(Color::default())).is_err());
        assert!(sketch.color().is_none());

        let mut cut = Parameters::Cut(CutParams::default());
        assert_eq!(cut.set_color(Some(Color::hex("#FF0000"))), Ok(None));
        assert_eq!(cut.color(), Some(&Color::hex("#FF0000")));
    }

    #[test]
    fn validate_rejects_short_shape_lists_and_nan() {
        let fuse = Parameters::Fuse(MultiParams {
            shapes: vec!["Box 1".into()],
            ..Default::default()
        });
        assert!(fuse.validate().unwrap_err().contains("at least 2"));

        let bad = Parameters::Box(BoxParams {
            width: f64::NAN,
            ..Default::default()
        });
        assert!(bad.validate().unwrap_err().contains("Width"));

        let cut = Parameters::Cut(CutParams {
            base: "Box 1".into(),
            ..Default::default()
        });
        assert!(cut.validate().is_err());
    }

    #[test]
    fn operands_follow_consumption_order() {
        let cut = Parameters::Cut(CutParams {
            base: "A".into(),
            tool: "B".into(),
            ..Default::default()
        });
        assert_eq!(cut.operands(), vec!["A", "B"]);
        assert!(Parameters::Box(BoxParams::default()).operands().is_empty());
    }
}
