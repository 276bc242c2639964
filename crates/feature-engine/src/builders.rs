//! One builder per feature kind.
//!
//! Every builder runs as a single transaction: resolve operands, pick a color,
//! validate, name, append, then hide the consumed operands. Any failure leaves
//! the document untouched.

use tracing::info;

use feature_types::{
    BoxParams, ChamferParams, Color, ConeParams, CutParams, CylinderParams, ExtrusionParams,
    FilletParams, MultiParams, OpaqueParams, Parameters, Placement, SchemaError, SketchParams,
    SphereParams, TorusParams,
};

use crate::document::{Document, Transaction};
use crate::resolve::{resolve_binary, resolve_many, resolve_unary, OperandRef};
use crate::types::{DocumentError, FeatureObject};

/// Input to an operand-free builder: an optional name and the full record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeSpec<P> {
    pub name: Option<String>,
    pub params: P,
}

impl<P: Default> ShapeSpec<P> {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            params: P::default(),
        }
    }
}

impl<P> ShapeSpec<P> {
    pub fn with(params: P) -> Self {
        Self { name: None, params }
    }
}

pub type BoxSpec = ShapeSpec<BoxParams>;
pub type ConeSpec = ShapeSpec<ConeParams>;
pub type CylinderSpec = ShapeSpec<CylinderParams>;
pub type SphereSpec = ShapeSpec<SphereParams>;
pub type TorusSpec = ShapeSpec<TorusParams>;
pub type SketchSpec = ShapeSpec<SketchParams>;
pub type OpaqueSpec = ShapeSpec<OpaqueParams>;

/// Input to [`Document::cut`]. Omitted operands default to the last two objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutSpec {
    pub name: Option<String>,
    pub base: Option<OperandRef>,
    pub tool: Option<OperandRef>,
    pub refine: bool,
    pub placement: Placement,
    pub color: Option<Color>,
}

impl CutSpec {
    pub fn of(base: impl Into<OperandRef>, tool: impl Into<OperandRef>) -> Self {
        Self {
            base: Some(base.into()),
            tool: Some(tool.into()),
            ..Self::default()
        }
    }
}

/// Input to [`Document::fuse`] and [`Document::intersect`].
///
/// Lists shorter than two are padded with the last two objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiSpec {
    pub name: Option<String>,
    pub shapes: Vec<OperandRef>,
    pub refine: bool,
    pub placement: Placement,
    pub color: Option<Color>,
}

impl MultiSpec {
    pub fn of<R: Into<OperandRef>>(shapes: impl IntoIterator<Item = R>) -> Self {
        Self {
            shapes: shapes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

pub type FuseSpec = MultiSpec;
pub type IntersectSpec = MultiSpec;

#[derive(Debug, Clone, PartialEq)]
pub struct ExtrudeSpec {
    pub name: Option<String>,
    pub base: Option<OperandRef>,
    pub dir: [f64; 3],
    pub length_fwd: f64,
    pub length_rev: f64,
    pub solid: bool,
    pub placement: Placement,
    pub color: Option<Color>,
}

impl Default for ExtrudeSpec {
    fn default() -> Self {
        let defaults = ExtrusionParams::default();
        Self {
            name: None,
            base: None,
            dir: defaults.dir,
            length_fwd: defaults.length_fwd,
            length_rev: defaults.length_rev,
            solid: defaults.solid,
            placement: defaults.placement,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChamferSpec {
    pub name: Option<String>,
    pub base: Option<OperandRef>,
    pub edge: u32,
    pub dist: f64,
    pub placement: Placement,
    pub color: Option<Color>,
}

impl Default for ChamferSpec {
    fn default() -> Self {
        let defaults = ChamferParams::default();
        Self {
            name: None,
            base: None,
            edge: defaults.edge,
            dist: defaults.dist,
            placement: defaults.placement,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilletSpec {
    pub name: Option<String>,
    pub base: Option<OperandRef>,
    pub edge: u32,
    pub radius: f64,
    pub placement: Placement,
    pub color: Option<Color>,
}

impl Default for FilletSpec {
    fn default() -> Self {
        let defaults = FilletParams::default();
        Self {
            name: None,
            base: None,
            edge: defaults.edge,
            radius: defaults.radius,
            placement: defaults.placement,
            color: None,
        }
    }
}

/// Append a feature whose operands are already resolved names.
fn insert_feature(
    tx: &mut Transaction<'_>,
    name: Option<String>,
    mut parameters: Parameters,
) -> Result<String, DocumentError> {
    let kind = parameters.kind();
    let operands: Vec<String> = parameters
        .operands()
        .into_iter()
        .map(str::to_string)
        .collect();
    if let Some(missing) = operands.iter().find(|op| !tx.exists(op)) {
        return Err(DocumentError::UnknownOperand {
            reference: format!("{missing:?}"),
        });
    }

    // Inherited colors are copied, not linked.
    if kind.has_color() && parameters.color().is_none() {
        let inherited = operands
            .first()
            .and_then(|op| tx.get(op))
            .and_then(|object| object.color().cloned())
            .unwrap_or_default();
        let _ = parameters.set_color(Some(inherited));
    }

    parameters
        .validate()
        .map_err(|reason| SchemaError::InvalidParameters { kind, reason })?;

    let name = match name {
        Some(name) if !name.is_empty() => name,
        _ => tx.auto_name(kind.name_prefix()),
    };
    tx.add(FeatureObject::new(name.clone(), parameters))?;
    for operand in &operands {
        tx.set_visible(operand, false)?;
    }
    info!(name = %name, kind = %kind, operands = operands.len(), "added feature");
    Ok(name)
}

impl Document {
    /// Append a feature from a complete parameter record.
    ///
    /// Operand names must already exist; they are hidden like any builder's.
    pub fn add_feature(
        &mut self,
        name: Option<String>,
        parameters: Parameters,
    ) -> Result<String, DocumentError> {
        self.transact(|tx| insert_feature(tx, name, parameters))
    }

    pub fn add_box(&mut self, spec: BoxSpec) -> Result<String, DocumentError> {
        self.add_feature(spec.name, Parameters::Box(spec.params))
    }

    pub fn add_cone(&mut self, spec: ConeSpec) -> Result<String, DocumentError> {
        self.add_feature(spec.name, Parameters::Cone(spec.params))
    }

    pub fn add_cylinder(&mut self, spec: CylinderSpec) -> Result<String, DocumentError> {
        self.add_feature(spec.name, Parameters::Cylinder(spec.params))
    }

    pub fn add_sphere(&mut self, spec: SphereSpec) -> Result<String, DocumentError> {
        self.add_feature(spec.name, Parameters::Sphere(spec.params))
    }

    pub fn add_torus(&mut self, spec: TorusSpec) -> Result<String, DocumentError> {
        self.add_feature(spec.name, Parameters::Torus(spec.params))
    }

    pub fn add_sketch(&mut self, spec: SketchSpec) -> Result<String, DocumentError> {
        self.add_feature(spec.name, Parameters::Sketch(spec.params))
    }

    /// Wrap foreign geometry content (BREP, STEP, STL text) as an object.
    pub fn add_opaque(&mut self, spec: OpaqueSpec) -> Result<String, DocumentError> {
        self.add_feature(spec.name, Parameters::Opaque(spec.params))
    }

    /// Subtract `tool` from `base`.
    pub fn cut(&mut self, spec: CutSpec) -> Result<String, DocumentError> {
        self.transact(|tx| {
            let (base, tool) = resolve_binary(tx, spec.base.as_ref(), spec.tool.as_ref())?;
            let parameters = Parameters::Cut(CutParams {
                base,
                tool,
                refine: spec.refine,
                placement: spec.placement,
                color: spec.color,
            });
            insert_feature(tx, spec.name, parameters)
        })
    }

    /// Union of every listed shape.
    pub fn fuse(&mut self, spec: FuseSpec) -> Result<String, DocumentError> {
        self.transact(|tx| {
            let parameters = Parameters::Fuse(multi_params(tx, &spec)?);
            insert_feature(tx, spec.name, parameters)
        })
    }

    /// Common volume of the listed shapes.
    pub fn intersect(&mut self, spec: IntersectSpec) -> Result<String, DocumentError> {
        self.transact(|tx| {
            let parameters = Parameters::Intersection(multi_params(tx, &spec)?);
            insert_feature(tx, spec.name, parameters)
        })
    }

    pub fn extrude(&mut self, spec: ExtrudeSpec) -> Result<String, DocumentError> {
        self.transact(|tx| {
            let base = resolve_unary(tx, spec.base.as_ref())?;
            let parameters = Parameters::Extrusion(ExtrusionParams {
                base,
                dir: spec.dir,
                length_fwd: spec.length_fwd,
                length_rev: spec.length_rev,
                solid: spec.solid,
                placement: spec.placement,
                color: spec.color,
            });
            insert_feature(tx, spec.name, parameters)
        })
    }

    pub fn chamfer(&mut self, spec: ChamferSpec) -> Result<String, DocumentError> {
        self.transact(|tx| {
            let base = resolve_unary(tx, spec.base.as_ref())?;
            let parameters = Parameters::Chamfer(ChamferParams {
                base,
                edge: spec.edge,
                dist: spec.dist,
                placement: spec.placement,
                color: spec.color,
            });
            insert_feature(tx, spec.name, parameters)
        })
    }

    pub fn fillet(&mut self, spec: FilletSpec) -> Result<String, DocumentError> {
        self.transact(|tx| {
            let base = resolve_unary(tx, spec.base.as_ref())?;
            let parameters = Parameters::Fillet(FilletParams {
                base,
                edge: spec.edge,
                radius: spec.radius,
                placement: spec.placement,
                color: spec.color,
            });
            insert_feature(tx, spec.name, parameters)
        })
    }
}

fn multi_params(tx: &Transaction<'_>, spec: &MultiSpec) -> Result<MultiParams, DocumentError> {
    Ok(MultiParams {
        shapes: resolve_many(tx, &spec.shapes)?,
        refine: spec.refine,
        placement: spec.placement,
        color: spec.color.clone(),
    })
}
