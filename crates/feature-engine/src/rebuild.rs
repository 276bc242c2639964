//! The evaluation pass: replay the document through a kernel.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, instrument, warn};

use feature_types::{Color, Parameters, ShapeMetadata};
use geom_kernel::{BooleanOp, Kernel, KernelError, Primitive, ShapeHandle};

use crate::config::EvaluationConfig;
use crate::document::DocumentState;
use crate::types::{FeatureObject, ReconstructionError};

/// One visible object in the output manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputItem {
    pub name: String,
    pub shape: ShapeHandle,
    pub color_rgb: [f64; 3],
}

/// Result of one evaluation pass.
///
/// Handles are only valid for the kernel the pass ran against.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    /// Every successfully built object, hidden ones included.
    pub cache: HashMap<String, ShapeHandle>,
    /// Visible objects, in stored order.
    pub manifest: Vec<OutputItem>,
    /// Objects that produced no geometry, in stored order.
    pub failures: Vec<ReconstructionError>,
    /// Mass properties, when requested.
    pub metadata: BTreeMap<String, ShapeMetadata>,
}

impl Evaluation {
    pub fn shape(&self, name: &str) -> Option<&ShapeHandle> {
        self.cache.get(name)
    }

    pub fn failure(&self, name: &str) -> Option<&ReconstructionError> {
        self.failures.iter().find(|f| f.object() == name)
    }

    pub fn failed(&self, name: &str) -> bool {
        self.failure(name).is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn visible_names(&self) -> impl Iterator<Item = &str> {
        self.manifest.iter().map(|item| item.name.as_str())
    }
}

/// Build every object in stored order.
///
/// Never fails as a whole: an object whose operands are missing or whose
/// kernel call errors is recorded in `failures` and the pass moves on.
#[instrument(skip_all, fields(objects = state.len()))]
pub fn evaluate(
    state: &DocumentState,
    kernel: &mut dyn Kernel,
    config: &EvaluationConfig,
) -> Evaluation {
    let mut evaluation = Evaluation::default();

    for object in state.objects() {
        let built = build_object(object, kernel, &evaluation.cache)
            .and_then(|shape| place(object, kernel, shape));

        let shape = match built {
            Ok(shape) => shape,
            Err(e) => {
                warn!(object = %object.name, error = %e, "object failed to evaluate");
                evaluation.failures.push(e);
                continue;
            }
        };

        if config.compute_metadata {
            match kernel.mass_properties(&shape) {
                Ok(props) => {
                    evaluation.metadata.insert(
                        object.name.clone(),
                        ShapeMetadata::new(props.volume, props.center_of_mass),
                    );
                }
                Err(e) => warn!(object = %object.name, error = %e, "mass properties unavailable"),
            }
        }

        if object.visible {
            let color_rgb = object
                .color()
                .and_then(Color::to_rgb)
                .unwrap_or(config.default_color);
            evaluation.manifest.push(OutputItem {
                name: object.name.clone(),
                shape: shape.clone(),
                color_rgb,
            });
        }
        debug!(object = %object.name, kind = %object.kind(), "evaluated");
        evaluation.cache.insert(object.name.clone(), shape);
    }

    info!(
        built = evaluation.cache.len(),
        visible = evaluation.manifest.len(),
        failed = evaluation.failures.len(),
        "evaluation finished"
    );
    evaluation
}

fn primitive(parameters: &Parameters) -> Option<Primitive> {
    Some(match parameters {
        Parameters::Box(p) => Primitive::Box {
            length: p.length,
            width: p.width,
            height: p.height,
        },
        Parameters::Cylinder(p) => Primitive::Cylinder {
            radius: p.radius,
            height: p.height,
            angle: p.angle,
        },
        Parameters::Cone(p) => Primitive::Cone {
            radius1: p.radius1,
            radius2: p.radius2,
            height: p.height,
            angle: p.angle,
        },
        Parameters::Sphere(p) => Primitive::Sphere {
            radius: p.radius,
            angle1: p.angle1,
            angle2: p.angle2,
            angle3: p.angle3,
        },
        Parameters::Torus(p) => Primitive::Torus {
            radius1: p.radius1,
            radius2: p.radius2,
            angle1: p.angle1,
            angle2: p.angle2,
            angle3: p.angle3,
        },
        _ => return None,
    })
}

/// Operand shapes the kind actually consumes. Intersection reads only its
/// first two entries.
fn inputs(
    object: &FeatureObject,
    cache: &HashMap<String, ShapeHandle>,
) -> Result<Vec<ShapeHandle>, ReconstructionError> {
    let operands = object.operands();
    let consumed = match object.parameters {
        Parameters::Intersection(_) => &operands[..operands.len().min(2)],
        _ => &operands[..],
    };
    consumed
        .iter()
        .map(|operand| {
            cache
                .get(*operand)
                .cloned()
                .ok_or_else(|| ReconstructionError::MissingOperand {
                    object: object.name.clone(),
                    operand: operand.to_string(),
                })
        })
        .collect()
}

fn build_object(
    object: &FeatureObject,
    kernel: &mut dyn Kernel,
    cache: &HashMap<String, ShapeHandle>,
) -> Result<ShapeHandle, ReconstructionError> {
    let shapes = inputs(object, cache)?;
    let kernel_error = |source: KernelError| ReconstructionError::Kernel {
        object: object.name.clone(),
        source,
    };

    if let Some(primitive) = primitive(&object.parameters) {
        return kernel.build_primitive(&primitive).map_err(kernel_error);
    }

    let result = match (&object.parameters, shapes.as_slice()) {
        (Parameters::Cut(_), [base, tool]) => kernel.combine(BooleanOp::Cut, base, tool),
        (Parameters::Fuse(_), [first, rest @ ..]) if !rest.is_empty() => {
            let mut acc = first.clone();
            for next in rest {
                acc = kernel.combine(BooleanOp::Fuse, &acc, next).map_err(kernel_error)?;
            }
            Ok(acc)
        }
        (Parameters::Intersection(_), [a, b]) => kernel.combine(BooleanOp::Common, a, b),
        (Parameters::Fuse(_) | Parameters::Intersection(_), _) => {
            return Err(ReconstructionError::InsufficientOperands {
                object: object.name.clone(),
                required: 2,
                available: shapes.len(),
            });
        }
        (Parameters::Extrusion(p), [base]) => {
            kernel.extrude(base, p.dir, p.length_fwd, p.length_rev, p.solid)
        }
        (Parameters::Chamfer(p), [base]) => kernel.chamfer(base, p.edge, p.dist),
        (Parameters::Fillet(p), [base]) => kernel.fillet(base, p.edge, p.radius),
        (Parameters::Sketch(p), []) => kernel.build_sketch(&p.geometry, &p.attachment_offset),
        (Parameters::Opaque(p), []) => kernel.import_shape(&p.content_type, &p.content),
        (_, _) => {
            return Err(ReconstructionError::InsufficientOperands {
                object: object.name.clone(),
                required: object.operands().len(),
                available: shapes.len(),
            });
        }
    };
    result.map_err(kernel_error)
}

fn place(
    object: &FeatureObject,
    kernel: &mut dyn Kernel,
    shape: ShapeHandle,
) -> Result<ShapeHandle, ReconstructionError> {
    let placement = object.parameters.placement();
    if placement.is_identity() {
        return Ok(shape);
    }
    kernel
        .transform(&shape, placement)
        .map_err(|source| ReconstructionError::Kernel {
            object: object.name.clone(),
            source,
        })
}
