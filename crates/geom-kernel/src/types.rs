use serde::{Deserialize, Serialize};

/// Opaque handle to a shape held by a kernel.
/// NEVER persisted. Valid only for the kernel instance that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeHandle(pub(crate) u64);

impl ShapeHandle {
    pub(crate) fn id(&self) -> u64 {
        self.0
    }
}

/// A primitive solid, dimensions in model units and angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Corner at the origin, extending along +X, +Y, +Z.
    Box { length: f64, width: f64, height: f64 },
    /// Base centred on the origin in the XY plane, extending along +Z.
    Cylinder { radius: f64, height: f64, angle: f64 },
    /// Like a cylinder with distinct bottom and top radii.
    Cone {
        radius1: f64,
        radius2: f64,
        height: f64,
        angle: f64,
    },
    /// Centred on the origin; latitude band `angle1..angle2`, longitude sweep `angle3`.
    Sphere {
        radius: f64,
        angle1: f64,
        angle2: f64,
        angle3: f64,
    },
    /// Centred on the origin around the Z axis.
    Torus {
        radius1: f64,
        radius2: f64,
        angle1: f64,
        angle2: f64,
        angle3: f64,
    },
}

impl Primitive {
    /// Reject dimensions no kernel can build.
    pub fn validate(&self) -> Result<(), KernelError> {
        let positive = |what: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(KernelError::InvalidParameter {
                    reason: format!("{what} must be positive, got {v}"),
                })
            }
        };
        let sweep = |v: f64| {
            if v.is_finite() && v > 0.0 && v <= 360.0 {
                Ok(())
            } else {
                Err(KernelError::InvalidParameter {
                    reason: format!("revolve angle must be in (0, 360], got {v}"),
                })
            }
        };
        match *self {
            Primitive::Box {
                length,
                width,
                height,
            } => {
                positive("length", length)?;
                positive("width", width)?;
                positive("height", height)
            }
            Primitive::Cylinder {
                radius,
                height,
                angle,
            } => {
                positive("radius", radius)?;
                positive("height", height)?;
                sweep(angle)
            }
            Primitive::Cone {
                radius1,
                radius2,
                height,
                angle,
            } => {
                if !(radius1 >= 0.0 && radius2 >= 0.0) || radius1.max(radius2) <= 0.0 {
                    return Err(KernelError::InvalidParameter {
                        reason: format!("cone radii must be non-negative and not both zero, got {radius1}, {radius2}"),
                    });
                }
                positive("height", height)?;
                sweep(angle)
            }
            Primitive::Sphere {
                radius,
                angle1,
                angle2,
                angle3,
            } => {
                positive("radius", radius)?;
                if !(-90.0..=90.0).contains(&angle1)
                    || !(-90.0..=90.0).contains(&angle2)
                    || angle1 >= angle2
                {
                    return Err(KernelError::InvalidParameter {
                        reason: format!("sphere latitude band {angle1}..{angle2} is empty or out of range"),
                    });
                }
                sweep(angle3)
            }
            Primitive::Torus {
                radius1,
                radius2,
                angle1,
                angle2,
                angle3,
            } => {
                positive("radius1", radius1)?;
                positive("radius2", radius2)?;
                if angle1 >= angle2 {
                    return Err(KernelError::InvalidParameter {
                        reason: format!("torus tube band {angle1}..{angle2} is empty"),
                    });
                }
                sweep(angle3)
            }
        }
    }

    /// Whether the primitive is a full revolution (no partial sweep or band).
    pub fn is_full(&self) -> bool {
        match *self {
            Primitive::Box { .. } => true,
            Primitive::Cylinder { angle, .. } | Primitive::Cone { angle, .. } => angle >= 360.0,
            Primitive::Sphere {
                angle1,
                angle2,
                angle3,
                ..
            } => angle1 <= -90.0 && angle2 >= 90.0 && angle3 >= 360.0,
            Primitive::Torus {
                angle1,
                angle2,
                angle3,
                ..
            } => angle2 - angle1 >= 360.0 && angle3 >= 360.0,
        }
    }
}

/// Boolean combination of two shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanOp {
    /// First minus second.
    Cut,
    Fuse,
    Common,
}

/// Errors from kernel operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("boolean {op:?} failed: {reason}")]
    BooleanFailed { op: BooleanOp, reason: String },

    #[error("edge {index} out of range, shape has {count} edges")]
    EdgeOutOfRange { index: u32, count: usize },

    #[error("fillet failed: {reason}")]
    FilletFailed { reason: String },

    #[error("chamfer failed: {reason}")]
    ChamferFailed { reason: String },

    #[error("import failed: {reason}")]
    ImportFailed { reason: String },

    #[error("tessellation failed: {reason}")]
    TessellationFailed { reason: String },

    #[error("shape not found: {id}")]
    ShapeNotFound { id: u64 },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },
}

/// Tessellated triangle mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderMesh {
    /// Flat array of vertex positions [x0, y0, z0, x1, y1, z1, ...].
    pub vertices: Vec<f32>,
    /// Flat array of vertex normals, same length as `vertices`.
    pub normals: Vec<f32>,
    /// Triangle indices into the vertex array.
    pub indices: Vec<u32>,
}

impl RenderMesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned bounds of the vertices as `(min, max)`.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut points = self.vertices.chunks_exact(3);
        let first = points.next()?;
        let mut min = [first[0], first[1], first[2]];
        let mut max = min;
        for p in points {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        Some((min, max))
    }
}

/// Volume and centroid of a shape, assuming unit density.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub volume: f64,
    pub center_of_mass: [f64; 3],
}
