//! MockKernel — deterministic test double implementing Kernel.
//!
//! Shapes are kept as symbolic expression trees, so tests can compare the
//! exact sequence of kernel calls that produced a shape. Bounds, meshes and
//! mass properties are derived from the tree with simple closed forms.

use std::collections::HashMap;
use std::f64::consts::PI;

use feature_types::{Placement, SketchGeometry};

use crate::placement::{transform_bounds, transform_point};
use crate::traits::Kernel;
use crate::types::*;

/// Formats the mock accepts in `import_shape`.
pub const IMPORT_FORMATS: [&str; 3] = ["brep", "step", "stl"];

/// A symbolic shape: the tree of kernel calls that built it.
#[derive(Debug, Clone, PartialEq)]
pub enum MockShape {
    Primitive(Primitive),
    Sketch {
        geometry: Vec<SketchGeometry>,
        attachment: Placement,
    },
    Imported {
        content_type: String,
        size: usize,
    },
    Boolean {
        op: BooleanOp,
        a: Box<MockShape>,
        b: Box<MockShape>,
    },
    Extruded {
        base: Box<MockShape>,
        direction: [f64; 3],
        length_forward: f64,
        length_reverse: f64,
        solid: bool,
    },
    Chamfered {
        base: Box<MockShape>,
        edge: u32,
        distance: f64,
    },
    Filleted {
        base: Box<MockShape>,
        edge: u32,
        radius: f64,
    },
    Transformed {
        shape: Box<MockShape>,
        placement: Placement,
    },
}

type Bounds = ([f64; 3], [f64; 3]);

impl MockShape {
    /// Number of addressable edges, when known.
    ///
    /// Imported shapes report `None` and accept any edge index.
    pub fn edge_count(&self) -> Option<usize> {
        match self {
            MockShape::Primitive(p) => Some(match p {
                Primitive::Box { .. } => 12,
                Primitive::Cylinder { .. } => 3,
                Primitive::Cone { radius2, .. } if *radius2 == 0.0 => 2,
                Primitive::Cone { .. } => 3,
                Primitive::Sphere { .. } => 3,
                Primitive::Torus { .. } => 2,
            }),
            MockShape::Sketch { geometry, .. } => Some(geometry.len()),
            MockShape::Imported { .. } => None,
            MockShape::Boolean { a, b, .. } => Some(a.edge_count()? + b.edge_count()?),
            MockShape::Extruded { base, .. } => Some(base.edge_count()? * 3),
            // One edge is replaced by two boundary edges of the new face.
            MockShape::Chamfered { base, .. } | MockShape::Filleted { base, .. } => {
                Some(base.edge_count()? + 1)
            }
            MockShape::Transformed { shape, .. } => shape.edge_count(),
        }
    }

    /// Axis-aligned bounds, `None` for an empty result.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            MockShape::Primitive(p) => Some(primitive_bounds(p)),
            MockShape::Sketch {
                geometry,
                attachment,
            } => {
                let mut items = geometry.iter().map(|g| g.bounds());
                let (mut min, mut max) = items.next()?;
                for (lo, hi) in items {
                    for i in 0..2 {
                        min[i] = min[i].min(lo[i]);
                        max[i] = max[i].max(hi[i]);
                    }
                }
                Some(transform_bounds(
                    attachment,
                    [min[0], min[1], 0.0],
                    [max[0], max[1], 0.0],
                ))
            }
            MockShape::Imported { .. } => Some(([0.0; 3], [1.0; 3])),
            MockShape::Boolean { op, a, b } => {
                let (ba, bb) = (a.bounds(), b.bounds());
                match op {
                    BooleanOp::Cut => ba,
                    BooleanOp::Fuse => match (ba, bb) {
                        (Some(x), Some(y)) => Some(union_bounds(x, y)),
                        (x, y) => x.or(y),
                    },
                    BooleanOp::Common => intersect_bounds(ba?, bb?),
                }
            }
            MockShape::Extruded {
                base,
                direction,
                length_forward,
                length_reverse,
                ..
            } => {
                let (min, max) = base.bounds()?;
                let dir = normalized(*direction)?;
                let fwd = scale(dir, *length_forward);
                let rev = scale(dir, -*length_reverse);
                let mut out = (min, max);
                for offset in [fwd, rev] {
                    out = union_bounds(out, (add(min, offset), add(max, offset)));
                }
                Some(out)
            }
            MockShape::Chamfered { base, .. } | MockShape::Filleted { base, .. } => base.bounds(),
            MockShape::Transformed { shape, placement } => {
                let (min, max) = shape.bounds()?;
                Some(transform_bounds(placement, min, max))
            }
        }
    }

    /// Enclosed volume. Booleans treat each operand as filling its bounds
    /// where they overlap, which is exact for axis-aligned boxes.
    pub fn volume(&self) -> f64 {
        match self {
            MockShape::Primitive(p) => primitive_volume(p),
            MockShape::Sketch { .. } | MockShape::Imported { .. } => 0.0,
            MockShape::Boolean { op, a, b } => {
                let (va, vb) = (a.volume(), b.volume());
                let overlap = match (a.bounds(), b.bounds()) {
                    (Some(x), Some(y)) => intersect_bounds(x, y)
                        .map(bounds_volume)
                        .unwrap_or(0.0)
                        .min(va)
                        .min(vb),
                    _ => 0.0,
                };
                match op {
                    BooleanOp::Cut => (va - overlap).max(0.0),
                    BooleanOp::Fuse => va + vb - overlap,
                    BooleanOp::Common => overlap,
                }
            }
            MockShape::Extruded {
                base,
                length_forward,
                length_reverse,
                solid,
                ..
            } => match base.as_ref() {
                MockShape::Sketch { geometry, .. } if *solid => {
                    sketch_area(geometry) * (length_forward + length_reverse).abs()
                }
                MockShape::Sketch { .. } => 0.0,
                other => other.volume(),
            },
            MockShape::Chamfered { base, .. } | MockShape::Filleted { base, .. } => base.volume(),
            MockShape::Transformed { shape, .. } => shape.volume(),
        }
    }

    /// Centre of mass, taken as the centre of the bounds except for
    /// transformed shapes, whose inner centre is carried through the placement.
    pub fn center_of_mass(&self) -> [f64; 3] {
        match self {
            MockShape::Transformed { shape, placement } => {
                transform_point(placement, shape.center_of_mass())
            }
            other => other
                .bounds()
                .map(|(min, max)| scale(add(min, max), 0.5))
                .unwrap_or([0.0; 3]),
        }
    }
}

fn primitive_bounds(p: &Primitive) -> Bounds {
    match *p {
        Primitive::Box {
            length,
            width,
            height,
        } => ([0.0; 3], [length, width, height]),
        Primitive::Cylinder { radius, height, .. } => {
            ([-radius, -radius, 0.0], [radius, radius, height])
        }
        Primitive::Cone {
            radius1,
            radius2,
            height,
            ..
        } => {
            let r = radius1.max(radius2);
            ([-r, -r, 0.0], [r, r, height])
        }
        Primitive::Sphere { radius, .. } => ([-radius; 3], [radius; 3]),
        Primitive::Torus {
            radius1, radius2, ..
        } => {
            let r = radius1 + radius2;
            ([-r, -r, -radius2], [r, r, radius2])
        }
    }
}

fn primitive_volume(p: &Primitive) -> f64 {
    match *p {
        Primitive::Box {
            length,
            width,
            height,
        } => length * width * height,
        Primitive::Cylinder {
            radius,
            height,
            angle,
        } => PI * radius * radius * height * angle / 360.0,
        Primitive::Cone {
            radius1,
            radius2,
            height,
            angle,
        } => {
            PI * height * (radius1 * radius1 + radius1 * radius2 + radius2 * radius2) / 3.0 * angle
                / 360.0
        }
        Primitive::Sphere {
            radius,
            angle1,
            angle2,
            angle3,
        } => {
            let band = angle2.to_radians().sin() - angle1.to_radians().sin();
            angle3.to_radians() / 3.0 * radius.powi(3) * band
        }
        Primitive::Torus {
            radius1,
            radius2,
            angle3,
            ..
        } => 2.0 * PI * PI * radius1 * radius2 * radius2 * angle3 / 360.0,
    }
}

fn sketch_area(geometry: &[SketchGeometry]) -> f64 {
    let circles: f64 = geometry
        .iter()
        .filter_map(|g| match g {
            SketchGeometry::Circle(c) => Some(PI * c.radius * c.radius),
            SketchGeometry::LineSegment(_) => None,
        })
        .sum();
    // Shoelace over the segment chain; zero when there are no segments.
    let polygon: f64 = geometry
        .iter()
        .filter_map(|g| match g {
            SketchGeometry::LineSegment(s) => Some(s.start_x * s.end_y - s.end_x * s.start_y),
            SketchGeometry::Circle(_) => None,
        })
        .sum::<f64>()
        .abs()
        / 2.0;
    circles + polygon
}

fn union_bounds(a: Bounds, b: Bounds) -> Bounds {
    let mut out = a;
    for i in 0..3 {
        out.0[i] = out.0[i].min(b.0[i]);
        out.1[i] = out.1[i].max(b.1[i]);
    }
    out
}

fn intersect_bounds(a: Bounds, b: Bounds) -> Option<Bounds> {
    let mut out = a;
    for i in 0..3 {
        out.0[i] = a.0[i].max(b.0[i]);
        out.1[i] = a.1[i].min(b.1[i]);
        if out.0[i] > out.1[i] {
            return None;
        }
    }
    Some(out)
}

fn bounds_volume((min, max): Bounds) -> f64 {
    (max[0] - min[0]) * (max[1] - min[1]) * (max[2] - min[2])
}

fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn scale(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

fn normalized(v: [f64; 3]) -> Option<[f64; 3]> {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len.is_finite() && len > 1e-12 {
        Some(scale(v, 1.0 / len))
    } else {
        None
    }
}

/// Deterministic test double for the geometry kernel.
#[derive(Debug, Default)]
pub struct MockKernel {
    next_handle: u64,
    shapes: HashMap<u64, MockShape>,
    /// Number of kernel calls made, by operation name.
    calls: HashMap<&'static str, usize>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The expression tree behind a handle.
    pub fn shape(&self, handle: &ShapeHandle) -> Option<&MockShape> {
        self.shapes.get(&handle.id())
    }

    /// How many times `operation` (a `Kernel` method name) was called.
    pub fn call_count(&self, operation: &str) -> usize {
        self.calls.get(operation).copied().unwrap_or(0)
    }

    fn record(&mut self, operation: &'static str) {
        *self.calls.entry(operation).or_default() += 1;
    }

    fn store(&mut self, shape: MockShape) -> ShapeHandle {
        self.next_handle += 1;
        let handle = ShapeHandle(self.next_handle);
        self.shapes.insert(handle.id(), shape);
        handle
    }

    fn get(&self, handle: &ShapeHandle) -> Result<&MockShape, KernelError> {
        self.shapes
            .get(&handle.id())
            .ok_or(KernelError::ShapeNotFound { id: handle.id() })
    }

    fn check_edge(shape: &MockShape, edge: u32) -> Result<(), KernelError> {
        match shape.edge_count() {
            Some(count) if edge as usize >= count => {
                Err(KernelError::EdgeOutOfRange { index: edge, count })
            }
            _ => Ok(()),
        }
    }

    /// Generate a deterministic mesh of the shape's bounds: 2 triangles per
    /// face, 4 vertices per face.
    fn tessellate_bounds((min, max): Bounds) -> RenderMesh {
        // (axis, side) pairs; side 0 is the min plane.
        let faces = [(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)];
        let mut mesh = RenderMesh::default();

        for (axis, side) in faces {
            let base_vertex = mesh.vertex_count() as u32;
            let (u, v) = ((axis + 1) % 3, (axis + 2) % 3);
            let plane = if side == 0 { min[axis] } else { max[axis] };
            let mut normal = [0.0f32; 3];
            normal[axis] = if side == 0 { -1.0 } else { 1.0 };

            let mut corners = [[0.0; 3]; 4];
            for (k, (cu, cv)) in [(0, 0), (1, 0), (1, 1), (0, 1)].into_iter().enumerate() {
                corners[k][axis] = plane;
                corners[k][u] = if cu == 0 { min[u] } else { max[u] };
                corners[k][v] = if cv == 0 { min[v] } else { max[v] };
            }
            for c in corners {
                mesh.vertices
                    .extend_from_slice(&[c[0] as f32, c[1] as f32, c[2] as f32]);
                mesh.normals.extend_from_slice(&normal);
            }

            // (u, v, axis) is right-handed, so 0-1-2 faces +axis.
            let quad = if side == 1 {
                [0, 1, 2, 0, 2, 3]
            } else {
                [0, 2, 1, 0, 3, 2]
            };
            mesh.indices
                .extend(quad.iter().map(|i| base_vertex + i));
        }
        mesh
    }
}

impl Kernel for MockKernel {
    fn build_primitive(&mut self, primitive: &Primitive) -> Result<ShapeHandle, KernelError> {
        self.record("build_primitive");
        primitive.validate()?;
        Ok(self.store(MockShape::Primitive(*primitive)))
    }

    fn build_sketch(
        &mut self,
        geometry: &[SketchGeometry],
        attachment: &Placement,
    ) -> Result<ShapeHandle, KernelError> {
        self.record("build_sketch");
        Ok(self.store(MockShape::Sketch {
            geometry: geometry.to_vec(),
            attachment: *attachment,
        }))
    }

    fn import_shape(
        &mut self,
        content_type: &str,
        content: &str,
    ) -> Result<ShapeHandle, KernelError> {
        self.record("import_shape");
        let content_type = content_type.to_ascii_lowercase();
        if !IMPORT_FORMATS.contains(&content_type.as_str()) {
            return Err(KernelError::NotSupported {
                operation: format!("import of {content_type}"),
            });
        }
        if content.trim().is_empty() {
            return Err(KernelError::ImportFailed {
                reason: "content is empty".to_string(),
            });
        }
        Ok(self.store(MockShape::Imported {
            content_type,
            size: content.len(),
        }))
    }

    fn combine(
        &mut self,
        op: BooleanOp,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<ShapeHandle, KernelError> {
        self.record("combine");
        let a = self.get(a)?.clone();
        let b = self.get(b)?.clone();
        Ok(self.store(MockShape::Boolean {
            op,
            a: Box::new(a),
            b: Box::new(b),
        }))
    }

    fn extrude(
        &mut self,
        base: &ShapeHandle,
        direction: [f64; 3],
        length_forward: f64,
        length_reverse: f64,
        solid: bool,
    ) -> Result<ShapeHandle, KernelError> {
        self.record("extrude");
        let base = self.get(base)?.clone();
        if normalized(direction).is_none() {
            return Err(KernelError::InvalidParameter {
                reason: "extrusion direction has zero length".to_string(),
            });
        }
        let total = length_forward + length_reverse;
        if !total.is_finite() || total == 0.0 {
            return Err(KernelError::InvalidParameter {
                reason: "extrusion has zero length".to_string(),
            });
        }
        Ok(self.store(MockShape::Extruded {
            base: Box::new(base),
            direction,
            length_forward,
            length_reverse,
            solid,
        }))
    }

    fn chamfer(
        &mut self,
        base: &ShapeHandle,
        edge_index: u32,
        distance: f64,
    ) -> Result<ShapeHandle, KernelError> {
        self.record("chamfer");
        if !(distance.is_finite() && distance > 0.0) {
            return Err(KernelError::ChamferFailed {
                reason: "distance must be positive".to_string(),
            });
        }
        let base = self.get(base)?.clone();
        Self::check_edge(&base, edge_index)?;
        Ok(self.store(MockShape::Chamfered {
            base: Box::new(base),
            edge: edge_index,
            distance,
        }))
    }

    fn fillet(
        &mut self,
        base: &ShapeHandle,
        edge_index: u32,
        radius: f64,
    ) -> Result<ShapeHandle, KernelError> {
        self.record("fillet");
        if !(radius.is_finite() && radius > 0.0) {
            return Err(KernelError::FilletFailed {
                reason: "radius must be positive".to_string(),
            });
        }
        let base = self.get(base)?.clone();
        Self::check_edge(&base, edge_index)?;
        Ok(self.store(MockShape::Filleted {
            base: Box::new(base),
            edge: edge_index,
            radius,
        }))
    }

    fn transform(
        &mut self,
        shape: &ShapeHandle,
        placement: &Placement,
    ) -> Result<ShapeHandle, KernelError> {
        self.record("transform");
        let inner = self.get(shape)?.clone();
        if placement.is_identity() {
            return Ok(self.store(inner));
        }
        Ok(self.store(MockShape::Transformed {
            shape: Box::new(inner),
            placement: *placement,
        }))
    }

    fn triangulate(
        &mut self,
        shape: &ShapeHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        self.record("triangulate");
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(KernelError::TessellationFailed {
                reason: format!("tolerance must be positive, got {tolerance}"),
            });
        }
        let bounds = self
            .get(shape)?
            .bounds()
            .ok_or_else(|| KernelError::TessellationFailed {
                reason: "shape is empty".to_string(),
            })?;
        Ok(Self::tessellate_bounds(bounds))
    }

    fn mass_properties(&mut self, shape: &ShapeHandle) -> Result<MassProperties, KernelError> {
        self.record("mass_properties");
        let shape = self.get(shape)?;
        Ok(MassProperties {
            volume: shape.volume(),
            center_of_mass: shape.center_of_mass(),
        })
    }
}
