//! TruckKernel — real geometry kernel wrapping truck's API.

use std::collections::HashMap;

use feature_types::{Placement, SketchGeometry};
use tracing::debug;
// Import truck types selectively to avoid shadowing std::result::Result
use truck_modeling::builder;
use truck_modeling::topology::{Face, Solid};
use truck_modeling::{EuclideanSpace, InnerSpace, Point3, Rad, Vector3};

use crate::mesh_props::mesh_mass_properties;
use crate::primitives;
use crate::tessellation;
use crate::traits::Kernel;
use crate::types::*;

/// Boolean tolerance passed to truck-shapeops.
const BOOLEAN_TOLERANCE: f64 = 0.05;
/// Mesh tolerance used when integrating mass properties.
const MASS_TOLERANCE: f64 = 0.01;

#[derive(Clone)]
enum TruckShape {
    Solid(Solid),
    /// Planar faces from a sketch, awaiting extrusion.
    Faces(Vec<Face>),
}

/// Real geometry kernel backed by the truck BREP library.
///
/// Cones, partial revolutions, chamfers, fillets and file import are not
/// available in truck and report `NotSupported`.
#[derive(Default)]
pub struct TruckKernel {
    next_handle: u64,
    shapes: HashMap<u64, TruckShape>,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&mut self, shape: TruckShape) -> ShapeHandle {
        self.next_handle += 1;
        let handle = ShapeHandle(self.next_handle);
        self.shapes.insert(handle.id(), shape);
        handle
    }

    fn get(&self, handle: &ShapeHandle) -> Result<&TruckShape, KernelError> {
        self.shapes
            .get(&handle.id())
            .ok_or(KernelError::ShapeNotFound { id: handle.id() })
    }

    fn solid(&self, handle: &ShapeHandle) -> Result<&Solid, KernelError> {
        match self.get(handle)? {
            TruckShape::Solid(solid) => Ok(solid),
            TruckShape::Faces(_) => Err(KernelError::InvalidParameter {
                reason: "expected a solid, got sketch faces".to_string(),
            }),
        }
    }

    /// The truck solid behind a handle, for callers that need raw topology.
    pub fn get_solid(&self, handle: &ShapeHandle) -> Option<&Solid> {
        match self.shapes.get(&handle.id()) {
            Some(TruckShape::Solid(solid)) => Some(solid),
            _ => None,
        }
    }
}

fn not_supported(operation: impl Into<String>) -> KernelError {
    KernelError::NotSupported {
        operation: operation.into(),
    }
}

fn rotation_axis(placement: &Placement) -> Vector3 {
    Vector3::from(placement.axis).normalize()
}

fn place_solid(solid: &Solid, placement: &Placement) -> Solid {
    let rotated = if placement.has_rotation() {
        builder::rotated(
            solid,
            Point3::origin(),
            rotation_axis(placement),
            Rad(placement.angle.to_radians()),
        )
    } else {
        solid.clone()
    };
    builder::translated(&rotated, Vector3::from(placement.position))
}

fn place_face(face: &Face, placement: &Placement) -> Face {
    let rotated = if placement.has_rotation() {
        builder::rotated(
            face,
            Point3::origin(),
            rotation_axis(placement),
            Rad(placement.angle.to_radians()),
        )
    } else {
        face.clone()
    };
    builder::translated(&rotated, Vector3::from(placement.position))
}

impl Kernel for TruckKernel {
    fn build_primitive(&mut self, primitive: &Primitive) -> Result<ShapeHandle, KernelError> {
        primitive.validate()?;
        if !primitive.is_full() {
            return Err(not_supported("partial revolution"));
        }
        let solid = match *primitive {
            Primitive::Box {
                length,
                width,
                height,
            } => primitives::make_box(length, width, height),
            Primitive::Cylinder { radius, height, .. } => primitives::make_cylinder(radius, height)?,
            Primitive::Sphere { radius, .. } => primitives::make_sphere(radius)?,
            Primitive::Torus {
                radius1, radius2, ..
            } => primitives::make_torus(radius1, radius2)?,
            Primitive::Cone { .. } => return Err(not_supported("cone")),
        };
        debug!(?primitive, "built primitive");
        Ok(self.store(TruckShape::Solid(solid)))
    }

    fn build_sketch(
        &mut self,
        geometry: &[SketchGeometry],
        attachment: &Placement,
    ) -> Result<ShapeHandle, KernelError> {
        let faces = primitives::sketch_faces(geometry)?;
        if faces.is_empty() {
            return Err(KernelError::InvalidParameter {
                reason: "sketch has no closed profile".to_string(),
            });
        }
        let faces = faces.iter().map(|f| place_face(f, attachment)).collect();
        Ok(self.store(TruckShape::Faces(faces)))
    }

    fn import_shape(
        &mut self,
        content_type: &str,
        _content: &str,
    ) -> Result<ShapeHandle, KernelError> {
        Err(not_supported(format!("import of {content_type}")))
    }

    fn combine(
        &mut self,
        op: BooleanOp,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<ShapeHandle, KernelError> {
        let solid_a = self.solid(a)?.clone();
        let mut solid_b = self.solid(b)?.clone();

        let result = match op {
            BooleanOp::Fuse => truck_shapeops::or(&solid_a, &solid_b, BOOLEAN_TOLERANCE),
            BooleanOp::Common => truck_shapeops::and(&solid_a, &solid_b, BOOLEAN_TOLERANCE),
            BooleanOp::Cut => {
                // Subtraction = A ∩ ¬B. not() mutates in place.
                solid_b.not();
                truck_shapeops::and(&solid_a, &solid_b, BOOLEAN_TOLERANCE)
            }
        }
        .ok_or_else(|| KernelError::BooleanFailed {
            op,
            reason: "truck-shapeops returned no solid".to_string(),
        })?;
        debug!(?op, "combined solids");
        Ok(self.store(TruckShape::Solid(result)))
    }

    fn extrude(
        &mut self,
        base: &ShapeHandle,
        direction: [f64; 3],
        length_forward: f64,
        length_reverse: f64,
        _solid: bool,
    ) -> Result<ShapeHandle, KernelError> {
        let faces = match self.get(base)? {
            TruckShape::Faces(faces) => faces.clone(),
            TruckShape::Solid(_) => return Err(not_supported("extrusion of a solid")),
        };

        let dir = Vector3::from(direction);
        if dir.magnitude() < 1e-12 {
            return Err(KernelError::InvalidParameter {
                reason: "extrusion direction has zero length".to_string(),
            });
        }
        let total = length_forward + length_reverse;
        if !total.is_finite() || total.abs() < 1e-12 {
            return Err(KernelError::InvalidParameter {
                reason: "extrusion has zero length".to_string(),
            });
        }
        let dir = dir.normalize();

        // Closed profiles always sweep into solids here.
        let mut solids = faces.iter().map(|face| {
            let start = builder::translated(face, dir * -length_reverse);
            builder::tsweep(&start, dir * total)
        });
        let first = solids
            .next()
            .ok_or_else(|| KernelError::InvalidParameter {
                reason: "nothing to extrude".to_string(),
            })?;
        let mut result = first;
        for next in solids {
            result = truck_shapeops::or(&result, &next, BOOLEAN_TOLERANCE).ok_or_else(|| {
                KernelError::BooleanFailed {
                    op: BooleanOp::Fuse,
                    reason: "could not merge extruded profiles".to_string(),
                }
            })?;
        }
        Ok(self.store(TruckShape::Solid(result)))
    }

    fn chamfer(
        &mut self,
        _base: &ShapeHandle,
        _edge_index: u32,
        _distance: f64,
    ) -> Result<ShapeHandle, KernelError> {
        Err(not_supported("chamfer"))
    }

    fn fillet(
        &mut self,
        _base: &ShapeHandle,
        _edge_index: u32,
        _radius: f64,
    ) -> Result<ShapeHandle, KernelError> {
        Err(not_supported("fillet"))
    }

    fn transform(
        &mut self,
        shape: &ShapeHandle,
        placement: &Placement,
    ) -> Result<ShapeHandle, KernelError> {
        let placed = match self.get(shape)? {
            TruckShape::Solid(solid) => TruckShape::Solid(place_solid(solid, placement)),
            TruckShape::Faces(faces) => {
                TruckShape::Faces(faces.iter().map(|f| place_face(f, placement)).collect())
            }
        };
        Ok(self.store(placed))
    }

    fn triangulate(
        &mut self,
        shape: &ShapeHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        match self.get(shape)? {
            TruckShape::Solid(solid) => tessellation::tessellate_solid(solid, tolerance),
            TruckShape::Faces(faces) => tessellation::tessellate_faces(faces, tolerance),
        }
    }

    fn mass_properties(&mut self, shape: &ShapeHandle) -> Result<MassProperties, KernelError> {
        let mesh = self.triangulate(shape, MASS_TOLERANCE)?;
        Ok(mesh_mass_properties(&mesh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Primitive {
        Primitive::Box {
            length: 1.0,
            width: 1.0,
            height: 1.0,
        }
    }

    #[test]
    fn box_mass_properties() {
        let mut kernel = TruckKernel::new();
        let handle = kernel.build_primitive(&unit_box()).unwrap();
        let props = kernel.mass_properties(&handle).unwrap();
        assert!((props.volume - 1.0).abs() < 1e-3);
        for c in props.center_of_mass {
            assert!((c - 0.5).abs() < 1e-3);
        }
    }

    #[test]
    fn translation_moves_mesh_bounds() {
        let mut kernel = TruckKernel::new();
        let handle = kernel.build_primitive(&unit_box()).unwrap();
        let moved = kernel
            .transform(&handle, &Placement::at([10.0, 0.0, 0.0]))
            .unwrap();
        let (min, max) = kernel.triangulate(&moved, 0.1).unwrap().bounds().unwrap();
        assert!((min[0] - 10.0).abs() < 1e-4);
        assert!((max[0] - 11.0).abs() < 1e-4);
    }

    #[test]
    fn square_sketch_extrudes_to_a_box() {
        let mut kernel = TruckKernel::new();
        let square = [
            SketchGeometry::segment([0.0, 0.0], [2.0, 0.0]),
            SketchGeometry::segment([2.0, 0.0], [2.0, 2.0]),
            SketchGeometry::segment([2.0, 2.0], [0.0, 2.0]),
            SketchGeometry::segment([0.0, 2.0], [0.0, 0.0]),
        ];
        let sketch = kernel.build_sketch(&square, &Placement::default()).unwrap();
        let solid = kernel
            .extrude(&sketch, [0.0, 0.0, 1.0], 3.0, 0.0, true)
            .unwrap();
        let faces = kernel.get_solid(&solid).unwrap().boundaries()[0]
            .face_iter()
            .count();
        assert_eq!(faces, 6);
    }

    #[test]
    fn unsupported_operations_say_so() {
        let mut kernel = TruckKernel::new();
        let handle = kernel.build_primitive(&unit_box()).unwrap();
        assert!(matches!(
            kernel.fillet(&handle, 0, 0.1),
            Err(KernelError::NotSupported { .. })
        ));
        assert!(matches!(
            kernel.build_primitive(&Primitive::Cone {
                radius1: 1.0,
                radius2: 0.5,
                height: 1.0,
                angle: 360.0
            }),
            Err(KernelError::NotSupported { .. })
        ));
        assert!(matches!(
            kernel.import_shape("step", "ISO-10303-21;"),
            Err(KernelError::NotSupported { .. })
        ));
    }
}
