use crate::types::*;
use feature_types::{Placement, SketchGeometry};

/// Core geometry kernel trait. Builds, combines, places and meshes shapes.
/// Implemented by TruckKernel (wraps real truck) and MockKernel (deterministic test double).
///
/// Every call may fail per shape; callers decide whether a failure is fatal.
pub trait Kernel {
    /// Build a primitive solid in its local frame.
    fn build_primitive(&mut self, primitive: &Primitive) -> Result<ShapeHandle, KernelError>;

    /// Build planar sketch geometry, positioned by the attachment offset.
    fn build_sketch(
        &mut self,
        geometry: &[SketchGeometry],
        attachment: &Placement,
    ) -> Result<ShapeHandle, KernelError>;

    /// Load foreign geometry. `content_type` is a format tag such as `"STEP"`.
    fn import_shape(&mut self, content_type: &str, content: &str)
        -> Result<ShapeHandle, KernelError>;

    /// Boolean combination of two shapes. Cut is `a` minus `b`.
    fn combine(
        &mut self,
        op: BooleanOp,
        a: &ShapeHandle,
        b: &ShapeHandle,
    ) -> Result<ShapeHandle, KernelError>;

    /// Sweep a profile along `direction`, `length_forward` ahead and
    /// `length_reverse` behind its plane.
    fn extrude(
        &mut self,
        base: &ShapeHandle,
        direction: [f64; 3],
        length_forward: f64,
        length_reverse: f64,
        solid: bool,
    ) -> Result<ShapeHandle, KernelError>;

    /// Bevel one edge, identified by its index in the shape's edge list.
    fn chamfer(
        &mut self,
        base: &ShapeHandle,
        edge_index: u32,
        distance: f64,
    ) -> Result<ShapeHandle, KernelError>;

    /// Round one edge, identified by its index in the shape's edge list.
    fn fillet(
        &mut self,
        base: &ShapeHandle,
        edge_index: u32,
        radius: f64,
    ) -> Result<ShapeHandle, KernelError>;

    /// Rotate about the placement axis through the origin, then translate.
    fn transform(
        &mut self,
        shape: &ShapeHandle,
        placement: &Placement,
    ) -> Result<ShapeHandle, KernelError>;

    /// Tessellate a shape to a triangle mesh.
    fn triangulate(&mut self, shape: &ShapeHandle, tolerance: f64)
        -> Result<RenderMesh, KernelError>;

    /// Volume and centre of mass.
    fn mass_properties(&mut self, shape: &ShapeHandle) -> Result<MassProperties, KernelError>;
}
