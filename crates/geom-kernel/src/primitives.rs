//! Higher-level primitive builders on top of truck's sweep API.
//!
//! truck has no built-in box/cylinder/sphere — everything is successive sweeps.

use std::f64::consts::PI;
use truck_modeling::builder;
use truck_modeling::topology::{Edge, Face, Solid, Vertex, Wire};
use truck_modeling::{EuclideanSpace, Point3, Rad, Vector3};

use crate::types::KernelError;
use feature_types::SketchGeometry;

fn face_error(what: &str, e: impl std::fmt::Display) -> KernelError {
    KernelError::InvalidParameter {
        reason: format!("failed to create {what} face: {e}"),
    }
}

/// Box with its corner at the origin, extending to (length, width, height).
pub fn make_box(length: f64, width: f64, height: f64) -> Solid {
    let v = builder::vertex(Point3::new(0.0, 0.0, 0.0));
    let edge = builder::tsweep(&v, Vector3::new(length, 0.0, 0.0));
    let face = builder::tsweep(&edge, Vector3::new(0.0, width, 0.0));
    builder::tsweep(&face, Vector3::new(0.0, 0.0, height))
}

/// Planar disc in the XY plane.
pub fn make_disc(center: [f64; 2], radius: f64) -> Result<Face, KernelError> {
    let v = builder::vertex(Point3::new(center[0] + radius, center[1], 0.0));
    let wire = builder::rsweep(
        &v,
        Point3::new(center[0], center[1], 0.0),
        Vector3::unit_z(),
        Rad(2.0 * PI),
    );
    builder::try_attach_plane(&[wire]).map_err(|e| face_error("circular", e))
}

/// Full cylinder: disc → translational sweep along +Z.
pub fn make_cylinder(radius: f64, height: f64) -> Result<Solid, KernelError> {
    let face = make_disc([0.0, 0.0], radius)?;
    Ok(builder::tsweep(&face, Vector3::new(0.0, 0.0, height)))
}

/// Full sphere centred on the origin: half-disc revolved about Z.
pub fn make_sphere(radius: f64) -> Result<Solid, KernelError> {
    // Arc from (r,0,0) through (0,0,r) to (-r,0,0) in the XZ plane.
    let v_right = builder::vertex(Point3::new(radius, 0.0, 0.0));
    let arc_wire = builder::rsweep(&v_right, Point3::origin(), Vector3::unit_y(), Rad(PI));

    let v_left = builder::vertex(Point3::new(-radius, 0.0, 0.0));
    let line_edge: Edge = builder::tsweep(&v_left, Vector3::new(2.0 * radius, 0.0, 0.0));

    let mut edges: Vec<Edge> = arc_wire.edge_iter().cloned().collect();
    edges.push(line_edge);
    let closed_wire = Wire::from_iter(edges);

    let face = builder::try_attach_plane(&[closed_wire]).map_err(|e| face_error("half-disc", e))?;
    Ok(builder::rsweep(&face, Point3::origin(), Vector3::unit_z(), Rad(2.0 * PI)))
}

/// Full torus around Z: tube cross-section in the XZ plane revolved about Z.
pub fn make_torus(major: f64, minor: f64) -> Result<Solid, KernelError> {
    let v = builder::vertex(Point3::new(major + minor, 0.0, 0.0));
    let section = builder::rsweep(
        &v,
        Point3::new(major, 0.0, 0.0),
        Vector3::unit_y(),
        Rad(2.0 * PI),
    );
    let face = builder::try_attach_plane(&[section]).map_err(|e| face_error("tube section", e))?;
    Ok(builder::rsweep(&face, Point3::origin(), Vector3::unit_z(), Rad(2.0 * PI)))
}

/// Planar faces for sketch geometry in the XY plane.
///
/// Each circle becomes a disc. Line segments must chain end-to-start into
/// a single closed loop, which becomes one polygonal face.
pub fn sketch_faces(geometry: &[SketchGeometry]) -> Result<Vec<Face>, KernelError> {
    let mut faces = Vec::new();
    let mut loop_points: Vec<[f64; 2]> = Vec::new();

    for item in geometry {
        match item {
            SketchGeometry::Circle(c) => faces.push(make_disc([c.center_x, c.center_y], c.radius)?),
            SketchGeometry::LineSegment(s) => {
                if let Some(last) = loop_points.last() {
                    if !same_point(*last, [s.start_x, s.start_y]) {
                        return Err(KernelError::InvalidParameter {
                            reason: "sketch segments do not form a chain".to_string(),
                        });
                    }
                } else {
                    loop_points.push([s.start_x, s.start_y]);
                }
                loop_points.push([s.end_x, s.end_y]);
            }
        }
    }

    if !loop_points.is_empty() {
        let closed = loop_points.len() >= 4
            && same_point(loop_points[0], loop_points[loop_points.len() - 1]);
        if !closed {
            return Err(KernelError::InvalidParameter {
                reason: "sketch segments do not close".to_string(),
            });
        }
        loop_points.pop();
        faces.push(polygon_face(&loop_points)?);
    }
    Ok(faces)
}

fn polygon_face(points: &[[f64; 2]]) -> Result<Face, KernelError> {
    // Shared vertices so consecutive edges meet.
    let vertices: Vec<Vertex> = points
        .iter()
        .map(|p| builder::vertex(Point3::new(p[0], p[1], 0.0)))
        .collect();
    let n = vertices.len();
    let wire: Wire = (0..n)
        .map(|i| builder::line(&vertices[i], &vertices[(i + 1) % n]))
        .collect();
    builder::try_attach_plane(&[wire]).map_err(|e| face_error("polygonal", e))
}

fn same_point(a: [f64; 2], b: [f64; 2]) -> bool {
    (a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9
}
