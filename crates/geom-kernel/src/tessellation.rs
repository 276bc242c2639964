//! Tessellation wrapper over truck-meshalgo.
//!
//! Meshes each face separately and concatenates the results into one
//! RenderMesh, flipping faces whose orientation is reversed.

use crate::types::*;
use truck_meshalgo::prelude::*;
use truck_meshalgo::tessellation::{MeshableShape, MeshedShape};
use truck_modeling::topology::{Face, Shell, Solid};

#[derive(Default)]
struct MeshBuffers {
    vertices: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
}

impl MeshBuffers {
    fn append(&mut self, face_mesh: PolygonMesh, orientation: bool) {
        let face_mesh = if orientation {
            face_mesh
        } else {
            let mut m = face_mesh;
            m.invert();
            m
        };

        let base_vertex = (self.vertices.len() / 3) as u32;
        let positions = face_mesh.positions();
        let normals = face_mesh.normals();

        for pos in positions {
            self.vertices
                .extend_from_slice(&[pos[0] as f32, pos[1] as f32, pos[2] as f32]);
        }
        // Normals are attribute-indexed in truck; only take them when they line up.
        if normals.len() == positions.len() {
            for n in normals {
                self.normals
                    .extend_from_slice(&[n[0] as f32, n[1] as f32, n[2] as f32]);
            }
        } else {
            for _ in positions {
                self.normals.extend_from_slice(&[0.0, 0.0, 1.0]);
            }
        }
        for tri in face_mesh.tri_faces() {
            for v in tri.iter() {
                self.indices.push(v.pos as u32 + base_vertex);
            }
        }
    }

    fn finish(self) -> Result<RenderMesh, KernelError> {
        if self.indices.is_empty() {
            return Err(KernelError::TessellationFailed {
                reason: "no triangles produced".to_string(),
            });
        }
        Ok(RenderMesh {
            vertices: self.vertices,
            normals: self.normals,
            indices: self.indices,
        })
    }
}

fn check_tolerance(tolerance: f64) -> Result<(), KernelError> {
    if tolerance.is_finite() && tolerance > 0.0 {
        Ok(())
    } else {
        Err(KernelError::TessellationFailed {
            reason: format!("tolerance must be positive, got {tolerance}"),
        })
    }
}

/// Tessellate a truck Solid into a RenderMesh.
pub fn tessellate_solid(solid: &Solid, tolerance: f64) -> Result<RenderMesh, KernelError> {
    check_tolerance(tolerance)?;
    let meshed = solid.triangulation(tolerance);

    let mut buffers = MeshBuffers::default();
    for shell in meshed.boundaries().iter() {
        for face in shell.face_iter() {
            if let Some(face_mesh) = face.surface() {
                buffers.append(face_mesh, face.orientation());
            }
        }
    }

    if buffers.indices.is_empty() {
        // Fall back to meshing the whole solid as one polygon.
        let merged = meshed.to_polygon();
        buffers.append(merged, true);
    }
    buffers.finish()
}

/// Tessellate loose planar faces, such as an unextruded sketch.
pub fn tessellate_faces(faces: &[Face], tolerance: f64) -> Result<RenderMesh, KernelError> {
    check_tolerance(tolerance)?;
    let shell: Shell = faces.iter().cloned().collect();
    let meshed = shell.triangulation(tolerance);

    let mut buffers = MeshBuffers::default();
    for face in meshed.face_iter() {
        if let Some(face_mesh) = face.surface() {
            buffers.append(face_mesh, face.orientation());
        }
    }
    buffers.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives;

    #[test]
    fn box_mesh_is_closed_and_indexed() {
        let mesh = tessellate_solid(&primitives::make_box(1.0, 1.0, 1.0), 0.1).unwrap();
        assert!(mesh.triangle_count() >= 12);
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn zero_tolerance_is_rejected() {
        let solid = primitives::make_box(1.0, 1.0, 1.0);
        assert!(matches!(
            tessellate_solid(&solid, 0.0),
            Err(KernelError::TessellationFailed { .. })
        ));
    }

    #[test]
    fn disc_face_meshes() {
        let disc = primitives::make_disc([0.0, 0.0], 1.0).unwrap();
        let mesh = tessellate_faces(&[disc], 0.05).unwrap();
        assert!(!mesh.is_empty());
    }
}
