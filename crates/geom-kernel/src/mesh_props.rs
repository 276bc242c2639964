//! Mass properties of a closed triangle mesh via signed tetrahedra.

use crate::types::{MassProperties, RenderMesh};

/// Integrate volume and centroid over the mesh's triangles.
///
/// Open or degenerate meshes (near-zero enclosed volume) report zero volume
/// and the vertex average as centre.
pub fn mesh_mass_properties(mesh: &RenderMesh) -> MassProperties {
    let point = |i: u32| -> [f64; 3] {
        let base = i as usize * 3;
        [
            f64::from(mesh.vertices[base]),
            f64::from(mesh.vertices[base + 1]),
            f64::from(mesh.vertices[base + 2]),
        ]
    };

    let mut volume = 0.0;
    let mut moment = [0.0; 3];
    for tri in mesh.indices.chunks_exact(3) {
        if tri.iter().any(|&i| i as usize >= mesh.vertex_count()) {
            continue;
        }
        let (a, b, c) = (point(tri[0]), point(tri[1]), point(tri[2]));
        let signed = dot(a, cross(b, c)) / 6.0;
        volume += signed;
        for k in 0..3 {
            moment[k] += signed * (a[k] + b[k] + c[k]) / 4.0;
        }
    }

    if volume.abs() < 1e-12 {
        return MassProperties {
            volume: 0.0,
            center_of_mass: vertex_average(mesh),
        };
    }
    MassProperties {
        volume: volume.abs(),
        center_of_mass: [moment[0] / volume, moment[1] / volume, moment[2] / volume],
    }
}

fn vertex_average(mesh: &RenderMesh) -> [f64; 3] {
    let n = mesh.vertex_count();
    if n == 0 {
        return [0.0; 3];
    }
    let mut sum = [0.0; 3];
    for p in mesh.vertices.chunks_exact(3) {
        for k in 0..3 {
            sum[k] += f64::from(p[k]);
        }
    }
    [sum[0] / n as f64, sum[1] / n as f64, sum[2] / n as f64]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Outward-facing tetrahedron with corners at the origin and unit axes.
    fn unit_tetra() -> RenderMesh {
        RenderMesh {
            vertices: vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0,
            ],
            normals: vec![0.0; 12],
            indices: vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3],
        }
    }

    #[test]
    fn tetra_volume_and_centroid() {
        let props = mesh_mass_properties(&unit_tetra());
        assert_relative_eq!(props.volume, 1.0 / 6.0, epsilon = 1e-9);
        for c in props.center_of_mass {
            assert_relative_eq!(c, 0.25, epsilon = 1e-9);
        }
    }

    #[test]
    fn open_mesh_falls_back_to_vertex_average() {
        let mut mesh = unit_tetra();
        mesh.indices = vec![0, 1, 2];
        let props = mesh_mass_properties(&mesh);
        assert_eq!(props.volume, 0.0);
        assert_relative_eq!(props.center_of_mass[0], 0.25, epsilon = 1e-9);
    }
}
