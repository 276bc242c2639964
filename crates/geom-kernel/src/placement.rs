//! Placement → rigid transform.

use feature_types::Placement;
use nalgebra::{Isometry3, Point3, Translation3, Unit, UnitQuaternion, Vector3};

/// The rigid transform of a placement: rotation about the axis through the
/// origin, then translation.
pub fn isometry(placement: &Placement) -> Isometry3<f64> {
    let translation = Translation3::new(
        placement.position[0],
        placement.position[1],
        placement.position[2],
    );
    Isometry3::from_parts(translation, rotation(placement))
}

pub fn rotation(placement: &Placement) -> UnitQuaternion<f64> {
    if !placement.has_rotation() {
        return UnitQuaternion::identity();
    }
    let axis = Unit::new_normalize(Vector3::from(placement.axis));
    UnitQuaternion::from_axis_angle(&axis, placement.angle.to_radians())
}

pub fn transform_point(placement: &Placement, p: [f64; 3]) -> [f64; 3] {
    let q = isometry(placement) * Point3::from(p);
    [q.x, q.y, q.z]
}

/// Transform an axis-aligned box and return the bounds of its eight corners.
pub fn transform_bounds(placement: &Placement, min: [f64; 3], max: [f64; 3]) -> ([f64; 3], [f64; 3]) {
    let iso = isometry(placement);
    let mut out_min = [f64::INFINITY; 3];
    let mut out_max = [f64::NEG_INFINITY; 3];
    for corner in 0..8 {
        let p = Point3::new(
            if corner & 1 == 0 { min[0] } else { max[0] },
            if corner & 2 == 0 { min[1] } else { max[1] },
            if corner & 4 == 0 { min[2] } else { max[2] },
        );
        let q = iso * p;
        for i in 0..3 {
            out_min[i] = out_min[i].min(q[i]);
            out_max[i] = out_max[i].max(q[i]);
        }
    }
    (out_min, out_max)
}
