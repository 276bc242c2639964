//! Property-based tests for placement and mock-kernel invariants.

use proptest::prelude::*;

use feature_types::Placement;
use geom_kernel::placement::{transform_bounds, transform_point};
use geom_kernel::{BooleanOp, Kernel, MockKernel, Primitive};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_point() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-1000.0f64..1000.0)
}

/// Axis with a length well away from zero.
fn arb_axis() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-1.0f64..1.0)
        .prop_filter("axis too short", |a| a.iter().map(|c| c * c).sum::<f64>() > 0.01)
}

fn arb_placement() -> impl Strategy<Value = Placement> {
    (arb_point(), arb_axis(), -360.0f64..360.0)
        .prop_map(|(position, axis, angle)| Placement::new(position, axis, angle))
}

fn arb_box() -> impl Strategy<Value = Primitive> {
    (0.1f64..100.0, 0.1f64..100.0, 0.1f64..100.0).prop_map(|(length, width, height)| {
        Primitive::Box {
            length,
            width,
            height,
        }
    })
}

const TOL: f64 = 1e-6;

fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}

// ---------------------------------------------------------------------------
// 1. Placements are rigid: distances are preserved.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn placement_preserves_distance(
        placement in arb_placement(),
        a in arb_point(),
        b in arb_point(),
    ) {
        let before = distance(a, b);
        let after = distance(transform_point(&placement, a), transform_point(&placement, b));
        prop_assert!((before - after).abs() < TOL * (1.0 + before),
            "distance changed from {} to {}", before, after);
    }
}

// ---------------------------------------------------------------------------
// 2. The origin always lands on the placement position.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn origin_maps_to_position(placement in arb_placement()) {
        let p = transform_point(&placement, [0.0; 3]);
        for i in 0..3 {
            prop_assert!((p[i] - placement.position[i]).abs() < TOL);
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Transformed bounds contain every transformed corner.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn transformed_bounds_contain_points(
        placement in arb_placement(),
        p in prop::array::uniform3(0.0f64..1.0),
    ) {
        let (min, max) = transform_bounds(&placement, [0.0; 3], [1.0; 3]);
        let q = transform_point(&placement, p);
        for i in 0..3 {
            prop_assert!(q[i] >= min[i] - TOL && q[i] <= max[i] + TOL);
        }
    }
}

// ---------------------------------------------------------------------------
// 4. Mock boolean volumes obey inclusion-exclusion.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn mock_boolean_volumes_are_consistent(
        a in arb_box(),
        b in arb_box(),
        offset in prop::array::uniform3(-50.0f64..50.0),
    ) {
        let mut kernel = MockKernel::new();
        let ha = kernel.build_primitive(&a).unwrap();
        let hb0 = kernel.build_primitive(&b).unwrap();
        let hb = kernel.transform(&hb0, &Placement::at(offset)).unwrap();

        let volume = |kernel: &mut MockKernel, op| {
            let h = kernel.combine(op, &ha, &hb).unwrap();
            kernel.mass_properties(&h).unwrap().volume
        };
        let va = kernel.mass_properties(&ha).unwrap().volume;
        let vb = kernel.mass_properties(&hb).unwrap().volume;
        let fuse = volume(&mut kernel, BooleanOp::Fuse);
        let cut = volume(&mut kernel, BooleanOp::Cut);
        let common = volume(&mut kernel, BooleanOp::Common);

        let scale = 1.0 + va + vb;
        prop_assert!((fuse + common - (va + vb)).abs() < TOL * scale);
        prop_assert!((cut + common - va).abs() < TOL * scale);
        prop_assert!(common <= va.min(vb) + TOL * scale);
    }
}
