use feature_engine::*;
use feature_types::{
    BoxParams, Color, CylinderParams, Parameters, Placement, SketchGeometry, SketchParams,
};
use geom_kernel::{BooleanOp, Kernel, MockKernel, Primitive};

fn unit_box() -> Primitive {
    Primitive::Box {
        length: 1.0,
        width: 1.0,
        height: 1.0,
    }
}

fn box_and_cylinder() -> Document {
    let mut doc = Document::new();
    doc.add_box(BoxSpec::named("B1")).unwrap();
    doc.add_cylinder(CylinderSpec::named("C1")).unwrap();
    doc
}

fn shapes_of(doc: &Document, name: &str) -> Vec<String> {
    match &doc.get(name).unwrap().parameters {
        Parameters::Fuse(p) | Parameters::Intersection(p) => p.shapes.clone(),
        other => panic!("{name} is not a multi-shape feature: {other:?}"),
    }
}

// ── Builder Tests ──────────────────────────────────────────────────────────

#[test]
fn fuse_defaults_to_last_two_and_hides_them() {
    let mut doc = box_and_cylinder();
    let fuse = doc.fuse(FuseSpec::default()).unwrap();

    assert_eq!(fuse, "Fuse 1");
    assert_eq!(shapes_of(&doc, &fuse), ["B1", "C1"]);
    assert!(!doc.get("B1").unwrap().visible);
    assert!(!doc.get("C1").unwrap().visible);
    assert!(doc.get(&fuse).unwrap().visible);
}

#[test]
fn short_fuse_lists_are_padded_in_position_order() {
    let mut doc = box_and_cylinder();
    doc.add_sphere(SphereSpec::named("S1")).unwrap();

    let fuse = doc.fuse(FuseSpec::of(["B1"])).unwrap();
    assert_eq!(shapes_of(&doc, &fuse), ["B1", "S1"]);
    assert!(doc.get("C1").unwrap().visible);
}

#[test]
fn binary_builders_need_two_objects() {
    let mut doc = Document::new();
    doc.add_box(BoxSpec::named("B1")).unwrap();

    let expected = DocumentError::InsufficientOperands {
        required: 2,
        available: 1,
    };
    assert_eq!(doc.cut(CutSpec::default()), Err(expected.clone()));
    assert_eq!(doc.fuse(FuseSpec::default()), Err(expected.clone()));
    assert_eq!(doc.intersect(IntersectSpec::default()), Err(expected));
    assert_eq!(doc.len(), 1);
    assert!(doc.get("B1").unwrap().visible);
}

#[test]
fn unknown_operands_are_rejected() {
    let mut doc = box_and_cylinder();
    assert!(matches!(
        doc.cut(CutSpec::of("B1", "Nope")),
        Err(DocumentError::UnknownOperand { .. })
    ));
    assert!(matches!(
        doc.cut(CutSpec::of(0, 7)),
        Err(DocumentError::UnknownOperand { .. })
    ));
    assert_eq!(doc.len(), 2);
}

#[test]
fn index_operands_resolve_against_the_current_sequence() {
    let mut doc = box_and_cylinder();
    doc.add_sphere(SphereSpec::named("S1")).unwrap();

    let cut = doc.cut(CutSpec::of(0, -1)).unwrap();
    assert_eq!(doc.dependencies(&cut).unwrap(), ["B1", "S1"]);
    assert!(doc.get("C1").unwrap().visible);
}

#[test]
fn inherited_color_is_a_snapshot() {
    let mut doc = box_and_cylinder();
    doc.set_color("B1", "#FF0000").unwrap();
    let cut = doc.cut(CutSpec::default()).unwrap();
    assert_eq!(doc.get(&cut).unwrap().color(), Some(&Color::hex("#FF0000")));

    doc.set_color("B1", "#0000FF").unwrap();
    assert_eq!(doc.get(&cut).unwrap().color(), Some(&Color::hex("#FF0000")));
}

#[test]
fn explicit_color_wins_over_inheritance() {
    let mut doc = box_and_cylinder();
    doc.set_color("B1", "#FF0000").unwrap();
    let cut = doc
        .cut(CutSpec {
            color: Some(Color::Rgb([0.0, 1.0, 0.0])),
            ..CutSpec::default()
        })
        .unwrap();
    assert_eq!(
        doc.get(&cut).unwrap().color(),
        Some(&Color::Rgb([0.0, 1.0, 0.0]))
    );
}

#[test]
fn names_stay_unique_through_edits() {
    let mut doc = Document::new();
    for _ in 0..3 {
        doc.add_box(BoxSpec::default()).unwrap();
    }
    doc.remove("Box 2");
    assert_eq!(doc.add_box(BoxSpec::default()).unwrap(), "Box 2");
    doc.rename("Box 1", "Box 4").unwrap();
    assert_eq!(doc.add_box(BoxSpec::default()).unwrap(), "Box 1");

    let mut names: Vec<_> = doc.names().collect();
    let count = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), count);
}

// ── Evaluation Tests ───────────────────────────────────────────────────────

#[test]
fn cut_matches_direct_kernel_calls() {
    let mut doc = box_and_cylinder();
    let placement = Placement::new([5.0, 0.0, 0.0], [0.0, 0.0, 1.0], 45.0);
    let cut = doc
        .cut(CutSpec {
            placement,
            ..CutSpec::of("B1", "C1")
        })
        .unwrap();

    let mut kernel = MockKernel::new();
    let eval = evaluate(&doc, &mut kernel, &EvaluationConfig::default());
    assert!(eval.is_clean());

    let mut direct = MockKernel::new();
    let a = direct.build_primitive(&unit_box()).unwrap();
    let cylinder = CylinderParams::default();
    let b = direct
        .build_primitive(&Primitive::Cylinder {
            radius: cylinder.radius,
            height: cylinder.height,
            angle: cylinder.angle,
        })
        .unwrap();
    let combined = direct.combine(BooleanOp::Cut, &a, &b).unwrap();
    let expected = direct.transform(&combined, &placement).unwrap();

    assert_eq!(
        kernel.shape(eval.shape(&cut).unwrap()),
        direct.shape(&expected)
    );
    assert_eq!(eval.visible_names().collect::<Vec<_>>(), [cut.as_str()]);
}

#[test]
fn removed_operand_fails_only_its_dependants() {
    let mut doc = box_and_cylinder();
    doc.fuse(FuseSpec::default()).unwrap();
    doc.add_sphere(SphereSpec::named("S1")).unwrap();
    doc.remove("B1");

    let mut kernel = MockKernel::new();
    let eval = evaluate(&doc, &mut kernel, &EvaluationConfig::default());
    assert_eq!(
        eval.failure("Fuse 1"),
        Some(&ReconstructionError::MissingOperand {
            object: "Fuse 1".into(),
            operand: "B1".into(),
        })
    );
    assert!(eval.shape("C1").is_some());
    assert!(eval.shape("S1").is_some());
    assert_eq!(eval.visible_names().collect::<Vec<_>>(), ["S1"]);
}

#[test]
fn rename_does_not_cascade() {
    let mut doc = box_and_cylinder();
    doc.fuse(FuseSpec::default()).unwrap();
    doc.rename("B1", "Base").unwrap();

    assert_eq!(shapes_of(&doc, "Fuse 1"), ["B1", "C1"]);
    assert_eq!(doc.names().last(), Some("Base"));
    assert_eq!(doc.dangling_operands().len(), 1);

    let mut kernel = MockKernel::new();
    let eval = evaluate(&doc, &mut kernel, &EvaluationConfig::default());
    assert!(matches!(
        eval.failure("Fuse 1"),
        Some(ReconstructionError::MissingOperand { operand, .. }) if operand == "B1"
    ));
    assert!(eval.shape("Base").is_some());
}

#[test]
fn kernel_failures_are_contained() {
    let mut doc = Document::new();
    doc.add_box(BoxSpec::with(BoxParams {
        length: -1.0,
        ..BoxParams::default()
    }))
    .unwrap();
    doc.add_box(BoxSpec::named("Good")).unwrap();
    doc.fillet(FilletSpec {
        base: Some("Good".into()),
        edge: 99,
        ..FilletSpec::default()
    })
    .unwrap();

    let mut kernel = MockKernel::new();
    let eval = evaluate(&doc, &mut kernel, &EvaluationConfig::default());
    assert_eq!(eval.failures.len(), 2);
    assert!(matches!(
        eval.failure("Box 1"),
        Some(ReconstructionError::Kernel { .. })
    ));
    assert!(matches!(
        eval.failure("Fillet 1"),
        Some(ReconstructionError::Kernel { .. })
    ));
    assert!(eval.shape("Good").is_some());
}

#[test]
fn sketch_extrudes_through_the_kernel() {
    let mut doc = Document::new();
    doc.add_sketch(SketchSpec::with(SketchParams {
        geometry: vec![SketchGeometry::circle([0.0, 0.0], 2.0)],
        ..SketchParams::default()
    }))
    .unwrap();
    let extrusion = doc
        .extrude(ExtrudeSpec {
            length_fwd: 4.0,
            solid: true,
            ..ExtrudeSpec::default()
        })
        .unwrap();

    assert!(!doc.get("Sketch 1").unwrap().visible);
    let mut kernel = MockKernel::new();
    let eval = evaluate(&doc, &mut kernel, &EvaluationConfig::default());
    assert!(eval.is_clean());
    assert_eq!(kernel.call_count("build_sketch"), 1);
    assert_eq!(kernel.call_count("extrude"), 1);
    assert_eq!(eval.manifest.len(), 1);
    assert_eq!(eval.manifest[0].name, extrusion);
}

#[test]
fn evaluation_is_stateless_across_calls() {
    let doc = box_and_cylinder();
    let mut kernel = MockKernel::new();
    let first = evaluate(&doc, &mut kernel, &EvaluationConfig::default());
    let second = evaluate(&doc, &mut kernel, &EvaluationConfig::default());
    assert_eq!(kernel.call_count("build_primitive"), 4);
    assert_eq!(first.manifest.len(), second.manifest.len());
}

#[test]
fn recorded_metadata_positions_annotations() {
    let mut doc = Document::new();
    let mut spec = BoxSpec::named("B1");
    spec.params.placement = Placement::at([10.0, 0.0, 0.0]);
    doc.add_box(spec).unwrap();

    let mut kernel = MockKernel::new();
    let eval = evaluate(&doc, &mut kernel, &EvaluationConfig::with_metadata());
    assert_eq!(doc.record_metadata(&eval), 1);

    let metadata = doc.get("B1").unwrap().metadata.clone().unwrap();
    approx::assert_relative_eq!(metadata.mass, 1.0, epsilon = 1e-9);
    approx::assert_relative_eq!(metadata.center_of_mass[0], 10.5, epsilon = 1e-9);

    let id = doc.add_annotation("B1", "check wall", None, None).unwrap();
    assert_eq!(doc.annotation(&id).unwrap().position, metadata.center_of_mass);
}

// ── History Tests ──────────────────────────────────────────────────────────

#[test]
fn builder_undo_restores_operand_visibility() {
    let mut doc = box_and_cylinder();
    let before = doc.state().clone();
    doc.fuse(FuseSpec::default()).unwrap();

    assert!(doc.undo());
    assert_eq!(doc.state(), &before);

    assert!(doc.redo());
    assert_eq!(doc.len(), 3);
    assert!(!doc.get("B1").unwrap().visible);
}

#[test]
fn failed_builder_is_not_recorded() {
    let mut doc = box_and_cylinder();
    doc.cut(CutSpec {
        name: Some("C1".into()),
        ..CutSpec::default()
    })
    .unwrap_err();

    assert!(doc.undo());
    assert_eq!(doc.names().collect::<Vec<_>>(), ["B1"]);
}

#[test]
fn annotations_take_part_in_history() {
    let mut doc = box_and_cylinder();
    let id = doc
        .add_annotation("B1", "note", Some([1.0, 1.0, 1.0]), Some("ada".into()))
        .unwrap();
    assert!(doc.undo());
    assert!(doc.annotation(&id).is_none());
    assert!(doc.redo());
    assert_eq!(doc.annotation(&id).unwrap().parent, "B1");
}
