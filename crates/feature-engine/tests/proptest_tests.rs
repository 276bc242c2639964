//! Property-based tests for document invariants under random edit sequences.

use std::collections::HashSet;

use proptest::prelude::*;

use feature_engine::*;
use geom_kernel::MockKernel;

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Edit {
    AddBox(Option<String>),
    AddSphere,
    Cut,
    Fuse,
    Extrude,
    Remove(usize),
    Rename(usize, String),
    Undo,
    Redo,
}

/// A small pool so explicit names collide with each other and with auto names.
fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Box 1".to_string()),
        Just("Box 2".to_string()),
        Just("Cut 1".to_string()),
        Just("Base".to_string()),
        Just("Tool".to_string()),
    ]
}

fn arb_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => prop::option::of(arb_name()).prop_map(Edit::AddBox),
        1 => Just(Edit::AddSphere),
        2 => Just(Edit::Cut),
        1 => Just(Edit::Fuse),
        1 => Just(Edit::Extrude),
        1 => (0usize..8).prop_map(Edit::Remove),
        1 => (0usize..8, arb_name()).prop_map(|(i, n)| Edit::Rename(i, n)),
        1 => Just(Edit::Undo),
        1 => Just(Edit::Redo),
    ]
}

fn apply(doc: &mut Document, edit: &Edit) {
    let name_at = |doc: &Document, i: usize| {
        (!doc.is_empty()).then(|| doc.objects()[i % doc.len()].name.clone())
    };
    // Errors are expected here; only the invariants matter.
    let _ = match edit {
        Edit::AddBox(name) => doc
            .add_box(BoxSpec {
                name: name.clone(),
                ..BoxSpec::default()
            })
            .map(drop),
        Edit::AddSphere => doc.add_sphere(SphereSpec::default()).map(drop),
        Edit::Cut => doc.cut(CutSpec::default()).map(drop),
        Edit::Fuse => doc.fuse(FuseSpec::default()).map(drop),
        Edit::Extrude => doc.extrude(ExtrudeSpec::default()).map(drop),
        Edit::Remove(i) => {
            if let Some(name) = name_at(&*doc, *i) {
                doc.remove(&name);
            }
            Ok(())
        }
        Edit::Rename(i, new) => match name_at(&*doc, *i) {
            Some(old) => doc.rename(&old, new),
            None => Ok(()),
        },
        Edit::Undo => {
            doc.undo();
            Ok(())
        }
        Edit::Redo => {
            doc.redo();
            Ok(())
        }
    };
}

fn names_are_distinct(doc: &Document) -> bool {
    let mut seen = HashSet::new();
    doc.names().all(|n| seen.insert(n))
}

// ---------------------------------------------------------------------------
// 1. Names are pairwise distinct after every edit.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn names_stay_unique(edits in prop::collection::vec(arb_edit(), 0..40)) {
        let mut doc = Document::new();
        for edit in &edits {
            apply(&mut doc, edit);
            prop_assert!(names_are_distinct(&doc), "duplicate after {:?}: {:?}",
                edit, doc.names().collect::<Vec<_>>());
        }
    }
}

// ---------------------------------------------------------------------------
// 2. auto_name returns an unused name and is stable until the store changes.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn auto_name_is_free_and_stable(edits in prop::collection::vec(arb_edit(), 0..30)) {
        let mut doc = Document::new();
        for edit in &edits {
            apply(&mut doc, edit);
        }
        for prefix in ["Box", "Cut", "Fuse"] {
            let name = doc.auto_name(prefix);
            prop_assert!(!doc.exists(&name));
            prop_assert_eq!(&name, &doc.auto_name(prefix));
        }
    }
}

// ---------------------------------------------------------------------------
// 3. Evaluation accounts for every object and never aborts.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn evaluation_covers_every_object(edits in prop::collection::vec(arb_edit(), 0..40)) {
        let mut doc = Document::new();
        for edit in &edits {
            apply(&mut doc, edit);
        }
        let mut kernel = MockKernel::new();
        let eval = evaluate(&doc, &mut kernel, &EvaluationConfig::default());

        prop_assert_eq!(eval.cache.len() + eval.failures.len(), doc.len());
        let visible = doc.objects().iter()
            .filter(|o| o.visible && eval.shape(&o.name).is_some())
            .count();
        prop_assert_eq!(eval.manifest.len(), visible);
    }
}

// ---------------------------------------------------------------------------
// 4. Undoing everything returns to the empty document.
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn full_undo_empties_the_document(edits in prop::collection::vec(arb_edit(), 0..30)) {
        let mut doc = Document::new();
        for edit in &edits {
            apply(&mut doc, edit);
        }
        while doc.undo() {}
        prop_assert!(doc.is_empty());
        prop_assert!(doc.annotations().is_empty());
    }
}
