//! The document store: ordered, name-indexed feature objects plus the
//! annotation, output and option side maps.
//!
//! Every mutation runs inside a [`Transaction`]. A transaction either commits
//! all of its changes (and lands on the undo stack as one unit) or rolls all
//! of them back.

use std::collections::{BTreeMap, HashSet};
use std::ops::Deref;

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use feature_types::{Annotation, Color, ShapeMetadata, ANNOTATION_ID_PREFIX};

use crate::history::{Change, ChangeSet, UndoStack};
use crate::rebuild::Evaluation;
use crate::types::{DocumentError, FeatureObject};

/// An operand reference that does not name an earlier object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingOperand {
    pub object: String,
    pub operand: String,
}

/// Document contents. Read access is public; writes go through [`Transaction`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentState {
    objects: Vec<FeatureObject>,
    annotations: BTreeMap<String, Annotation>,
    /// Document-level metadata entries that are not annotations.
    extra_metadata: Map<String, Value>,
    outputs: Map<String, Value>,
    options: Map<String, Value>,
}

impl DocumentState {
    /// Objects in stored order, which is also evaluation order.
    pub fn objects(&self) -> &[FeatureObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|o| o.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&FeatureObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.name == name)
    }

    /// `"{prefix} {n}"` for the smallest `n >= 1` not currently in use.
    pub fn auto_name(&self, prefix: &str) -> String {
        let taken: HashSet<&str> = self.names().collect();
        (1..)
            .map(|n| format!("{prefix} {n}"))
            .find(|candidate| !taken.contains(candidate.as_str()))
            .unwrap_or_else(|| prefix.to_string())
    }

    pub fn annotations(&self) -> &BTreeMap<String, Annotation> {
        &self.annotations
    }

    pub fn annotation(&self, id: &str) -> Option<&Annotation> {
        self.annotations.get(id)
    }

    pub fn extra_metadata(&self) -> &Map<String, Value> {
        &self.extra_metadata
    }

    pub fn outputs(&self) -> &Map<String, Value> {
        &self.outputs
    }

    pub fn output(&self, key: &str) -> Option<&Value> {
        self.outputs.get(key)
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Operand names stored on `name`, in consumption order.
    pub fn dependencies(&self, name: &str) -> Result<Vec<String>, DocumentError> {
        let object = self.get(name).ok_or_else(|| DocumentError::NotFound {
            name: name.to_string(),
        })?;
        Ok(object.operands().into_iter().map(str::to_string).collect())
    }

    /// Every object that reads `name`, directly or through other objects,
    /// in stored order.
    pub fn dependants(&self, name: &str) -> Vec<String> {
        let mut reached: HashSet<&str> = HashSet::from([name]);
        loop {
            let before = reached.len();
            for object in &self.objects {
                if object.operands().iter().any(|op| reached.contains(op)) {
                    reached.insert(object.name.as_str());
                }
            }
            if reached.len() == before {
                break;
            }
        }
        self.objects
            .iter()
            .filter(|o| o.name != name && reached.contains(o.name.as_str()))
            .map(|o| o.name.clone())
            .collect()
    }

    /// Operand references that will not resolve during evaluation: names that
    /// are absent, or that only appear later in the sequence.
    pub fn dangling_operands(&self) -> Vec<DanglingOperand> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut dangling = Vec::new();
        for object in &self.objects {
            for operand in object.operands() {
                if !seen.contains(operand) {
                    dangling.push(DanglingOperand {
                        object: object.name.clone(),
                        operand: operand.to_string(),
                    });
                }
            }
            seen.insert(object.name.as_str());
        }
        dangling
    }

    fn find_mut(&mut self, name: &str) -> Option<&mut FeatureObject> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    /// Apply a change recorded against this state.
    fn apply(&mut self, change: &Change) {
        match change {
            Change::Insert { index, object } => {
                let index = (*index).min(self.objects.len());
                self.objects.insert(index, object.as_ref().clone());
            }
            Change::Remove { index, object } => {
                if self.objects.get(*index).map(|o| &o.name) == Some(&object.name) {
                    self.objects.remove(*index);
                }
            }
            Change::SetVisible { name, new, .. } => {
                if let Some(object) = self.find_mut(name) {
                    object.visible = *new;
                }
            }
            Change::SetColor { name, new, .. } => {
                if let Some(object) = self.find_mut(name) {
                    // Colorless kinds never produce this change.
                    let _ = object.parameters.set_color(new.clone());
                }
            }
            Change::PutAnnotation { id, new, .. } => match new {
                Some(annotation) => {
                    self.annotations.insert(id.clone(), annotation.clone());
                }
                None => {
                    self.annotations.remove(id);
                }
            },
            Change::PutOutput { key, new, .. } => match new {
                Some(value) => {
                    self.outputs.insert(key.clone(), value.clone());
                }
                None => {
                    self.outputs.remove(key);
                }
            },
        }
    }
}

/// A set of mutations applied atomically to a document.
pub struct Transaction<'a> {
    state: &'a mut DocumentState,
    log: ChangeSet,
}

impl Deref for Transaction<'_> {
    type Target = DocumentState;

    fn deref(&self) -> &DocumentState {
        self.state
    }
}

impl Transaction<'_> {
    fn commit(&mut self, change: Change) {
        self.state.apply(&change);
        self.log.push(change);
    }

    /// Append an object. Fails if the name is taken.
    pub fn add(&mut self, object: FeatureObject) -> Result<(), DocumentError> {
        if self.exists(&object.name) {
            return Err(DocumentError::DuplicateName { name: object.name });
        }
        let index = self.len();
        self.commit(Change::Insert {
            index,
            object: Box::new(object),
        });
        Ok(())
    }

    /// Remove an object and the output keyed by its name. No-op if absent.
    pub fn remove(&mut self, name: &str) -> Option<FeatureObject> {
        let index = self.index_of(name)?;
        let object = self.state.objects[index].clone();
        self.commit(Change::Remove {
            index,
            object: Box::new(object.clone()),
        });
        if let Some(output) = self.output(name).cloned() {
            self.commit(Change::PutOutput {
                key: name.to_string(),
                old: Some(output),
                new: None,
            });
        }
        Some(object)
    }

    /// Re-add `old` under `new` at the end of the sequence.
    ///
    /// Objects referencing `old` keep doing so.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), DocumentError> {
        if old == new {
            return Ok(());
        }
        let index = self.index_of(old).ok_or_else(|| DocumentError::NotFound {
            name: old.to_string(),
        })?;
        if self.exists(new) {
            return Err(DocumentError::DuplicateName {
                name: new.to_string(),
            });
        }
        let object = self.state.objects[index].clone();
        self.commit(Change::Remove {
            index,
            object: Box::new(object.clone()),
        });
        let renamed = FeatureObject {
            name: new.to_string(),
            ..object
        };
        self.add(renamed)
    }

    pub fn set_visible(&mut self, name: &str, visible: bool) -> Result<(), DocumentError> {
        let object = self.get(name).ok_or_else(|| DocumentError::NotFound {
            name: name.to_string(),
        })?;
        let old = object.visible;
        if old != visible {
            self.commit(Change::SetVisible {
                name: name.to_string(),
                old,
                new: visible,
            });
        }
        Ok(())
    }

    pub fn set_color(&mut self, name: &str, color: Option<Color>) -> Result<(), DocumentError> {
        let object = self.get(name).ok_or_else(|| DocumentError::NotFound {
            name: name.to_string(),
        })?;
        if !object.kind().has_color() {
            return Err(DocumentError::ColorNotSupported {
                name: name.to_string(),
                kind: object.kind(),
            });
        }
        let old = object.color().cloned();
        if old != color {
            self.commit(Change::SetColor {
                name: name.to_string(),
                old,
                new: color,
            });
        }
        Ok(())
    }

    /// Attach a note to `parent` and return its generated id.
    ///
    /// Without an explicit position the note sits at the parent's recorded
    /// centre of mass, or at the origin.
    pub fn add_annotation(
        &mut self,
        parent: &str,
        message: &str,
        position: Option<[f64; 3]>,
        user: Option<Value>,
    ) -> Result<String, DocumentError> {
        let parent_object = self.get(parent).ok_or_else(|| DocumentError::NotFound {
            name: parent.to_string(),
        })?;
        let position = position
            .or_else(|| parent_object.metadata.as_ref().map(|m| m.center_of_mass))
            .unwrap_or([0.0; 3]);
        let id = format!("{ANNOTATION_ID_PREFIX}{}", Uuid::new_v4());
        let annotation =
            Annotation::new(parent, position).with_message(message, user);
        self.commit(Change::PutAnnotation {
            id: id.clone(),
            old: None,
            new: Some(annotation),
        });
        Ok(id)
    }

    /// No-op if absent.
    pub fn remove_annotation(&mut self, id: &str) -> Option<Annotation> {
        let old = self.annotation(id)?.clone();
        self.commit(Change::PutAnnotation {
            id: id.to_string(),
            old: Some(old.clone()),
            new: None,
        });
        Some(old)
    }
}

/// A feature-history document with undo/redo.
#[derive(Debug, Clone, Default)]
pub struct Document {
    state: DocumentState,
    history: UndoStack,
}

impl Deref for Document {
    type Target = DocumentState;

    fn deref(&self) -> &DocumentState {
        &self.state
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a document from persisted parts, with an empty history.
    pub fn from_parts(
        objects: Vec<FeatureObject>,
        annotations: BTreeMap<String, Annotation>,
        outputs: Map<String, Value>,
        options: Map<String, Value>,
    ) -> Result<Self, DocumentError> {
        let mut seen = HashSet::new();
        if let Some(dup) = objects.iter().find(|o| !seen.insert(o.name.as_str())) {
            return Err(DocumentError::DuplicateName {
                name: dup.name.clone(),
            });
        }
        Ok(Self {
            state: DocumentState {
                objects,
                annotations,
                extra_metadata: Map::new(),
                outputs,
                options,
            },
            history: UndoStack::new(),
        })
    }

    /// The document contents.
    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    /// Run `f` as one atomic transaction.
    ///
    /// On error every change `f` made is rolled back and nothing is recorded.
    pub fn transact<T>(
        &mut self,
        f: impl FnOnce(&mut Transaction<'_>) -> Result<T, DocumentError>,
    ) -> Result<T, DocumentError> {
        let mut tx = Transaction {
            state: &mut self.state,
            log: Vec::new(),
        };
        match f(&mut tx) {
            Ok(value) => {
                let log = tx.log;
                self.history.push(log);
                Ok(value)
            }
            Err(e) => {
                let log = std::mem::take(&mut tx.log);
                debug!(changes = log.len(), error = %e, "rolling back transaction");
                for change in log.iter().rev() {
                    tx.state.apply(&change.inverse());
                }
                Err(e)
            }
        }
    }

    pub fn add(&mut self, object: FeatureObject) -> Result<(), DocumentError> {
        self.transact(|tx| tx.add(object))
    }

    pub fn remove(&mut self, name: &str) -> Option<FeatureObject> {
        self.transact(|tx| Ok(tx.remove(name))).ok().flatten()
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), DocumentError> {
        self.transact(|tx| tx.rename(old, new))
    }

    pub fn set_visible(&mut self, name: &str, visible: bool) -> Result<(), DocumentError> {
        self.transact(|tx| tx.set_visible(name, visible))
    }

    pub fn set_color(&mut self, name: &str, color: impl Into<Color>) -> Result<(), DocumentError> {
        let color = color.into();
        self.transact(|tx| tx.set_color(name, Some(color)))
    }

    pub fn add_annotation(
        &mut self,
        parent: &str,
        message: &str,
        position: Option<[f64; 3]>,
        user: Option<Value>,
    ) -> Result<String, DocumentError> {
        self.transact(|tx| tx.add_annotation(parent, message, position, user))
    }

    pub fn remove_annotation(&mut self, id: &str) -> Option<Annotation> {
        self.transact(|tx| Ok(tx.remove_annotation(id))).ok().flatten()
    }

    /// Store computed properties on an object. Not recorded in the history.
    pub fn set_shape_metadata(
        &mut self,
        name: &str,
        metadata: Option<ShapeMetadata>,
    ) -> Result<(), DocumentError> {
        let object = self
            .state
            .find_mut(name)
            .ok_or_else(|| DocumentError::NotFound {
                name: name.to_string(),
            })?;
        object.metadata = metadata;
        Ok(())
    }

    /// Copy the metadata an evaluation computed onto the matching objects.
    /// Returns how many objects were updated.
    pub fn record_metadata(&mut self, evaluation: &Evaluation) -> usize {
        let mut updated = 0;
        for (name, metadata) in &evaluation.metadata {
            if self.set_shape_metadata(name, Some(metadata.clone())).is_ok() {
                updated += 1;
            }
        }
        updated
    }

    /// Keep a non-annotation metadata entry so it is written back on save.
    /// Not recorded in the history.
    pub fn set_extra_metadata(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.state.extra_metadata.insert(key.into(), value)
    }

    /// Engine-populated artifacts. Not recorded in the history.
    pub fn set_output(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.state.outputs.insert(key.into(), value)
    }

    pub fn remove_output(&mut self, key: &str) -> Option<Value> {
        self.state.outputs.remove(key)
    }

    /// Free-form settings. Not recorded in the history.
    pub fn set_option(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.state.options.insert(key.into(), value)
    }

    pub fn remove_option(&mut self, key: &str) -> Option<Value> {
        self.state.options.remove(key)
    }

    /// Revert the most recent transaction. Returns false if there is none.
    pub fn undo(&mut self) -> bool {
        let Some(changes) = self.history.pop_undo() else {
            return false;
        };
        for change in changes.iter().rev() {
            self.state.apply(&change.inverse());
        }
        self.history.push_redo(changes);
        true
    }

    /// Re-apply the most recently undone transaction.
    pub fn redo(&mut self) -> bool {
        let Some(changes) = self.history.pop_redo() else {
            return false;
        };
        for change in &changes {
            self.state.apply(change);
        }
        self.history.push_undo_only(changes);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
