//! Reversible changes and the undo/redo history of committed transactions.

use feature_types::{Annotation, Color};
use serde_json::Value;

use crate::types::FeatureObject;

/// One reversible edit of the document state.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Insert {
        index: usize,
        object: Box<FeatureObject>,
    },
    Remove {
        index: usize,
        object: Box<FeatureObject>,
    },
    SetVisible {
        name: String,
        old: bool,
        new: bool,
    },
    SetColor {
        name: String,
        old: Option<Color>,
        new: Option<Color>,
    },
    PutAnnotation {
        id: String,
        old: Option<Annotation>,
        new: Option<Annotation>,
    },
    /// Only emitted when removing an object drops its output entry.
    PutOutput {
        key: String,
        old: Option<Value>,
        new: Option<Value>,
    },
}

impl Change {
    /// The change that undoes this one.
    pub fn inverse(&self) -> Change {
        match self.clone() {
            Change::Insert { index, object } => Change::Remove { index, object },
            Change::Remove { index, object } => Change::Insert { index, object },
            Change::SetVisible { name, old, new } => Change::SetVisible {
                name,
                old: new,
                new: old,
            },
            Change::SetColor { name, old, new } => Change::SetColor {
                name,
                old: new,
                new: old,
            },
            Change::PutAnnotation { id, old, new } => Change::PutAnnotation {
                id,
                old: new,
                new: old,
            },
            Change::PutOutput { key, old, new } => Change::PutOutput {
                key,
                old: new,
                new: old,
            },
        }
    }
}

/// The changes of one committed transaction, in application order.
pub type ChangeSet = Vec<Change>;

/// Two-stack undo/redo history.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    undo: Vec<ChangeSet>,
    redo: Vec<ChangeSet>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed transaction, clearing the redo stack.
    pub fn push(&mut self, changes: ChangeSet) {
        if changes.is_empty() {
            return;
        }
        self.undo.push(changes);
        self.redo.clear();
    }

    /// Push onto the undo stack without clearing redo.
    /// Used by `redo()` to re-populate the undo stack.
    pub fn push_undo_only(&mut self, changes: ChangeSet) {
        self.undo.push(changes);
    }

    pub fn pop_undo(&mut self) -> Option<ChangeSet> {
        self.undo.pop()
    }

    pub fn push_redo(&mut self, changes: ChangeSet) {
        self.redo.push(changes);
    }

    pub fn pop_redo(&mut self) -> Option<ChangeSet> {
        self.redo.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
