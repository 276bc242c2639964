use std::fmt;

use crate::document::DocumentState;
use crate::types::DocumentError;

/// How a builder names an operand: by object name, or by position in the
/// stored sequence. Negative positions count from the end (`-1` is the last).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandRef {
    Name(String),
    Index(i64),
}

impl From<&str> for OperandRef {
    fn from(name: &str) -> Self {
        OperandRef::Name(name.to_string())
    }
}

impl From<String> for OperandRef {
    fn from(name: String) -> Self {
        OperandRef::Name(name)
    }
}

impl From<i32> for OperandRef {
    fn from(index: i32) -> Self {
        OperandRef::Index(i64::from(index))
    }
}

impl From<i64> for OperandRef {
    fn from(index: i64) -> Self {
        OperandRef::Index(index)
    }
}

impl fmt::Display for OperandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandRef::Name(name) => write!(f, "{name:?}"),
            OperandRef::Index(index) => write!(f, "#{index}"),
        }
    }
}

fn unknown(reference: &OperandRef) -> DocumentError {
    DocumentError::UnknownOperand {
        reference: reference.to_string(),
    }
}

/// Resolve a reference to the name of an existing object.
pub fn resolve(state: &DocumentState, reference: &OperandRef) -> Result<String, DocumentError> {
    match reference {
        OperandRef::Name(name) => {
            if state.exists(name) {
                Ok(name.clone())
            } else {
                Err(unknown(reference))
            }
        }
        OperandRef::Index(index) => {
            let len = state.len() as i64;
            let position = if *index < 0 { len + index } else { *index };
            if !(0..len).contains(&position) {
                return Err(unknown(reference));
            }
            Ok(state.objects()[position as usize].name.clone())
        }
    }
}

/// Resolve a single operand, defaulting to the last object.
pub fn resolve_unary(
    state: &DocumentState,
    reference: Option<&OperandRef>,
) -> Result<String, DocumentError> {
    match reference {
        Some(reference) => resolve(state, reference),
        None if state.is_empty() => Err(DocumentError::InsufficientOperands {
            required: 1,
            available: 0,
        }),
        None => resolve(state, &OperandRef::Index(-1)),
    }
}

/// Resolve a pair of operands, defaulting to the last two objects.
///
/// Fails on a store with fewer than two objects even when both references
/// are given, since no binary operation can be meaningful there.
pub fn resolve_binary(
    state: &DocumentState,
    first: Option<&OperandRef>,
    second: Option<&OperandRef>,
) -> Result<(String, String), DocumentError> {
    if state.len() < 2 {
        return Err(DocumentError::InsufficientOperands {
            required: 2,
            available: state.len(),
        });
    }
    let first = resolve(state, first.unwrap_or(&OperandRef::Index(-2)))?;
    let second = resolve(state, second.unwrap_or(&OperandRef::Index(-1)))?;
    Ok((first, second))
}

/// Resolve an n-ary operand list. The first two entries default like
/// [`resolve_binary`]; any further entries are resolved as given.
pub fn resolve_many(
    state: &DocumentState,
    references: &[OperandRef],
) -> Result<Vec<String>, DocumentError> {
    let (first, second) = resolve_binary(state, references.first(), references.get(1))?;
    let mut names = vec![first, second];
    for reference in references.iter().skip(2) {
        names.push(resolve(state, reference)?);
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::types::FeatureObject;
    use feature_types::{BoxParams, Parameters};

    fn doc_with(names: &[&str]) -> Document {
        let mut doc = Document::new();
        for name in names {
            doc.add(FeatureObject::new(
                *name,
                Parameters::Box(BoxParams::default()),
            ))
            .unwrap();
        }
        doc
    }

    #[test]
    fn indices_count_from_either_end() {
        let doc = doc_with(&["A", "B", "C"]);
        assert_eq!(resolve(&doc, &0.into()).unwrap(), "A");
        assert_eq!(resolve(&doc, &(-1).into()).unwrap(), "C");
        assert_eq!(resolve(&doc, &(-3).into()).unwrap(), "A");
        assert!(matches!(
            resolve(&doc, &3.into()),
            Err(DocumentError::UnknownOperand { .. })
        ));
        assert!(matches!(
            resolve(&doc, &(-4).into()),
            Err(DocumentError::UnknownOperand { .. })
        ));
    }

    #[test]
    fn names_must_exist() {
        let doc = doc_with(&["A"]);
        assert_eq!(resolve(&doc, &"A".into()).unwrap(), "A");
        assert_eq!(
            resolve(&doc, &"Missing".into()),
            Err(DocumentError::UnknownOperand {
                reference: "\"Missing\"".into()
            })
        );
    }

    #[test]
    fn defaults_pick_the_trailing_objects() {
        let doc = doc_with(&["A", "B", "C"]);
        assert_eq!(resolve_unary(&doc, None).unwrap(), "C");
        assert_eq!(
            resolve_binary(&doc, None, None).unwrap(),
            ("B".to_string(), "C".to_string())
        );
        assert_eq!(
            resolve_many(&doc, &["A".into()]).unwrap(),
            ["A", "C"]
        );
    }

    #[test]
    fn short_stores_are_rejected() {
        let empty = Document::new();
        assert_eq!(
            resolve_unary(&empty, None),
            Err(DocumentError::InsufficientOperands {
                required: 1,
                available: 0
            })
        );
        let one = doc_with(&["A"]);
        assert_eq!(
            resolve_binary(&one, Some(&"A".into()), Some(&"A".into())),
            Err(DocumentError::InsufficientOperands {
                required: 2,
                available: 1
            })
        );
    }
}
