//! Registry mapping kind tags to their parameter schema.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use crate::kind::ShapeKind;
use crate::params::*;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("unknown shape kind: {0}")]
    UnknownKind(String),

    #[error("invalid parameters for {kind}: {reason}")]
    InvalidParameters { kind: ShapeKind, reason: String },
}

type ParseFn = fn(Value) -> Result<Parameters, serde_json::Error>;

/// How a single kind is named and how its persisted parameters are parsed.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSchema {
    pub kind: ShapeKind,
    pub name_prefix: &'static str,
    parse: ParseFn,
}

impl ParameterSchema {
    pub fn new(kind: ShapeKind, parse: ParseFn) -> Self {
        Self {
            kind,
            name_prefix: kind.name_prefix(),
            parse,
        }
    }
}

/// An explicit kind → schema table.
///
/// Constructed and passed around by value; there is no process-wide instance.
#[derive(Debug, Clone, Default)]
pub struct ParameterRegistry {
    schemas: HashMap<ShapeKind, ParameterSchema>,
}

macro_rules! parser {
    ($variant:ident, $record:ty) => {
        |value| serde_json::from_value::<$record>(value).map(Parameters::$variant)
    };
}

impl ParameterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in kind.
    pub fn with_builtin_kinds() -> Self {
        let mut registry = Self::new();
        let builtin = [
            ParameterSchema::new(ShapeKind::Box, parser!(Box, BoxParams)),
            ParameterSchema::new(ShapeKind::Cone, parser!(Cone, ConeParams)),
            ParameterSchema::new(ShapeKind::Cylinder, parser!(Cylinder, CylinderParams)),
            ParameterSchema::new(ShapeKind::Sphere, parser!(Sphere, SphereParams)),
            ParameterSchema::new(ShapeKind::Torus, parser!(Torus, TorusParams)),
            ParameterSchema::new(ShapeKind::Cut, parser!(Cut, CutParams)),
            ParameterSchema::new(ShapeKind::Fuse, parser!(Fuse, MultiParams)),
            ParameterSchema::new(ShapeKind::Intersection, parser!(Intersection, MultiParams)),
            ParameterSchema::new(ShapeKind::Extrusion, parser!(Extrusion, ExtrusionParams)),
            ParameterSchema::new(ShapeKind::Chamfer, parser!(Chamfer, ChamferParams)),
            ParameterSchema::new(ShapeKind::Fillet, parser!(Fillet, FilletParams)),
            ParameterSchema::new(ShapeKind::Sketch, parser!(Sketch, SketchParams)),
            ParameterSchema::new(ShapeKind::Opaque, parser!(Opaque, OpaqueParams)),
        ];
        for schema in builtin {
            registry.register(schema);
        }
        registry
    }

    /// Add or replace the schema for `schema.kind`.
    pub fn register(&mut self, schema: ParameterSchema) {
        self.schemas.insert(schema.kind, schema);
    }

    pub fn get(&self, kind: ShapeKind) -> Option<&ParameterSchema> {
        self.schemas.get(&kind)
    }

    /// Look a schema up by its persisted tag.
    pub fn lookup(&self, tag: &str) -> Result<&ParameterSchema, SchemaError> {
        tag.parse::<ShapeKind>()
            .ok()
            .and_then(|kind| self.get(kind))
            .ok_or_else(|| SchemaError::UnknownKind(tag.to_string()))
    }

    pub fn kinds(&self) -> impl Iterator<Item = ShapeKind> + '_ {
        self.schemas.keys().copied()
    }

    /// Parse persisted parameters into the typed record, filling defaults.
    ///
    /// `null` is treated as an empty record.
    pub fn parse(&self, kind: ShapeKind, value: Value) -> Result<Parameters, SchemaError> {
        let schema = self
            .get(kind)
            .ok_or_else(|| SchemaError::UnknownKind(kind.tag().to_string()))?;
        let value = match value {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        (schema.parse)(value).map_err(|e| SchemaError::InvalidParameters {
            kind,
            reason: e.to_string(),
        })
    }

    /// The default record for `kind`.
    pub fn defaults(&self, kind: ShapeKind) -> Result<Parameters, SchemaError> {
        self.parse(kind, Value::Null)
    }

    pub fn validate(&self, params: &Parameters) -> Result<(), SchemaError> {
        let kind = params.kind();
        if self.get(kind).is_none() {
            return Err(SchemaError::UnknownKind(kind.tag().to_string()));
        }
        params
            .validate()
            .map_err(|reason| SchemaError::InvalidParameters { kind, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_registry_covers_every_kind() {
        let registry = ParameterRegistry::with_builtin_kinds();
        for kind in ShapeKind::ALL {
            let defaults = registry.defaults(kind).unwrap();
            assert_eq!(defaults.kind(), kind);
            assert_eq!(registry.get(kind).unwrap().name_prefix, kind.name_prefix());
        }
    }

    #[test]
    fn parse_fills_defaults_and_keeps_given_fields() {
        let registry = ParameterRegistry::with_builtin_kinds();
        let params = registry
            .parse(ShapeKind::Cone, json!({"Radius1": 3.0, "Color": "#FF0000"}))
            .unwrap();
        match params {
            Parameters::Cone(cone) => {
                assert_eq!(cone.radius1, 3.0);
                assert_eq!(cone.radius2, 0.5);
                assert_eq!(cone.angle, 360.0);
                assert!(cone.color.is_some());
            }
            other => panic!("expected cone, got {other:?}"),
        }
    }

    #[test]
    fn wrong_field_types_are_invalid_parameters() {
        let registry = ParameterRegistry::with_builtin_kinds();
        let err = registry
            .parse(ShapeKind::Box, json!({"Length": "long"}))
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidParameters {
                kind: ShapeKind::Box,
                ..
            }
        ));
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = ParameterRegistry::new();
        assert!(matches!(
            registry.defaults(ShapeKind::Box),
            Err(SchemaError::UnknownKind(_))
        ));
        assert!(matches!(
            registry.lookup("Part::Nothing"),
            Err(SchemaError::UnknownKind(tag)) if tag == "Part::Nothing"
        ));
    }

    #[test]
    fn validate_reports_kind() {
        let registry = ParameterRegistry::with_builtin_kinds();
        let params = Parameters::Intersection(MultiParams::default());
        let err = registry.validate(&params).unwrap_err();
        assert!(err.to_string().contains("Part::MultiCommon"));
    }
}
