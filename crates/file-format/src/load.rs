use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use feature_engine::{Document, FeatureObject};
use feature_types::{Annotation, ParameterRegistry, ShapeMetadata, ANNOTATION_ID_PREFIX};

use crate::errors::LoadError;
use crate::migrate::{compare_major, migrate};
use crate::save::{check_extension, SCHEMA_VERSION};

/// The top-level file structure for deserialization.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JcadFileRaw {
    #[serde(default)]
    objects: Vec<ObjectRaw>,
    #[serde(default)]
    metadata: Map<String, Value>,
    #[serde(default)]
    outputs: Map<String, Value>,
    #[serde(default)]
    options: Map<String, Value>,
}

#[derive(Deserialize)]
struct ObjectRaw {
    name: String,
    #[serde(default = "visible_by_default")]
    visible: bool,
    shape: String,
    #[serde(default)]
    parameters: Value,
    #[serde(default, alias = "shapeMetadata")]
    metadata: Option<ShapeMetadata>,
}

fn visible_by_default() -> bool {
    true
}

/// Deserialize a document using the built-in parameter schemas.
pub fn load_document(json: &str) -> Result<Document, LoadError> {
    load_document_with(json, &ParameterRegistry::with_builtin_kinds())
}

/// Deserialize a document, validating every object against `registry`.
///
/// Files from a newer schema major are rejected; older majors go through
/// [`migrate`].
#[instrument(skip_all, fields(len = json.len()))]
pub fn load_document_with(json: &str, registry: &ParameterRegistry) -> Result<Document, LoadError> {
    let value: Value = serde_json::from_str(json).map_err(|e| LoadError::Parse(e.to_string()))?;
    let version = value
        .get("schemaVersion")
        .and_then(Value::as_str)
        .ok_or_else(|| LoadError::Parse("missing schemaVersion".to_string()))?
        .to_string();

    let value = match compare_major(&version, SCHEMA_VERSION)? {
        Ordering::Greater => {
            return Err(LoadError::FutureVersion {
                file_version: version,
                supported_version: SCHEMA_VERSION.to_string(),
            })
        }
        Ordering::Less => migrate(value, &version, SCHEMA_VERSION)?,
        Ordering::Equal => value,
    };

    let raw: JcadFileRaw =
        serde_json::from_value(value).map_err(|e| LoadError::Parse(e.to_string()))?;

    let objects = raw
        .objects
        .into_iter()
        .map(|object| object_from_raw(object, registry))
        .collect::<Result<Vec<_>, _>>()?;
    let (annotations, extra_metadata) = split_metadata(raw.metadata);

    let mut doc = Document::from_parts(objects, annotations, raw.outputs, raw.options)?;
    for (key, value) in extra_metadata {
        doc.set_extra_metadata(key, value);
    }
    info!(
        version = %version,
        objects = doc.len(),
        annotations = doc.annotations().len(),
        "loaded document"
    );
    Ok(doc)
}

/// Load a `.jcad` file.
pub fn load_path(path: impl AsRef<Path>) -> Result<Document, LoadError> {
    let path = path.as_ref();
    check_extension(path).map_err(LoadError::UnsupportedFormat)?;
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_document(&json)
}

fn object_from_raw(raw: ObjectRaw, registry: &ParameterRegistry) -> Result<FeatureObject, LoadError> {
    let kind = registry.lookup(&raw.shape)?.kind;
    let parameters = registry.parse(kind, raw.parameters)?;
    registry.validate(&parameters)?;
    Ok(FeatureObject {
        name: raw.name,
        visible: raw.visible,
        parameters,
        metadata: raw.metadata,
    })
}

/// Split document metadata into annotations and the entries kept verbatim.
///
/// Annotation records are stored as JSON strings; plain objects are accepted
/// too. Malformed annotation records are dropped.
fn split_metadata(metadata: Map<String, Value>) -> (BTreeMap<String, Annotation>, Map<String, Value>) {
    let mut annotations = BTreeMap::new();
    let mut extra = Map::new();
    for (id, value) in metadata {
        if !id.starts_with(ANNOTATION_ID_PREFIX) {
            debug!(key = %id, "keeping non-annotation metadata");
            extra.insert(id, value);
            continue;
        }
        let parsed = match value {
            Value::String(encoded) => serde_json::from_str::<Annotation>(&encoded),
            other => serde_json::from_value::<Annotation>(other),
        };
        match parsed {
            Ok(annotation) => {
                annotations.insert(id, annotation);
            }
            Err(e) => warn!(id = %id, error = %e, "dropping malformed annotation"),
        }
    }
    (annotations, extra)
}
