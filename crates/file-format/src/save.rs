use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::info;

use feature_engine::DocumentState;
use feature_types::{Parameters, ShapeMetadata};

use crate::errors::SaveError;

/// Schema version written into every saved document.
pub const SCHEMA_VERSION: &str = "3.0.0";

/// The only extension path-based load and save accept.
pub const FILE_EXTENSION: &str = "jcad";

/// The top-level file structure.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JcadFile<'a> {
    schema_version: &'a str,
    objects: Vec<ObjectRecord<'a>>,
    /// Annotation id to JSON-encoded annotation record, plus any other
    /// entries the document was loaded with.
    metadata: Map<String, Value>,
    outputs: &'a Map<String, Value>,
    options: &'a Map<String, Value>,
}

#[derive(Serialize)]
struct ObjectRecord<'a> {
    name: &'a str,
    visible: bool,
    shape: &'static str,
    parameters: &'a Parameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a ShapeMetadata>,
}

/// Serialize a document to JSON with four-space indentation.
pub fn save_document(doc: &DocumentState) -> Result<String, SaveError> {
    let serialize_error = |e: serde_json::Error| SaveError::Serialize(e.to_string());

    let mut metadata = doc.extra_metadata().clone();
    for (id, annotation) in doc.annotations() {
        let encoded = serde_json::to_string(annotation).map_err(serialize_error)?;
        metadata.insert(id.clone(), Value::String(encoded));
    }

    let file = JcadFile {
        schema_version: SCHEMA_VERSION,
        objects: doc
            .objects()
            .iter()
            .map(|object| ObjectRecord {
                name: &object.name,
                visible: object.visible,
                shape: object.kind().tag(),
                parameters: &object.parameters,
                metadata: object.metadata.as_ref(),
            })
            .collect(),
        metadata,
        outputs: doc.outputs(),
        options: doc.options(),
    };

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    file.serialize(&mut serializer).map_err(serialize_error)?;
    String::from_utf8(buf).map_err(|e| SaveError::Serialize(e.to_string()))
}

/// Save to a `.jcad` file.
pub fn save_path(doc: &DocumentState, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    check_extension(path).map_err(SaveError::UnsupportedFormat)?;
    let json = save_document(doc)?;
    std::fs::write(path, json).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), objects = doc.len(), "saved document");
    Ok(())
}

/// `Err` carries the rejected extension (or the path, when it has none).
pub(crate) fn check_extension(path: &Path) -> Result<(), String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(FILE_EXTENSION) => Ok(()),
        Some(ext) => Err(format!(".{ext}")),
        None => Err(path.display().to_string()),
    }
}
