use std::path::Path;

use tracing::info;

use feature_engine::{Document, OpaqueSpec};
use feature_types::{OpaqueParams, ShapeKind};

use crate::errors::LoadError;

/// Shape-file formats that import as opaque geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeFormat {
    Step,
    Brep,
    Stl,
}

impl ShapeFormat {
    /// Case-insensitive match on a file extension without the dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "step" | "stp" => Some(ShapeFormat::Step),
            "brep" | "brp" => Some(ShapeFormat::Brep),
            "stl" => Some(ShapeFormat::Stl),
            _ => None,
        }
    }

    /// Content-type tag stored on the opaque object.
    pub fn content_type(self) -> &'static str {
        match self {
            ShapeFormat::Step => "STEP",
            ShapeFormat::Brep => "BREP",
            ShapeFormat::Stl => "STL",
        }
    }
}

/// Read a STEP, BREP or STL file into a new opaque object and return its name.
///
/// The object is named after the file stem, or `"{stem} {n}"` if the stem is
/// already taken.
pub fn import_shape_file(doc: &mut Document, path: impl AsRef<Path>) -> Result<String, LoadError> {
    let path = path.as_ref();
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ShapeFormat::from_extension)
        .ok_or_else(|| LoadError::UnsupportedFormat(path.display().to_string()))?;
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    // Opaque content is stored as text, so binary STL cannot be carried.
    let content = String::from_utf8(bytes).map_err(|_| {
        LoadError::UnsupportedFormat(format!(
            "{}: binary {} files are not supported",
            path.display(),
            format.content_type()
        ))
    })?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(ShapeKind::Opaque.name_prefix());
    let name = if doc.exists(stem) {
        doc.auto_name(stem)
    } else {
        stem.to_string()
    };

    let name = doc.add_opaque(OpaqueSpec {
        name: Some(name),
        params: OpaqueParams {
            content,
            content_type: format.content_type().to_string(),
            ..OpaqueParams::default()
        },
    })?;
    info!(name = %name, format = format.content_type(), "imported shape file");
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_map_to_formats() {
        assert_eq!(ShapeFormat::from_extension("STP"), Some(ShapeFormat::Step));
        assert_eq!(ShapeFormat::from_extension("brp"), Some(ShapeFormat::Brep));
        assert_eq!(ShapeFormat::from_extension("stl"), Some(ShapeFormat::Stl));
        assert_eq!(ShapeFormat::from_extension("FCStd"), None);
    }
}
