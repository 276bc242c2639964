use std::path::PathBuf;

use feature_engine::{DocumentError, ReconstructionError};
use feature_types::SchemaError;
use geom_kernel::KernelError;

/// Errors during document loading and shape-file import.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse file: {0}")]
    Parse(String),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("file schema version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: String,
        supported_version: String,
    },

    #[error("migration failed from version {from} to {to}: {reason}")]
    MigrationFailed {
        from: String,
        to: String,
        reason: String,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors during document saving.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to serialize document: {0}")]
    Serialize(String),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why one visible object is missing from an export manifest.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),

    #[error("tessellation of {name:?} failed: {source}")]
    Tessellation {
        name: String,
        #[source]
        source: KernelError,
    },
}

impl ExportError {
    /// The object the failure belongs to.
    pub fn object(&self) -> &str {
        match self {
            ExportError::Reconstruction(e) => e.object(),
            ExportError::Tessellation { name, .. } => name,
        }
    }
}
