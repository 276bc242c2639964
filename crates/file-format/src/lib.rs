//! Persistence for feature documents: the `.jcad` JSON layout, schema
//! version checks, shape-file import and the mesh export boundary.

pub mod errors;
pub mod export;
pub mod import;
pub mod load;
pub mod migrate;
pub mod save;

pub use errors::{ExportError, LoadError, SaveError};
pub use export::{prepare_export, record_outputs, ExportConfig, ExportItem, ExportManifest};
pub use import::{import_shape_file, ShapeFormat};
pub use load::{load_document, load_document_with, load_path};
pub use save::{save_document, save_path, FILE_EXTENSION, SCHEMA_VERSION};
