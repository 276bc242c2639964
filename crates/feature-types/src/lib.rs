pub mod annotation;
pub mod color;
pub mod kind;
pub mod metadata;
pub mod params;
pub mod placement;
pub mod schema;
pub mod sketch;

pub use annotation::*;
pub use color::*;
pub use kind::*;
pub use metadata::*;
pub use params::*;
pub use placement::*;
pub use schema::{ParameterRegistry, ParameterSchema, SchemaError};
pub use sketch::*;
