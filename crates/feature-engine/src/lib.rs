//! Feature-history document core: an ordered store of named feature objects,
//! one builder per feature kind, and a replay pass that evaluates the
//! document through a geometry kernel.

pub mod builders;
pub mod config;
pub mod document;
pub mod history;
pub mod rebuild;
pub mod resolve;
pub mod types;

pub use builders::*;
pub use config::EvaluationConfig;
pub use document::{DanglingOperand, Document, DocumentState, Transaction};
pub use rebuild::{evaluate, Evaluation, OutputItem};
pub use resolve::OperandRef;
pub use types::{DocumentError, FeatureObject, ReconstructionError};
