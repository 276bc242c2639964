use feature_types::{Color, Parameters, SchemaError, ShapeKind, ShapeMetadata};
use geom_kernel::KernelError;

/// A single named node of the feature graph.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureObject {
    /// Unique within its document.
    pub name: String,
    /// Hidden objects still act as operands but are left out of the output manifest.
    pub visible: bool,
    pub parameters: Parameters,
    /// Computed physical properties, if an evaluation recorded them.
    pub metadata: Option<ShapeMetadata>,
}

impl FeatureObject {
    pub fn new(name: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            name: name.into(),
            visible: true,
            parameters,
            metadata: None,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.parameters.kind()
    }

    pub fn color(&self) -> Option<&Color> {
        self.parameters.color()
    }

    /// Names this object reads as operands.
    pub fn operands(&self) -> Vec<&str> {
        self.parameters.operands()
    }
}

/// Errors from document mutation and feature building.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("an object named {name:?} already exists")]
    DuplicateName { name: String },

    #[error("no object named {name:?}")]
    NotFound { name: String },

    #[error("operand {reference} does not resolve to an object")]
    UnknownOperand { reference: String },

    #[error("operation needs {required} operands but the document has {available} objects")]
    InsufficientOperands { required: usize, available: usize },

    #[error("{kind} object {name:?} has no color")]
    ColorNotSupported { name: String, kind: ShapeKind },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Why one object contributed no geometry to an evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReconstructionError {
    #[error("operand {operand:?} of {object:?} has no geometry")]
    MissingOperand { object: String, operand: String },

    #[error("{object:?} needs {required} operands, has {available}")]
    InsufficientOperands {
        object: String,
        required: usize,
        available: usize,
    },

    #[error("kernel failed on {object:?}: {source}")]
    Kernel {
        object: String,
        #[source]
        source: KernelError,
    },
}

impl ReconstructionError {
    /// The object the failure is recorded against.
    pub fn object(&self) -> &str {
        match self {
            ReconstructionError::MissingOperand { object, .. }
            | ReconstructionError::InsufficientOperands { object, .. }
            | ReconstructionError::Kernel { object, .. } => object,
        }
    }
}
