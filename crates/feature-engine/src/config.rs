//! Configuration for the evaluation pass.

/// Grey used for manifest entries whose color is missing or unparseable.
pub const DEFAULT_RGB: [f64; 3] = [128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0];

/// Knobs for [`evaluate`](crate::rebuild::evaluate).
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationConfig {
    /// Manifest color for objects without a usable one.
    pub default_color: [f64; 3],
    /// Whether to ask the kernel for mass properties of every built shape.
    pub compute_metadata: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_RGB,
            compute_metadata: false,
        }
    }
}

impl EvaluationConfig {
    /// Geometry only; no mass properties.
    pub fn geometry_only() -> Self {
        Self::default()
    }

    /// Also compute mass and centre of mass for every object.
    pub fn with_metadata() -> Self {
        Self {
            compute_metadata: true,
            ..Self::default()
        }
    }
}
