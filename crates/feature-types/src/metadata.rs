use serde::{Deserialize, Serialize};

/// Computed physical properties of a feature's shape.
///
/// Written by the evaluation pass, never by builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeMetadata {
    pub mass: f64,
    pub center_of_mass: [f64; 3],
    /// Row-major 3×3 inertia tensor, when the kernel provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix_of_inertia: Option<[f64; 9]>,
}

impl ShapeMetadata {
    pub fn new(mass: f64, center_of_mass: [f64; 3]) -> Self {
        Self {
            mass,
            center_of_mass,
            matrix_of_inertia: None,
        }
    }
}
