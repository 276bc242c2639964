use serde::{Deserialize, Serialize};

/// A rigid placement: rotation of `angle` degrees about `axis` (through the
/// local origin), followed by translation by `position`.
///
/// The composition order is fixed. A point `p` is mapped to `R·p + t`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Placement {
    /// Translation applied after the rotation.
    pub position: [f64; 3],
    /// Rotation axis through the local origin. Need not be normalized.
    pub axis: [f64; 3],
    /// Rotation angle in degrees.
    pub angle: f64,
}

impl Placement {
    /// The identity placement.
    pub const IDENTITY: Placement = Placement {
        position: [0.0, 0.0, 0.0],
        axis: [0.0, 0.0, 1.0],
        angle: 0.0,
    };

    /// A pure translation.
    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Rotation about `axis` by `angle` degrees, then translation to `position`.
    pub fn new(position: [f64; 3], axis: [f64; 3], angle: f64) -> Self {
        Self {
            position,
            axis,
            angle,
        }
    }

    /// Whether the placement performs a rotation at all.
    ///
    /// A zero angle or a zero-length axis is treated as no rotation.
    pub fn has_rotation(&self) -> bool {
        let len_sq = self.axis.iter().map(|c| c * c).sum::<f64>();
        self.angle != 0.0 && len_sq > 1e-24
    }

    pub fn is_identity(&self) -> bool {
        !self.has_rotation() && self.position == [0.0, 0.0, 0.0]
    }

    pub fn is_finite(&self) -> bool {
        self.angle.is_finite()
            && self.position.iter().all(|c| c.is_finite())
            && self.axis.iter().all(|c| c.is_finite())
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::IDENTITY
    }
}
