use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

/// Physical size of the rectangle the detector reports as a target's outer
/// quad: the outer edge of the white ring, i.e. the inner edge of the black
/// border, not the outline of the printed target.
///
/// Units are scene units (metres unless the caller decides otherwise);
/// translations come out in the same unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetGeometry {
    pub width: f64,
    pub height: f64,
}

impl Default for TargetGeometry {
    fn default() -> Self {
        Self {
            width: 0.1,
            height: 0.1,
        }
    }
}

impl TargetGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Outer corners on the target plane in TL, BL, BR, TR order, centred on
    /// the target origin with x right and y down.
    pub fn plane_corners(&self) -> [Point2<f64>; 4] {
        let (hw, hh) = (0.5 * self.width, 0.5 * self.height);
        [
            Point2::new(-hw, -hh),
            Point2::new(-hw, hh),
            Point2::new(hw, hh),
            Point2::new(hw, -hh),
        ]
    }

    /// [`Self::plane_corners`] lifted to `z = 0`.
    pub fn object_corners(&self) -> [Point3<f64>; 4] {
        self.plane_corners().map(|p| Point3::new(p.x, p.y, 0.0))
    }
}
