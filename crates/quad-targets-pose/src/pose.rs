use nalgebra::{Point3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Target-to-camera rigid transform: `X_cam = R * X_target + t`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetPose {
    pub rotation: Rotation3<f64>,
    /// Rodrigues vector of `rotation` (axis times angle in radians).
    pub rvec: Vector3<f64>,
    pub translation: Vector3<f64>,
    /// RMS reprojection error of the four outer corners, in pixels.
    pub rms_reprojection_px: f64,
}

impl TargetPose {
    pub fn new(
        rotation: Rotation3<f64>,
        translation: Vector3<f64>,
        rms_reprojection_px: f64,
    ) -> Self {
        Self {
            rotation,
            rvec: rotation.scaled_axis(),
            translation,
            rms_reprojection_px,
        }
    }

    /// Map a point from target coordinates into camera coordinates.
    #[inline]
    pub fn transform(&self, p: &Point3<f64>) -> Point3<f64> {
        self.rotation.transform_point(p) + self.translation
    }

    /// Distance from the camera centre to the target origin.
    pub fn distance(&self) -> f64 {
        self.translation.norm()
    }
}
