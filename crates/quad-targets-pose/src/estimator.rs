use crate::solver::solve_planar_pose;
use crate::{PoseError, TargetGeometry, TargetPose};
use nalgebra::Point2;
use quad_targets_core::{CameraIntrinsics, Quad};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// True when any three of the four corners lie on one line.
fn has_collinear_triple(c: &[Point2<i32>; 4]) -> bool {
    let cross = |a: Point2<i32>, b: Point2<i32>, o: Point2<i32>| {
        (a.x as i64 - o.x as i64) * (b.y as i64 - o.y as i64)
            - (a.y as i64 - o.y as i64) * (b.x as i64 - o.x as i64)
    };
    (0..4).any(|skip| {
        let tri: Vec<Point2<i32>> = (0..4).filter(|&i| i != skip).map(|i| c[i]).collect();
        cross(tri[1], tri[2], tri[0]) == 0
    })
}

/// Pose of detected targets relative to a calibrated camera.
#[derive(Clone, Debug, PartialEq)]
pub struct PoseEstimator {
    camera: CameraIntrinsics,
    target: TargetGeometry,
}

impl PoseEstimator {
    pub fn new(camera: CameraIntrinsics, target: TargetGeometry) -> Self {
        Self { camera, target }
    }

    #[inline]
    pub fn camera(&self) -> &CameraIntrinsics {
        &self.camera
    }

    #[inline]
    pub fn target(&self) -> &TargetGeometry {
        &self.target
    }

    /// Estimate the pose of a target from its outer quad.
    ///
    /// The quad's corners are put into canonical order (counter-clockwise on
    /// screen from the top-left corner) and matched to the physical corners
    /// TL, BL, BR, TR.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn estimate(&self, outer: &Quad) -> Result<TargetPose, PoseError> {
        if !self.camera.is_valid() {
            return Err(PoseError::InvalidIntrinsics);
        }
        if !self.target.is_valid() {
            return Err(PoseError::InvalidGeometry {
                width: self.target.width,
                height: self.target.height,
            });
        }
        if outer.is_degenerate() || has_collinear_triple(&outer.corners) {
            return Err(PoseError::DegenerateQuad);
        }

        let pixels = outer
            .canonical_corners()
            .map(|p| Point2::new(p.x as f64, p.y as f64));
        let sol = solve_planar_pose(&self.camera, &self.target.plane_corners(), &pixels)?;
        log::trace!(
            "pose: t=({:.4}, {:.4}, {:.4}) rms={:.3}px after {} iterations",
            sol.translation.x,
            sol.translation.y,
            sol.translation.z,
            sol.rms_px,
            sol.iterations
        );
        Ok(TargetPose::new(sol.rotation, sol.translation, sol.rms_px))
    }
}
