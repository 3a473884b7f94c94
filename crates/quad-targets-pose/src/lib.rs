//! Pose estimation for nested quad targets.
//!
//! [`PoseEstimator`] turns the outer quad of a detected target into a
//! target-to-camera rotation and translation, given pinhole intrinsics and the
//! physical size of the target. Lens distortion is not modelled.

mod error;
mod estimator;
mod geometry;
mod pose;
pub mod solver;

pub use error::PoseError;
pub use estimator::PoseEstimator;
pub use geometry::TargetGeometry;
pub use pose::TargetPose;
pub use solver::{pose_from_homography, solve_planar_pose, PlanarSolution};
