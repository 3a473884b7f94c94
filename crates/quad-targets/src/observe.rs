use quad_targets_detector::{DetectionResult, DetectionStats, QuadTarget};
use quad_targets_pose::{PoseEstimator, TargetPose};
use serde::{Deserialize, Serialize};

/// A detected target with its pose, when one could be estimated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetObservation {
    #[serde(flatten)]
    pub target: QuadTarget,
    #[serde(default)]
    pub pose: Option<TargetPose>,
    /// Why `pose` is missing although an estimator was configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose_error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedDetection {
    pub stats: DetectionStats,
    pub targets: Vec<TargetObservation>,
}

/// Attach a pose to every detected target. A failure for one target is
/// recorded on that target and does not affect the others.
pub fn observe_targets(
    result: DetectionResult,
    estimator: Option<&PoseEstimator>,
) -> ObservedDetection {
    let targets = result
        .targets
        .into_iter()
        .map(|target| match estimator.map(|e| e.estimate(&target.outer)) {
            None => TargetObservation {
                target,
                pose: None,
                pose_error: None,
            },
            Some(Ok(pose)) => {
                log::debug!(
                    "target {:?}/{:?}: {:.3} away, rms {:.2}px",
                    target.outer_contour,
                    target.inner_contour,
                    pose.distance(),
                    pose.rms_reprojection_px
                );
                TargetObservation {
                    target,
                    pose: Some(pose),
                    pose_error: None,
                }
            }
            Some(Err(err)) => {
                log::warn!(
                    "target {:?}/{:?}: {err}",
                    target.outer_contour,
                    target.inner_contour
                );
                TargetObservation {
                    target,
                    pose: None,
                    pose_error: Some(err.to_string()),
                }
            }
        })
        .collect();
    ObservedDetection {
        stats: result.stats,
        targets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;
    use quad_targets_core::{CameraIntrinsics, Quad};
    use quad_targets_pose::TargetGeometry;
    use quad_targets_vision::ContourId;

    fn target(corners: [Point2<i32>; 4]) -> QuadTarget {
        QuadTarget {
            outer_contour: ContourId(0),
            inner_contour: ContourId(1),
            outer: Quad::new(corners),
            inner: Quad::new(corners),
            score: 1.0,
            ring_area: 0.0,
        }
    }

    #[test]
    fn pose_failure_is_isolated_to_its_target() {
        let good = target([
            Point2::new(280, 200),
            Point2::new(280, 280),
            Point2::new(360, 280),
            Point2::new(360, 200),
        ]);
        let collinear = target([
            Point2::new(0, 0),
            Point2::new(10, 0),
            Point2::new(20, 0),
            Point2::new(10, 10),
        ]);
        let result = DetectionResult {
            targets: vec![collinear, good],
            stats: DetectionStats::default(),
        };
        let est = PoseEstimator::new(
            CameraIntrinsics::new(800.0, 800.0, 320.0, 240.0),
            TargetGeometry::new(0.1, 0.1),
        );
        let observed = observe_targets(result, Some(&est));
        assert!(observed.targets[0].pose.is_none());
        assert!(observed.targets[0]
            .pose_error
            .as_deref()
            .is_some_and(|e| e.contains("pose unavailable")));
        let pose = observed.targets[1].pose.as_ref().expect("pose");
        assert!((pose.translation.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn no_estimator_means_no_pose_and_no_error() {
        let result = DetectionResult {
            targets: vec![target([Point2::new(0, 0); 4])],
            stats: DetectionStats::default(),
        };
        let observed = observe_targets(result, None);
        assert!(observed.targets[0].pose.is_none());
        assert!(observed.targets[0].pose_error.is_none());
    }
}
