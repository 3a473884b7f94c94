//! JSON configuration and report helpers.

use crate::observe::{ObservedDetection, TargetObservation};
use quad_targets_core::CameraIntrinsics;
use quad_targets_detector::{DetectionStats, DetectorParams, QuadTargetDetector};
use quad_targets_pose::{PoseEstimator, TargetGeometry};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(thiserror::Error, Debug)]
pub enum ConfigIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Detector and pose configuration for one run.
///
/// Poses are estimated only when both `camera` and `target` are present.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTargetsConfig {
    pub detector: DetectorParams,
    pub camera: Option<CameraIntrinsics>,
    pub target: Option<TargetGeometry>,
}

impl QuadTargetsConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Detector configured from the `detector` section.
    pub fn build_detector(&self) -> QuadTargetDetector {
        QuadTargetDetector::new(self.detector.clone())
    }

    pub fn build_pose_estimator(&self) -> Option<PoseEstimator> {
        Some(PoseEstimator::new(self.camera?, self.target?))
    }
}

/// Result of one CLI run, as written to disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectReport {
    pub image_path: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Set when the image could not be processed; `targets` is then empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub stats: DetectionStats,
    #[serde(default)]
    pub targets: Vec<TargetObservation>,
}

impl DetectReport {
    pub fn new(
        image_path: impl Into<String>,
        width: u32,
        height: u32,
        observed: ObservedDetection,
    ) -> Self {
        Self {
            image_path: image_path.into(),
            width,
            height,
            error: None,
            stats: observed.stats,
            targets: observed.targets,
        }
    }

    /// Report for an input that never reached the detector.
    pub fn failed(image_path: impl Into<String>, error: impl ToString) -> Self {
        Self {
            image_path: image_path.into(),
            width: 0,
            height: 0,
            error: Some(error.to_string()),
            stats: DetectionStats::default(),
            targets: Vec::new(),
        }
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults_without_pose() {
        let cfg: QuadTargetsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, QuadTargetsConfig::default());
        assert!(cfg.build_pose_estimator().is_none());
    }

    #[test]
    fn camera_and_target_enable_pose() {
        let cfg: QuadTargetsConfig = serde_json::from_str(
            r#"{
                "detector": { "min_ring_area": 250.0 },
                "camera": { "fx": 800.0, "fy": 800.0, "cx": 320.0, "cy": 240.0 },
                "target": { "width": 0.2, "height": 0.15 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.detector.min_ring_area, 250.0);
        assert_eq!(cfg.detector.canny_low, 50.0);
        let est = cfg.build_pose_estimator().expect("estimator");
        assert_eq!(est.target().height, 0.15);
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        let cfg = QuadTargetsConfig {
            camera: Some(CameraIntrinsics::new(500.0, 510.0, 100.0, 90.0)),
            ..QuadTargetsConfig::default()
        };
        cfg.write_json(&path).unwrap();
        assert_eq!(QuadTargetsConfig::load_json(&path).unwrap(), cfg);
    }

    #[test]
    fn failed_report_has_error_and_no_targets() {
        let r = DetectReport::failed("missing.png", "no such file");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["error"], "no such file");
        assert_eq!(json["targets"].as_array().map(Vec::len), Some(0));
    }
}
