use crate::io::QuadTargetsConfig;
use crate::observe::{observe_targets, ObservedDetection};
use image::RgbImage;
use quad_targets_core::RgbImageView;
use quad_targets_detector::{
    DetectionResult, DetectorParams, QuadDetectError, QuadTargetDetector,
};
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("cannot read image {}: {source}", path.display())]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Detect(#[from] QuadDetectError),
}

/// Load an image from disk as 8-bit RGB.
pub fn load_color_image(path: impl AsRef<Path>) -> Result<RgbImage, DetectError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| DetectError::UnreadableImage {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgb8())
}

/// Borrow an `image::RgbImage` as a `quad-targets-core` view.
pub fn rgb_view(img: &RgbImage) -> RgbImageView<'_> {
    RgbImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Run the detector on an RGB image.
pub fn detect_targets(
    img: &RgbImage,
    params: DetectorParams,
) -> Result<DetectionResult, DetectError> {
    run_detector(&QuadTargetDetector::new(params), img)
}

#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(detector, img),
        fields(width = img.width(), height = img.height())
    )
)]
fn run_detector(
    detector: &QuadTargetDetector,
    img: &RgbImage,
) -> Result<DetectionResult, DetectError> {
    Ok(detector.detect(&rgb_view(img))?)
}

/// Run detection and, when the config carries intrinsics and a target size,
/// pose estimation for every surviving target.
pub fn detect_and_observe(
    img: &RgbImage,
    cfg: &QuadTargetsConfig,
) -> Result<ObservedDetection, DetectError> {
    let result = run_detector(&cfg.build_detector(), img)?;
    let estimator = cfg.build_pose_estimator();
    if estimator.is_none() {
        log::debug!("no camera/target configured, skipping pose estimation");
    }
    Ok(observe_targets(result, estimator.as_ref()))
}
