#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PoseError {
    #[error("pose unavailable: invalid camera intrinsics")]
    InvalidIntrinsics,
    #[error("pose unavailable: invalid target size {width} x {height}")]
    InvalidGeometry { width: f64, height: f64 },
    #[error("pose unavailable: degenerate quad")]
    DegenerateQuad,
    #[error("pose unavailable: homography estimation failed")]
    HomographyFailed,
    #[error("pose unavailable: target behind the camera")]
    BehindCamera,
    #[error("pose unavailable: non-finite solution")]
    NonFinite,
}
