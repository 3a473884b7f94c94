use quad_targets_vision::VisionError;

#[derive(thiserror::Error, Debug)]
pub enum QuadDetectError {
    #[error("image buffer has {got} bytes, expected {expected} for an RGB image")]
    InvalidImageBuffer { expected: usize, got: usize },
    #[error("image dimensions overflow")]
    DimensionOverflow,
    #[error(transparent)]
    Vision(#[from] VisionError),
}
