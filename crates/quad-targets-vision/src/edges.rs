use image::GrayImage;
use quad_targets_core::GrayImageView;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Binary edge raster: 255 on edges, 0 elsewhere.
pub type EdgeMap = GrayImage;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum VisionError {
    #[error("invalid grayscale buffer (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
}

/// Canny edge detection with hysteresis thresholds `low` / `high`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(gray), fields(width = gray.width, height = gray.height))
)]
pub fn canny_edges(gray: &GrayImageView<'_>, low: f32, high: f32) -> Result<EdgeMap, VisionError> {
    let expected = gray.width * gray.height;
    if gray.data.len() != expected {
        return Err(VisionError::InvalidBuffer {
            expected,
            got: gray.data.len(),
        });
    }
    let (w, h) = (gray.width as u32, gray.height as u32);
    if w == 0 || h == 0 {
        return Ok(GrayImage::new(w, h));
    }
    let img = GrayImage::from_raw(w, h, gray.data.to_vec()).ok_or(VisionError::InvalidBuffer {
        expected,
        got: gray.data.len(),
    })?;
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    Ok(imageproc::edges::canny(&img, low, high))
}
