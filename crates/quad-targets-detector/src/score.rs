//! Ring rasterization and color scoring.

use crate::result::TargetCandidate;
use quad_targets_core::{Mask, Quad, RgbImageView};
use quad_targets_vision::{fill_polygon, ContourId};

/// Why a matched pair did not become a candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateRejection {
    DegenerateOuter,
    InnerNotContained,
}

/// Euclidean norm of the per-channel mean color of `image` over `mask`.
///
/// Returns 0 for an empty mask. Channels are treated symmetrically, so the
/// result does not depend on RGB vs BGR order. Pixels outside `image` are
/// ignored.
pub fn score_ring(image: &RgbImageView<'_>, mask: &Mask) -> f64 {
    let mut sum = [0u64; 3];
    let mut n = 0u64;
    for (x, y) in mask.iter_set() {
        if x >= image.width || y >= image.height {
            continue;
        }
        let px = image.pixel(x, y);
        for (s, v) in sum.iter_mut().zip(px) {
            *s += v as u64;
        }
        n += 1;
    }
    if n == 0 {
        return 0.0;
    }
    sum.iter()
        .map(|&s| {
            let mean = s as f64 / n as f64;
            mean * mean
        })
        .sum::<f64>()
        .sqrt()
}

/// Rasterize the ring between `outer` and `inner` on an image-sized grid.
pub fn ring_mask(width: usize, height: usize, outer: &Quad, inner: &Quad) -> Mask {
    let outer_mask = fill_polygon(width, height, &outer.corners);
    let inner_mask = fill_polygon(width, height, &inner.corners);
    // both masks share the image dimensions
    Mask::ring(&outer_mask, &inner_mask).unwrap_or_else(|| Mask::new(width, height))
}

/// Validate a pair, rasterize its ring and score it against `image`.
pub fn build_candidate(
    image: &RgbImageView<'_>,
    outer_contour: ContourId,
    inner_contour: ContourId,
    outer: Quad,
    inner: Quad,
) -> Result<TargetCandidate, CandidateRejection> {
    if outer.is_degenerate() {
        return Err(CandidateRejection::DegenerateOuter);
    }
    if !outer.contains(&inner) {
        return Err(CandidateRejection::InnerNotContained);
    }
    let ring = ring_mask(image.width, image.height, &outer, &inner);
    let score = score_ring(image, &ring);
    Ok(TargetCandidate {
        outer_contour,
        inner_contour,
        outer,
        inner,
        ring,
        score,
    })
}
