use quad_targets_core::{Mask, Quad};
use quad_targets_vision::ContourId;
use serde::{Deserialize, Serialize};

/// A matched outer/inner quad pair with its rasterized ring and score.
///
/// Candidates live only inside a detection pass; the ring mask is dropped
/// once the pass has resolved overlaps.
#[derive(Clone, Debug)]
pub struct TargetCandidate {
    pub outer_contour: ContourId,
    pub inner_contour: ContourId,
    pub outer: Quad,
    pub inner: Quad,
    /// Pixels inside `outer` and not inside `inner`.
    pub ring: Mask,
    /// Euclidean norm of the per-channel mean color over `ring`.
    pub score: f64,
}

impl TargetCandidate {
    /// `area(outer) - area(inner)` from the polygon vertices.
    pub fn ring_area(&self) -> f64 {
        self.outer.area() - self.inner.area()
    }
}

/// One accepted nested-quad target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadTarget {
    pub outer_contour: ContourId,
    pub inner_contour: ContourId,
    pub outer: Quad,
    pub inner: Quad,
    pub score: f64,
    pub ring_area: f64,
}

impl From<TargetCandidate> for QuadTarget {
    fn from(c: TargetCandidate) -> Self {
        let ring_area = c.ring_area();
        Self {
            outer_contour: c.outer_contour,
            inner_contour: c.inner_contour,
            outer: c.outer,
            inner: c.inner,
            score: c.score,
            ring_area,
        }
    }
}

/// Per-stage counters of one detection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionStats {
    /// Edge loops traced (outer borders only).
    pub contours: usize,
    /// Contours whose simplified polygon has exactly four vertices.
    pub quads: usize,
    pub pairs: usize,
    /// Pairs discarded before scoring (zero-area outer, inner not contained).
    pub degenerate: usize,
    pub candidates: usize,
    /// Candidates that lost an overlap comparison.
    pub suppressed: usize,
    /// Dominant candidates below the ring area threshold.
    pub too_small: usize,
    pub targets: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub targets: Vec<QuadTarget>,
    pub stats: DetectionStats,
}
