use crate::area_filter::filter_targets;
use crate::dominance::resolve_dominance;
use crate::matcher::match_quad_pairs;
use crate::score::{build_candidate, CandidateRejection};
use crate::{DetectionResult, DetectionStats, DetectorParams, QuadDetectError};
use quad_targets_core::{Polygon, Quad, RgbImageView};
use quad_targets_vision::{
    approximate_polygons, canny_edges, find_contour_forest, ContourForest, EdgeMap,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Nested black/white/black quad target detector.
///
/// A detection pass runs edge detection, contour tracing with hierarchy
/// (one node per edge loop), polygon simplification, outer/inner quad
/// pairing, ring scoring, overlap suppression and the ring area filter.
/// Passes share no state.
#[derive(Clone, Debug, Default)]
pub struct QuadTargetDetector {
    params: DetectorParams,
}

impl QuadTargetDetector {
    pub fn new(params: DetectorParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Detect targets in an RGB (or BGR) frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, image),
            fields(width = image.width, height = image.height)
        )
    )]
    pub fn detect(
        &self,
        image: &RgbImageView<'_>,
    ) -> Result<DetectionResult, QuadDetectError> {
        let expected = RgbImageView::expected_len(image.width, image.height)
            .ok_or(QuadDetectError::DimensionOverflow)?;
        if image.data.len() != expected {
            return Err(QuadDetectError::InvalidImageBuffer {
                expected,
                got: image.data.len(),
            });
        }
        if image.width == 0 || image.height == 0 {
            return Ok(DetectionResult::default());
        }

        let gray = image.to_gray();
        let edges = canny_edges(&gray.view(), self.params.canny_low, self.params.canny_high)?;
        Ok(self.detect_in_edges(image, &edges))
    }

    /// Run the pipeline on a precomputed edge map of `image`.
    ///
    /// Each closed edge loop yields an outer and a hole border; only the
    /// outer border is kept, so the rings of one physical target chain
    /// edge to edge instead of alternating with one-pixel slivers.
    pub fn detect_in_edges(
        &self,
        image: &RgbImageView<'_>,
        edges: &EdgeMap,
    ) -> DetectionResult {
        let forest = find_contour_forest(edges).outer_borders();
        self.detect_in_forest(image, &forest)
    }

    /// Run the pipeline on an already traced contour forest.
    pub fn detect_in_forest(
        &self,
        image: &RgbImageView<'_>,
        forest: &ContourForest,
    ) -> DetectionResult {
        let polygons = approximate_polygons(forest, self.params.poly_epsilon_frac);
        self.detect_with_polygons(image, forest, &polygons)
    }

    /// Run pairing, scoring, suppression and filtering on simplified
    /// polygons indexed like `forest`.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, image, forest, polygons),
            fields(contours = forest.len())
        )
    )]
    pub fn detect_with_polygons(
        &self,
        image: &RgbImageView<'_>,
        forest: &ContourForest,
        polygons: &[Polygon],
    ) -> DetectionResult {
        let mut stats = DetectionStats {
            contours: forest.len(),
            quads: polygons.iter().filter(|p| p.len() == 4).count(),
            ..DetectionStats::default()
        };

        let pairs = match_quad_pairs(forest, polygons);
        stats.pairs = pairs.len();

        let mut candidates = Vec::with_capacity(pairs.len());
        for pair in &pairs {
            let (Some(outer), Some(inner)) = (
                polygons.get(pair.outer.index()).and_then(|p| Quad::from_polygon(p)),
                polygons.get(pair.inner.index()).and_then(|p| Quad::from_polygon(p)),
            ) else {
                stats.degenerate += 1;
                continue;
            };
            match build_candidate(image, pair.outer, pair.inner, outer, inner) {
                Ok(c) => candidates.push(c),
                Err(reason) => {
                    stats.degenerate += 1;
                    let why = match reason {
                        CandidateRejection::DegenerateOuter => "zero-area outer quad",
                        CandidateRejection::InnerNotContained => "inner quad escapes outer",
                    };
                    log::debug!("pair {:?}/{:?}: {why}", pair.outer, pair.inner);
                }
            }
        }
        stats.candidates = candidates.len();

        let resolved = resolve_dominance(candidates);
        let outcome = filter_targets(resolved, self.params.min_ring_area);
        stats.suppressed = outcome.suppressed;
        stats.too_small = outcome.too_small;
        stats.targets = outcome.targets.len();

        log::debug!(
            "contours={} quads={} pairs={} candidates={} suppressed={} too_small={} targets={}",
            stats.contours,
            stats.quads,
            stats.pairs,
            stats.candidates,
            stats.suppressed,
            stats.too_small,
            stats.targets
        );
        if stats.pairs > 0 && stats.degenerate == stats.pairs {
            log::warn!("all {} quad pairs were degenerate", stats.pairs);
        }

        DetectionResult {
            targets: outcome.targets,
            stats,
        }
    }
}
