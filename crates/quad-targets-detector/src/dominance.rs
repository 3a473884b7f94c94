//! Overlap suppression between scored candidates.

use crate::result::TargetCandidate;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A candidate together with its overlap verdict.
#[derive(Clone, Debug)]
pub struct ResolvedCandidate {
    pub candidate: TargetCandidate,
    pub dominant: bool,
}

/// Decide which candidates survive pairwise overlap comparison.
///
/// Every pair `(i, j)` with `i < j` whose rings touch (share a pixel or sit
/// next to each other, see [`quad_targets_core::Mask::touches`]) is compared
/// exactly once, whatever earlier comparisons decided. The lower
/// score loses; on a tie the lower index loses. A candidate that loses any
/// comparison is not dominant. The result is indexed like `candidates`.
pub fn dominance_flags(candidates: &[TargetCandidate]) -> Vec<bool> {
    let mut dominant = vec![true; candidates.len()];
    for i in 0..candidates.len() {
        for j in (i + 1)..candidates.len() {
            let (a, b) = (&candidates[i], &candidates[j]);
            if !a.ring.touches(&b.ring) {
                continue;
            }
            if a.score > b.score {
                dominant[j] = false;
            } else {
                dominant[i] = false;
            }
        }
    }
    dominant
}

/// Attach a dominance verdict to every candidate, keeping input order.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(candidates), fields(candidates = candidates.len()))
)]
pub fn resolve_dominance(candidates: Vec<TargetCandidate>) -> Vec<ResolvedCandidate> {
    let flags = dominance_flags(&candidates);
    candidates
        .into_iter()
        .zip(flags)
        .map(|(candidate, dominant)| ResolvedCandidate {
            candidate,
            dominant,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;
    use quad_targets_core::{Mask, Quad};
    use quad_targets_vision::ContourId;

    fn rect_mask(x0: usize, y0: usize, x1: usize, y1: usize) -> Mask {
        let (w, h) = (32, 32);
        let mut data = vec![0u8; w * h];
        for y in y0..=y1 {
            for x in x0..=x1 {
                data[y * w + x] = 255;
            }
        }
        Mask::from_raw(w, h, data).unwrap()
    }

    fn cand(ring: Mask, score: f64) -> TargetCandidate {
        let q = Quad::new([Point2::new(0, 0); 4]);
        TargetCandidate {
            outer_contour: ContourId(0),
            inner_contour: ContourId(1),
            outer: q,
            inner: q,
            ring,
            score,
        }
    }

    #[test]
    fn disjoint_candidates_all_survive() {
        let c = vec![
            cand(rect_mask(0, 0, 4, 4), 1.0),
            cand(rect_mask(10, 10, 14, 14), 5.0),
        ];
        assert_eq!(dominance_flags(&c), vec![true, true]);
    }

    #[test]
    fn lower_score_loses_overlap() {
        let c = vec![
            cand(rect_mask(0, 0, 10, 10), 9.0),
            cand(rect_mask(5, 5, 15, 15), 3.0),
        ];
        assert_eq!(dominance_flags(&c), vec![true, false]);
    }

    #[test]
    fn adjacent_rings_compete() {
        // the black band and the white ring of one target share an edge
        // but no pixel
        let c = vec![
            cand(rect_mask(0, 0, 4, 20), 0.0),
            cand(rect_mask(5, 0, 9, 20), 441.0),
            cand(rect_mask(11, 0, 15, 20), 50.0),
        ];
        assert_eq!(dominance_flags(&c), vec![false, true, true]);
    }

    #[test]
    fn tie_suppresses_lower_index() {
        let c = vec![
            cand(rect_mask(0, 0, 10, 10), 4.0),
            cand(rect_mask(10, 10, 20, 20), 4.0),
        ];
        assert_eq!(dominance_flags(&c), vec![false, true]);
    }

    #[test]
    fn bounding_box_overlap_alone_is_not_enough() {
        // L-shaped ring against a block sitting in its empty corner
        let mut l = rect_mask(0, 0, 20, 2);
        let col = rect_mask(0, 0, 2, 20);
        let data: Vec<u8> = l
            .as_raw()
            .iter()
            .zip(col.as_raw())
            .map(|(&a, &b)| a.max(b))
            .collect();
        l = Mask::from_raw(32, 32, data).unwrap();
        let c = vec![cand(l, 1.0), cand(rect_mask(10, 10, 15, 15), 2.0)];
        assert_eq!(dominance_flags(&c), vec![true, true]);
    }

    #[test]
    fn suppressed_candidate_still_suppresses_others() {
        // 0 overlaps 1 and 2; 1 overlaps 0 only. 1 beats 0, 0 beats 2.
        let c = vec![
            cand(rect_mask(5, 0, 15, 10), 5.0),
            cand(rect_mask(0, 0, 6, 3), 9.0),
            cand(rect_mask(14, 8, 25, 20), 1.0),
        ];
        assert_eq!(dominance_flags(&c), vec![false, true, false]);
    }

    #[test]
    fn survivors_are_pairwise_disjoint() {
        let c = vec![
            cand(rect_mask(0, 0, 10, 10), 2.0),
            cand(rect_mask(8, 8, 18, 18), 7.0),
            cand(rect_mask(16, 16, 30, 30), 3.0),
            cand(rect_mask(20, 0, 30, 5), 1.0),
        ];
        let resolved = resolve_dominance(c);
        let kept: Vec<_> = resolved.iter().filter(|r| r.dominant).collect();
        for (i, a) in kept.iter().enumerate() {
            for b in &kept[i + 1..] {
                assert!(!a.candidate.ring.touches(&b.candidate.ring));
            }
        }
    }
}
