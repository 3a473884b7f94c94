use crate::dominance::ResolvedCandidate;
use crate::result::QuadTarget;
use quad_targets_core::Quad;

/// `area(outer) - area(inner)` from the polygon vertices.
#[inline]
pub fn ring_area(outer: &Quad, inner: &Quad) -> f64 {
    outer.area() - inner.area()
}

/// Inclusive: a ring exactly at the threshold passes.
#[inline]
pub fn passes_area_filter(outer: &Quad, inner: &Quad, min_ring_area: f64) -> bool {
    ring_area(outer, inner) >= min_ring_area
}

/// Outcome of [`filter_targets`].
#[derive(Clone, Debug, Default)]
pub struct FilterOutcome {
    pub targets: Vec<QuadTarget>,
    pub suppressed: usize,
    pub too_small: usize,
}

/// Keep dominant candidates whose ring area reaches `min_ring_area`.
pub fn filter_targets(resolved: Vec<ResolvedCandidate>, min_ring_area: f64) -> FilterOutcome {
    let mut out = FilterOutcome::default();
    for r in resolved {
        if !r.dominant {
            out.suppressed += 1;
            continue;
        }
        let c = r.candidate;
        if !passes_area_filter(&c.outer, &c.inner, min_ring_area) {
            log::trace!(
                "dropping {:?}/{:?}: ring area {:.1} < {min_ring_area}",
                c.outer_contour,
                c.inner_contour,
                c.ring_area()
            );
            out.too_small += 1;
            continue;
        }
        out.targets.push(c.into());
    }
    out
}
