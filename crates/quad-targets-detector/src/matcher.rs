//! Outer/inner quad pairing over the contour hierarchy.

use quad_targets_core::Polygon;
use quad_targets_vision::{ContourForest, ContourId};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A 4-vertex contour and the first 4-vertex contour in its child chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadPair {
    pub outer: ContourId,
    pub inner: ContourId,
}

fn is_quad(polygons: &[Polygon], id: ContourId) -> bool {
    polygons.get(id.index()).is_some_and(|p| p.len() == 4)
}

/// Pair every quad with the first quad among its immediate children.
///
/// Children with any other vertex count are skipped, grandchildren are never
/// considered, and a quad without a quad child produces nothing. `polygons`
/// must be indexed like `forest`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(forest, polygons), fields(contours = forest.len()))
)]
pub fn match_quad_pairs(forest: &ContourForest, polygons: &[Polygon]) -> Vec<QuadPair> {
    forest
        .ids()
        .filter(|&outer| is_quad(polygons, outer))
        .filter_map(|outer| {
            forest
                .children(outer)
                .find(|&child| is_quad(polygons, child))
                .map(|inner| QuadPair { outer, inner })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;
    use quad_targets_vision::{Contour, HierarchyNode};

    fn poly(n: usize) -> Polygon {
        (0..n as i32).map(|i| Point2::new(i, i * i)).collect()
    }

    fn contours(n: usize) -> Vec<Contour> {
        vec![
            Contour {
                points: Vec::new(),
                is_hole: false,
            };
            n
        ]
    }

    #[test]
    fn skips_non_quad_children_and_takes_first_quad() {
        // 0 -> {1 (triangle), 2 (quad), 3 (quad)}
        let forest =
            ContourForest::from_parents(contours(4), &[None, Some(0), Some(0), Some(0)]).unwrap();
        let polys = vec![poly(4), poly(3), poly(4), poly(4)];
        assert_eq!(
            match_quad_pairs(&forest, &polys),
            vec![QuadPair {
                outer: ContourId(0),
                inner: ContourId(2)
            }]
        );
    }

    #[test]
    fn does_not_descend_into_grandchildren() {
        // 0 -> 1 (pentagon) -> 2 (quad)
        let forest =
            ContourForest::from_parents(contours(3), &[None, Some(0), Some(1)]).unwrap();
        let polys = vec![poly(4), poly(5), poly(4)];
        assert!(match_quad_pairs(&forest, &polys).is_empty());
    }

    #[test]
    fn non_quad_outer_yields_nothing() {
        let forest = ContourForest::from_parents(contours(2), &[None, Some(0)]).unwrap();
        let polys = vec![poly(6), poly(4)];
        assert!(match_quad_pairs(&forest, &polys).is_empty());
    }

    #[test]
    fn contour_zero_is_a_valid_inner() {
        // node 2 is the parent; its chain is 1 (triangle) -> 0 (quad)
        let rows = [[-1, 1, -1, 2], [0, -1, -1, 2], [-1, -1, 1, -1]];
        let nodes = rows.iter().map(|&r| HierarchyNode::from_raw(r)).collect();
        let forest = ContourForest::from_nodes(contours(3), nodes).unwrap();
        let polys = vec![poly(4), poly(3), poly(4)];
        assert_eq!(
            match_quad_pairs(&forest, &polys),
            vec![QuadPair {
                outer: ContourId(2),
                inner: ContourId(0)
            }]
        );
    }

    #[test]
    fn each_level_pairs_independently() {
        // 0 -> 1 -> 2, all quads: (0,1) and (1,2)
        let forest =
            ContourForest::from_parents(contours(3), &[None, Some(0), Some(1)]).unwrap();
        let polys = vec![poly(4), poly(4), poly(4)];
        let pairs = match_quad_pairs(&forest, &polys);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1].outer, ContourId(1));
        assert_eq!(pairs[1].inner, ContourId(2));
    }
}
