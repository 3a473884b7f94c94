//! Contour forest with explicit parent / first-child / next-sibling links.
//!
//! Tracing primitives usually encode "no link" as `-1` or rely on a numeric
//! comparison against `0`; here every link is an `Option<ContourId>` so that
//! contour 0 is an ordinary node.

use image::GrayImage;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Index of a contour inside a [`ContourForest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContourId(pub usize);

impl ContourId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Traced boundary of one connected region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<Point2<i32>>,
    /// True when the contour bounds a hole rather than a region.
    pub is_hole: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub parent: Option<ContourId>,
    pub first_child: Option<ContourId>,
    pub next_sibling: Option<ContourId>,
}

impl HierarchyNode {
    /// Convert an OpenCV-style `[next, previous, first_child, parent]` row,
    /// where any negative value means "none".
    pub fn from_raw(row: [i32; 4]) -> Self {
        let link = |v: i32| usize::try_from(v).ok().map(ContourId);
        Self {
            next_sibling: link(row[0]),
            first_child: link(row[2]),
            parent: link(row[3]),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("hierarchy has {nodes} nodes for {contours} contours")]
    LengthMismatch { contours: usize, nodes: usize },
    #[error("contour {from} links to out-of-range contour {to}")]
    OutOfRange { from: usize, to: usize },
    #[error("contour {0} is its own ancestor")]
    Cycle(usize),
    #[error("contour {child} is in the child chain of {parent} but records parent {recorded:?}")]
    Inconsistent {
        parent: usize,
        child: usize,
        recorded: Option<usize>,
    },
}

/// Forest of contours indexed by [`ContourId`].
#[derive(Clone, Debug, Default)]
pub struct ContourForest {
    contours: Vec<Contour>,
    nodes: Vec<HierarchyNode>,
}

impl ContourForest {
    /// Build from per-contour parent links. Children are chained in
    /// ascending index order.
    pub fn from_parents(
        contours: Vec<Contour>,
        parents: &[Option<usize>],
    ) -> Result<Self, HierarchyError> {
        let n = contours.len();
        if parents.len() != n {
            return Err(HierarchyError::LengthMismatch {
                contours: n,
                nodes: parents.len(),
            });
        }

        let mut nodes = vec![HierarchyNode::default(); n];
        let mut last_child: Vec<Option<usize>> = vec![None; n];
        for (i, parent) in parents.iter().enumerate() {
            let Some(p) = *parent else {
                continue;
            };
            if p >= n {
                return Err(HierarchyError::OutOfRange { from: i, to: p });
            }
            if p == i {
                return Err(HierarchyError::Cycle(i));
            }
            nodes[i].parent = Some(ContourId(p));
            match last_child[p] {
                None => nodes[p].first_child = Some(ContourId(i)),
                Some(prev) => nodes[prev].next_sibling = Some(ContourId(i)),
            }
            last_child[p] = Some(i);
        }

        let forest = Self { contours, nodes };
        forest.check_acyclic()?;
        Ok(forest)
    }

    /// Build from fully specified nodes, validating that parent, child and
    /// sibling links agree with each other.
    pub fn from_nodes(
        contours: Vec<Contour>,
        nodes: Vec<HierarchyNode>,
    ) -> Result<Self, HierarchyError> {
        let n = contours.len();
        if nodes.len() != n {
            return Err(HierarchyError::LengthMismatch {
                contours: n,
                nodes: nodes.len(),
            });
        }
        for (i, node) in nodes.iter().enumerate() {
            for link in [node.parent, node.first_child, node.next_sibling]
                .into_iter()
                .flatten()
            {
                if link.0 >= n {
                    return Err(HierarchyError::OutOfRange { from: i, to: link.0 });
                }
            }
        }

        let forest = Self { contours, nodes };
        forest.check_acyclic()?;

        let mut seen_in_chain = vec![false; n];
        for p in 0..n {
            let mut steps = 0usize;
            let mut cur = forest.nodes[p].first_child;
            while let Some(c) = cur {
                steps += 1;
                if steps > n || seen_in_chain[c.0] {
                    return Err(HierarchyError::Cycle(c.0));
                }
                seen_in_chain[c.0] = true;
                let recorded = forest.nodes[c.0].parent;
                if recorded != Some(ContourId(p)) {
                    return Err(HierarchyError::Inconsistent {
                        parent: p,
                        child: c.0,
                        recorded: recorded.map(ContourId::index),
                    });
                }
                cur = forest.nodes[c.0].next_sibling;
            }
        }
        for (i, node) in forest.nodes.iter().enumerate() {
            if let Some(p) = node.parent {
                if !seen_in_chain[i] {
                    return Err(HierarchyError::Inconsistent {
                        parent: p.0,
                        child: i,
                        recorded: Some(p.0),
                    });
                }
            }
        }
        Ok(forest)
    }

    fn check_acyclic(&self) -> Result<(), HierarchyError> {
        let n = self.nodes.len();
        for start in 0..n {
            let mut cur = self.nodes[start].parent;
            let mut steps = 0usize;
            while let Some(p) = cur {
                steps += 1;
                if p.0 == start || steps > n {
                    return Err(HierarchyError::Cycle(start));
                }
                cur = self.nodes[p.0].parent;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.contours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ContourId> {
        (0..self.contours.len()).map(ContourId)
    }

    pub fn contour(&self, id: ContourId) -> Option<&Contour> {
        self.contours.get(id.0)
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn node(&self, id: ContourId) -> Option<&HierarchyNode> {
        self.nodes.get(id.0)
    }

    /// One node per connected component: hole borders are dropped and each
    /// outer border hangs under the outer border of the component that
    /// encloses it. Relative order is preserved.
    ///
    /// On an edge map every closed edge loop traces twice (its outer border
    /// and the border of the hole it encloses); this keeps one of the two.
    pub fn outer_borders(&self) -> ContourForest {
        let mut remap = vec![None; self.contours.len()];
        let mut kept = Vec::new();
        for (i, c) in self.contours.iter().enumerate() {
            if !c.is_hole {
                remap[i] = Some(kept.len());
                kept.push(i);
            }
        }
        let parents: Vec<Option<usize>> = kept
            .iter()
            .map(|&i| {
                let mut cur = self.nodes[i].parent;
                while let Some(p) = cur {
                    if let Some(k) = remap[p.0] {
                        return Some(k);
                    }
                    cur = self.nodes[p.0].parent;
                }
                None
            })
            .collect();
        let contours = kept.iter().map(|&i| self.contours[i].clone()).collect();
        // ancestors of a valid forest stay acyclic after the remap
        ContourForest::from_parents(contours, &parents).unwrap_or_default()
    }

    /// Immediate children of `id`: its first child followed by that child's
    /// sibling chain. Grandchildren are not visited.
    pub fn children(&self, id: ContourId) -> Children<'_> {
        Children {
            forest: self,
            next: self.node(id).and_then(|n| n.first_child),
            remaining: self.nodes.len(),
        }
    }
}

/// Iterator over the immediate children of one contour.
pub struct Children<'a> {
    forest: &'a ContourForest,
    next: Option<ContourId>,
    remaining: usize,
}

impl Iterator for Children<'_> {
    type Item = ContourId;

    fn next(&mut self) -> Option<ContourId> {
        let cur = self.next?;
        if self.remaining == 0 {
            self.next = None;
            return None;
        }
        self.remaining -= 1;
        self.next = self.forest.node(cur).and_then(|n| n.next_sibling);
        Some(cur)
    }
}

/// Trace every border in a binary image (non-zero = foreground) and return
/// the full nesting tree.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(edges), fields(width = edges.width(), height = edges.height()))
)]
pub fn find_contour_forest(edges: &GrayImage) -> ContourForest {
    if edges.width() == 0 || edges.height() == 0 {
        return ContourForest::default();
    }
    let raw = imageproc::contours::find_contours::<i32>(edges);
    let parents: Vec<Option<usize>> = raw.iter().map(|c| c.parent).collect();
    let contours: Vec<Contour> = raw
        .into_iter()
        .map(|c| Contour {
            points: c.points.iter().map(|p| Point2::new(p.x, p.y)).collect(),
            is_hole: matches!(c.border_type, imageproc::contours::BorderType::Hole),
        })
        .collect();

    match ContourForest::from_parents(contours, &parents) {
        Ok(forest) => forest,
        Err(err) => {
            log::warn!("contour tracer returned an invalid hierarchy: {err}");
            ContourForest::default()
        }
    }
}
