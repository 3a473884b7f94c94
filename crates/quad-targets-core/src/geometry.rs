use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Simplified contour boundary on the pixel grid.
pub type Polygon = Vec<Point2<i32>>;

#[inline]
fn cross(o: Point2<i32>, a: Point2<i32>, b: Point2<i32>) -> i64 {
    let ax = (a.x - o.x) as i64;
    let ay = (a.y - o.y) as i64;
    let bx = (b.x - o.x) as i64;
    let by = (b.y - o.y) as i64;
    ax * by - ay * bx
}

/// Shoelace area with sign. In image coordinates (y down) a polygon that
/// runs counter-clockwise on screen has a negative signed area.
pub fn signed_area(poly: &[Point2<i32>]) -> f64 {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0i64;
    let mut j = n - 1;
    for i in 0..n {
        acc += poly[j].x as i64 * poly[i].y as i64 - poly[i].x as i64 * poly[j].y as i64;
        j = i;
    }
    acc as f64 * 0.5
}

/// Absolute polygon area; point winding is not assumed.
pub fn polygon_area(poly: &[Point2<i32>]) -> f64 {
    signed_area(poly).abs()
}

/// True when every turn has the same orientation (collinear turns allowed).
pub fn is_convex(poly: &[Point2<i32>]) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0i64;
    for i in 0..n {
        let c = cross(poly[i], poly[(i + 1) % n], poly[(i + 2) % n]);
        if c == 0 {
            continue;
        }
        if sign == 0 {
            sign = c.signum();
        } else if c.signum() != sign {
            return false;
        }
    }
    sign != 0
}

fn on_segment(a: Point2<i32>, b: Point2<i32>, p: Point2<i32>) -> bool {
    cross(a, b, p) == 0
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}

/// Proper crossing: each segment has the other's endpoints strictly on
/// opposite sides.
fn segments_cross(a: Point2<i32>, b: Point2<i32>, c: Point2<i32>, d: Point2<i32>) -> bool {
    let d1 = cross(a, b, c).signum();
    let d2 = cross(a, b, d).signum();
    let d3 = cross(c, d, a).signum();
    let d4 = cross(c, d, b).signum();
    d1 * d2 < 0 && d3 * d4 < 0
}

fn strictly_inside(poly: &[Point2<i32>], p: Point2<i32>) -> bool {
    let n = poly.len();
    contains_point(poly, p) && (0..n).all(|i| !on_segment(poly[i], poly[(i + 1) % n], p))
}

/// Even-odd point-in-polygon test. Points on the boundary count as inside.
pub fn contains_point(poly: &[Point2<i32>], p: Point2<i32>) -> bool {
    let n = poly.len();
    if n == 0 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = poly[j];
        let b = poly[i];
        if on_segment(a, b, p) {
            return true;
        }
        if (b.y > p.y) != (a.y > p.y) {
            let t = (p.y - b.y) as f64 / (a.y - b.y) as f64;
            let x_cross = b.x as f64 + t * (a.x - b.x) as f64;
            if (p.x as f64) < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Four-vertex polygon in pixel coordinates.
///
/// Corner order is whatever produced the quad (usually the polygon
/// approximator); use [`Quad::canonical_corners`] when a fixed order matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad {
    pub corners: [Point2<i32>; 4],
}

impl Quad {
    pub fn new(corners: [Point2<i32>; 4]) -> Self {
        Self { corners }
    }

    /// Promote a polygon to a quad. Anything other than exactly four vertices
    /// is rejected.
    pub fn from_polygon(poly: &[Point2<i32>]) -> Option<Self> {
        let corners: [Point2<i32>; 4] = poly.try_into().ok()?;
        Some(Self { corners })
    }

    pub fn signed_area(&self) -> f64 {
        signed_area(&self.corners)
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.corners)
    }

    /// Zero-area quads (all corners collinear or coincident).
    pub fn is_degenerate(&self) -> bool {
        self.area() <= 0.0
    }

    pub fn is_convex(&self) -> bool {
        is_convex(&self.corners)
    }

    /// True when `inner` lies inside or on `self`.
    ///
    /// For a convex outer quad the corners decide. A non-convex outer quad
    /// additionally requires that no inner edge properly crosses an outer
    /// edge, that inner edge midpoints stay inside and that no outer corner
    /// pokes into `inner`.
    pub fn contains(&self, inner: &Quad) -> bool {
        if !inner
            .corners
            .iter()
            .all(|&p| contains_point(&self.corners, p))
        {
            return false;
        }
        if self.is_convex() {
            return true;
        }
        // doubled coordinates keep edge midpoints on the integer grid
        let doubled = self.corners.map(|p| Point2::new(2 * p.x, 2 * p.y));
        let edges_inside = (0..4).all(|i| {
            let a = inner.corners[i];
            let b = inner.corners[(i + 1) % 4];
            contains_point(&doubled, Point2::new(a.x + b.x, a.y + b.y))
                && (0..4).all(|k| {
                    !segments_cross(a, b, self.corners[k], self.corners[(k + 1) % 4])
                })
        });
        edges_inside
            && self
                .corners
                .iter()
                .all(|&c| !strictly_inside(&inner.corners, c))
    }

    /// Corners ordered counter-clockwise on screen (TL, BL, BR, TR for an
    /// upright quad), starting from the corner closest to the image origin.
    pub fn canonical_corners(&self) -> [Point2<i32>; 4] {
        let mut c = self.corners;
        if self.signed_area() > 0.0 {
            c.reverse();
        }
        let start = (0..4)
            .min_by_key(|&i| (c[i].x as i64 + c[i].y as i64, c[i].x))
            .unwrap_or(0);
        c.rotate_left(start);
        c
    }
}
