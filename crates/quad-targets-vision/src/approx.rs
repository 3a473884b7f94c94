//! Closed-curve polygon simplification.

use imageproc::point::Point;
use nalgebra::Point2;
use quad_targets_core::Polygon;

use crate::contours::ContourForest;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Closed perimeter length of a contour.
pub fn perimeter(contour: &[Point2<i32>]) -> f64 {
    if contour.len() < 2 {
        return 0.0;
    }
    let pts: Vec<Point<i32>> = contour.iter().map(|p| Point::new(p.x, p.y)).collect();
    imageproc::geometry::arc_length(&pts, true)
}

fn dist_sq(a: Point2<i32>, b: Point2<i32>) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    dx * dx + dy * dy
}

fn farthest_from(curve: &[Point2<i32>], from: usize) -> usize {
    let origin = curve[from];
    (0..curve.len())
        .max_by_key(|&i| (dist_sq(curve[i], origin), std::cmp::Reverse(i)))
        .unwrap_or(from)
}

/// Distance from `p` to the line through `a` and `b` (to `a` if they coincide).
fn line_distance(a: Point2<i32>, b: Point2<i32>, p: Point2<i32>) -> f64 {
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    let len = (dx * dx + dy * dy).sqrt();
    let px = (p.x - a.x) as f64;
    let py = (p.y - a.y) as f64;
    if len < f64::EPSILON {
        return (px * px + py * py).sqrt();
    }
    (px * dy - py * dx).abs() / len
}

/// Douglas-Peucker over the cyclic index range `[first, last]` of `curve`
/// (indices taken modulo its length). Pushes the kept vertices in curve
/// order, including `first` and excluding `last`.
fn simplify_range(curve: &[Point2<i32>], first: usize, last: usize, eps: f64, out: &mut Polygon) {
    let n = curve.len();
    let mut stack = vec![(first, last)];
    while let Some((s, e)) = stack.pop() {
        let a = curve[s % n];
        let b = curve[e % n];
        let mut max_d = 0.0;
        let mut split = None;
        for k in (s + 1)..e {
            let d = line_distance(a, b, curve[k % n]);
            if d > max_d {
                max_d = d;
                split = Some(k);
            }
        }
        match split {
            Some(k) if max_d > eps => {
                // right half first so the left half is emitted first
                stack.push((k, e));
                stack.push((s, k));
            }
            _ => out.push(a),
        }
    }
}

/// Simplify a closed contour to a polygon whose edges stay within `epsilon`
/// pixels of the original boundary.
///
/// The curve is split at two mutually distant points and each half is
/// simplified independently, so the result does not depend on where the
/// tracer happened to start the contour.
///
/// `imageproc::geometry::approximate_polygon_dp` is not used here: it treats
/// its input as an open curve anchored at the first point, so a closed
/// contour traced from the middle of a side keeps that start point as an
/// extra vertex and a square comes back with five corners instead of four.
pub fn approximate_polygon(contour: &[Point2<i32>], epsilon: f64) -> Polygon {
    let n = contour.len();
    if n <= 2 {
        return contour.to_vec();
    }
    let eps = epsilon.max(0.0);

    let i = farthest_from(contour, 0);
    let j = farthest_from(contour, i);
    if i == j || (dist_sq(contour[i], contour[j]) as f64).sqrt() <= eps {
        return vec![contour[i]];
    }

    let (a, b) = if i < j { (i, j) } else { (j, i) };
    let mut out = Polygon::new();
    simplify_range(contour, a, b, eps, &mut out);
    simplify_range(contour, b, a + n, eps, &mut out);
    out
}

/// Approximate every contour of the forest with `epsilon = epsilon_frac * perimeter`.
/// The result is indexed like the forest.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(forest), fields(contours = forest.len()))
)]
pub fn approximate_polygons(forest: &ContourForest, epsilon_frac: f64) -> Vec<Polygon> {
    forest
        .contours()
        .iter()
        .map(|c| approximate_polygon(&c.points, epsilon_frac * perimeter(&c.points)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point2<i32> {
        Point2::new(x, y)
    }

    /// Pixel boundary of an axis-aligned rectangle, clockwise on screen,
    /// starting at `start` steps past the top-left corner.
    fn rect_boundary(x0: i32, y0: i32, x1: i32, y1: i32, start: usize) -> Vec<Point2<i32>> {
        let mut pts = Vec::new();
        for x in x0..x1 {
            pts.push(p(x, y0));
        }
        for y in y0..y1 {
            pts.push(p(x1, y));
        }
        for x in (x0 + 1..=x1).rev() {
            pts.push(p(x, y1));
        }
        for y in (y0 + 1..=y1).rev() {
            pts.push(p(x0, y));
        }
        let n = pts.len();
        pts.rotate_left(start % n);
        pts
    }

    #[test]
    fn rectangle_collapses_to_its_corners() {
        for start in [0, 3, 17, 40] {
            let contour = rect_boundary(10, 10, 30, 24, start);
            let poly = approximate_polygon(&contour, 0.02 * perimeter(&contour));
            assert_eq!(poly.len(), 4, "start offset {start}: {poly:?}");
            for corner in [p(10, 10), p(30, 10), p(30, 24), p(10, 24)] {
                assert!(poly.contains(&corner), "missing {corner:?} in {poly:?}");
            }
        }
    }

    #[test]
    fn triangle_keeps_three_vertices() {
        let mut contour = Vec::new();
        for i in 0..20 {
            contour.push(p(i, 0));
        }
        for i in 0..20 {
            contour.push(p(20 - i, i));
        }
        for i in 0..20 {
            contour.push(p(0, 20 - i));
        }
        let poly = approximate_polygon(&contour, 0.5);
        assert_eq!(poly.len(), 3, "{poly:?}");
    }

    #[test]
    fn circle_keeps_many_vertices() {
        let contour: Vec<Point2<i32>> = (0..360)
            .map(|deg| {
                let t = (deg as f64).to_radians();
                p(
                    (100.0 + 60.0 * t.cos()).round() as i32,
                    (100.0 + 60.0 * t.sin()).round() as i32,
                )
            })
            .collect();
        let poly = approximate_polygon(&contour, 0.02 * perimeter(&contour));
        assert!(poly.len() > 4, "{poly:?}");
    }

    #[test]
    fn tiny_contours_pass_through() {
        assert!(approximate_polygon(&[], 1.0).is_empty());
        assert_eq!(approximate_polygon(&[p(1, 1)], 1.0), vec![p(1, 1)]);
        // a blob smaller than epsilon collapses to a single vertex
        let blob = rect_boundary(0, 0, 2, 2, 0);
        assert_eq!(approximate_polygon(&blob, 5.0).len(), 1);
    }

    #[test]
    fn perimeter_of_rectangle_boundary() {
        let contour = rect_boundary(0, 0, 10, 5, 0);
        assert!((perimeter(&contour) - 30.0).abs() < 1e-9);
    }
}
