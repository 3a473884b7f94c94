use image::{GrayImage, Luma};
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use nalgebra::Point2;
use quad_targets_core::Mask;

const ON: Luma<u8> = Luma([255]);

/// Rasterize a filled polygon (boundary included) into a full-size mask.
///
/// Repeated consecutive vertices are collapsed first; polygons that reduce to
/// a segment or a single pixel are drawn as such.
pub fn fill_polygon(width: usize, height: usize, poly: &[Point2<i32>]) -> Mask {
    let mut canvas = GrayImage::new(width as u32, height as u32);

    let mut pts: Vec<Point<i32>> = Vec::with_capacity(poly.len());
    for p in poly {
        if pts.last().is_none_or(|q| q.x != p.x || q.y != p.y) {
            pts.push(Point::new(p.x, p.y));
        }
    }
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }

    match pts.as_slice() {
        [] => {}
        [a] => {
            let (w, h) = canvas.dimensions();
            if a.x >= 0 && a.y >= 0 && (a.x as u32) < w && (a.y as u32) < h {
                canvas.put_pixel(a.x as u32, a.y as u32, ON);
            }
        }
        [a, b] => draw_line_segment_mut(
            &mut canvas,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            ON,
        ),
        _ => draw_polygon_mut(&mut canvas, &pts, ON),
    }

    Mask::from_raw(width, height, canvas.into_raw()).unwrap_or_else(|| Mask::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point2<i32> {
        Point2::new(x, y)
    }

    #[test]
    fn square_is_filled_including_boundary() {
        let m = fill_polygon(12, 12, &[p(2, 2), p(7, 2), p(7, 7), p(2, 7)]);
        for (x, y) in [(2, 2), (7, 7), (4, 5), (7, 2), (2, 7)] {
            assert!(m.get(x, y), "({x},{y}) should be set");
        }
        for (x, y) in [(1, 4), (8, 4), (4, 1), (4, 8), (10, 10)] {
            assert!(!m.get(x, y), "({x},{y}) should be clear");
        }
    }

    #[test]
    fn closing_vertex_and_duplicates_are_tolerated() {
        let m = fill_polygon(
            10,
            10,
            &[p(1, 1), p(1, 1), p(6, 1), p(6, 6), p(1, 6), p(1, 1)],
        );
        assert!(m.get(3, 3));
        let dot = fill_polygon(10, 10, &[p(4, 4), p(4, 4)]);
        assert_eq!(dot.count(), 1);
        assert!(fill_polygon(10, 10, &[]).is_empty());
    }

    #[test]
    fn polygons_are_clipped_to_the_image() {
        let m = fill_polygon(8, 8, &[p(-5, -5), p(20, -5), p(20, 20), p(-5, 20)]);
        assert_eq!(m.count(), 64);
    }
}
