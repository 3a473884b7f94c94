//! Debug overlay drawing. Never feeds back into detection.

use crate::observe::TargetObservation;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_polygon_mut, draw_line_segment_mut};
use imageproc::point::Point;
use nalgebra::{Point2, Point3};
use quad_targets_core::Quad;
use quad_targets_pose::PoseEstimator;
use std::path::Path;

const OUTER: Rgb<u8> = Rgb([0, 200, 0]);
const INNER: Rgb<u8> = Rgb([220, 0, 0]);
const CORNER: Rgb<u8> = Rgb([0, 120, 255]);
const AXIS_X: Rgb<u8> = Rgb([255, 0, 0]);
const AXIS_Y: Rgb<u8> = Rgb([0, 255, 0]);
const AXIS_Z: Rgb<u8> = Rgb([0, 0, 255]);

fn outline(canvas: &mut RgbImage, quad: &Quad, color: Rgb<u8>) {
    let mut pts: Vec<Point<f32>> = quad
        .corners
        .iter()
        .map(|p| Point::new(p.x as f32, p.y as f32))
        .collect();
    pts.dedup();
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    if pts.len() > 1 {
        draw_hollow_polygon_mut(canvas, &pts, color);
    }
}

fn segment(canvas: &mut RgbImage, a: Point2<f64>, b: Point2<f64>, color: Rgb<u8>) {
    draw_line_segment_mut(canvas, (a.x as f32, a.y as f32), (b.x as f32, b.y as f32), color);
}

/// Draw outer/inner quads, canonical outer corners and, when an estimator is
/// given, the pose axes of each target.
pub fn draw_overlay(
    image: &RgbImage,
    targets: &[TargetObservation],
    estimator: Option<&PoseEstimator>,
) -> RgbImage {
    let mut canvas = image.clone();
    for obs in targets {
        outline(&mut canvas, &obs.target.outer, OUTER);
        outline(&mut canvas, &obs.target.inner, INNER);
        for c in obs.target.outer.canonical_corners() {
            draw_cross_mut(&mut canvas, CORNER, c.x, c.y);
        }

        let (Some(pose), Some(est)) = (&obs.pose, estimator) else {
            continue;
        };
        let len = 0.5 * est.target().width.min(est.target().height);
        let project = |p: Point3<f64>| est.camera().project(&pose.transform(&p));
        let Some(origin) = project(Point3::origin()) else {
            continue;
        };
        for (axis, color) in [
            (Point3::new(len, 0.0, 0.0), AXIS_X),
            (Point3::new(0.0, len, 0.0), AXIS_Y),
            (Point3::new(0.0, 0.0, -len), AXIS_Z),
        ] {
            if let Some(end) = project(axis) {
                segment(&mut canvas, origin, end, color);
            }
        }
    }
    canvas
}

pub fn save_overlay(path: impl AsRef<Path>, overlay: &RgbImage) -> Result<(), image::ImageError> {
    overlay.save(path)
}
