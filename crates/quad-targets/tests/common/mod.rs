#![allow(dead_code)]

use image::{Rgb, RgbImage};
use nalgebra::{Point2, Point3, Rotation3, Vector3};
use quad_targets::vision::fill_polygon;
use quad_targets::{CameraIntrinsics, TargetGeometry};

pub const WIDTH: u32 = 640;
pub const HEIGHT: u32 = 480;

pub fn camera() -> CameraIntrinsics {
    CameraIntrinsics::new(800.0, 800.0, 320.0, 240.0)
}

/// Physical layout of the rendered target: outer black square, white ring
/// starting at `ring` of the outer size, inner black square at `inner`.
pub struct Layout {
    pub printed: TargetGeometry,
    pub ring: f64,
    pub inner: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            printed: TargetGeometry::new(0.2, 0.2),
            ring: 0.8,
            inner: 0.4,
        }
    }
}

impl Layout {
    /// Size of the white ring's outer edge, which is what the detector
    /// reports as the target's outer quad.
    pub fn detected_geometry(&self) -> TargetGeometry {
        TargetGeometry::new(self.printed.width * self.ring, self.printed.height * self.ring)
    }
}

fn projected_rect(
    cam: &CameraIntrinsics,
    geometry: &TargetGeometry,
    scale: f64,
    rot: &Rotation3<f64>,
    t: &Vector3<f64>,
) -> Vec<Point2<i32>> {
    geometry
        .plane_corners()
        .iter()
        .map(|p| {
            let obj = Point3::new(p.x * scale, p.y * scale, 0.0);
            let px = cam
                .project(&(rot.transform_point(&obj) + *t))
                .expect("target in front of the camera");
            Point2::new(px.x.round() as i32, px.y.round() as i32)
        })
        .collect()
}

/// Render a black / white / black target seen from `rot`, `t`.
pub fn render_target(layout: &Layout, rot: &Rotation3<f64>, t: &Vector3<f64>) -> RgbImage {
    let cam = camera();
    let (w, h) = (WIDTH as usize, HEIGHT as usize);
    let rect = |scale: f64| projected_rect(&cam, &layout.printed, scale, rot, t);
    let outer = fill_polygon(w, h, &rect(1.0));
    let ring = fill_polygon(w, h, &rect(layout.ring));
    let inner = fill_polygon(w, h, &rect(layout.inner));

    RgbImage::from_fn(WIDTH, HEIGHT, |x, y| {
        let (x, y) = (x as usize, y as usize);
        let black = inner.get(x, y) || (outer.get(x, y) && !ring.get(x, y));
        if black {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    })
}
