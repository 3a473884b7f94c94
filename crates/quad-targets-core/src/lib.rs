//! Core types and utilities for nested-quad target detection.
//!
//! This crate is purely geometric: polygons and quads on the integer pixel
//! grid, lightweight image views, ring masks, pinhole intrinsics and
//! homographies. It does not depend on any image decoding or vision library.

mod camera;
mod geometry;
mod homography;
mod image;
mod logger;

pub use camera::CameraIntrinsics;
pub use geometry::{contains_point, is_convex, polygon_area, signed_area, Polygon, Quad};
pub use homography::{homography_from_4pt, Homography};
pub use image::{GrayImage, GrayImageView, Mask, PixelRect, RgbImageView};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, parse_level};
