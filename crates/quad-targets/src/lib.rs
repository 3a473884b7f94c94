//! High-level facade crate for the `quad-targets-*` workspace.
//!
//! This crate provides:
//! - re-exports of the geometry, vision, detector and pose crates
//! - JSON configuration and report types
//! - (feature-gated) helpers that load an image from disk, run detection,
//!   attach poses and draw a debug overlay
//!
//! ## Quickstart
//!
//! ```no_run
//! use quad_targets::detect;
//! use quad_targets::io::QuadTargetsConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = detect::load_color_image("frame.png")?;
//! let cfg = QuadTargetsConfig::default();
//! let observed = detect::detect_and_observe(&img, &cfg)?;
//! for t in &observed.targets {
//!     println!("score {:.1}, pose {:?}", t.target.score, t.pose);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `quad_targets::core`: quads, polygons, image views, masks, intrinsics.
//! - `quad_targets::vision`: edges, contour forest, polygon approximation.
//! - `quad_targets::detector`: pairing, scoring, dominance, area filter.
//! - `quad_targets::pose`: planar pose from the outer quad.
//! - `quad_targets::detect` (feature `image`): end-to-end helpers on `image::RgbImage`.
//! - `quad_targets::render` (feature `image`): debug overlay drawing.

pub use quad_targets_core as core;
pub use quad_targets_detector as detector;
pub use quad_targets_pose as pose;
pub use quad_targets_vision as vision;

pub use quad_targets_core::{CameraIntrinsics, Quad, RgbImageView};
pub use quad_targets_detector::{
    DetectionResult, DetectionStats, DetectorParams, QuadDetectError, QuadTarget,
    QuadTargetDetector,
};
pub use quad_targets_pose::{PoseError, PoseEstimator, TargetGeometry, TargetPose};

pub mod io;
mod observe;

pub use observe::{observe_targets, ObservedDetection, TargetObservation};

#[cfg(feature = "image")]
pub mod detect;

#[cfg(feature = "image")]
pub mod render;
