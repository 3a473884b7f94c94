//! Nested-quad target detection.
//!
//! A target is a black quad border, a white ring and a black inner quad.
//! [`QuadTargetDetector`] finds every quad whose first quad child in the
//! contour hierarchy encloses a ring, scores the ring by its mean color,
//! keeps the best of each group of touching rings and drops rings below
//! a minimum area.
//!
//! ```no_run
//! use quad_targets_core::RgbImageView;
//! use quad_targets_detector::{DetectorParams, QuadTargetDetector};
//!
//! # fn main() -> Result<(), quad_targets_detector::QuadDetectError> {
//! let data = vec![255u8; 640 * 480 * 3];
//! let view = RgbImageView { width: 640, height: 480, data: &data };
//! let detector = QuadTargetDetector::new(DetectorParams::default());
//! let result = detector.detect(&view)?;
//! for t in &result.targets {
//!     println!("target score {:.1} ring area {:.0}", t.score, t.ring_area);
//! }
//! # Ok(())
//! # }
//! ```

mod area_filter;
mod dominance;
mod error;
mod matcher;
mod params;
mod pipeline;
mod result;
mod score;

pub use area_filter::{filter_targets, passes_area_filter, ring_area, FilterOutcome};
pub use dominance::{dominance_flags, resolve_dominance, ResolvedCandidate};
pub use error::QuadDetectError;
pub use matcher::{match_quad_pairs, QuadPair};
pub use params::DetectorParams;
pub use pipeline::QuadTargetDetector;
pub use result::{DetectionResult, DetectionStats, QuadTarget, TargetCandidate};
pub use score::{build_candidate, ring_mask, score_ring, CandidateRejection};
