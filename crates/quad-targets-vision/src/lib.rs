//! Vision primitives consumed by the quad-target detector.
//!
//! Everything here is a thin adapter over `imageproc` (edges, contour
//! tracing, polygon filling) plus the pieces the detector needs in a stricter
//! shape than the library offers:
//! - an explicit contour forest with `Option` links instead of `-1` sentinels,
//! - closed-curve Douglas-Peucker simplification.

pub mod approx;
pub mod contours;
pub mod edges;
pub mod raster;

pub use approx::{approximate_polygon, approximate_polygons, perimeter};
pub use contours::{
    find_contour_forest, Children, Contour, ContourForest, ContourId, HierarchyError,
    HierarchyNode,
};
pub use edges::{canny_edges, EdgeMap, VisionError};
pub use raster::fill_polygon;
