use serde::{Deserialize, Serialize};

/// Configuration for [`crate::QuadTargetDetector`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorParams {
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Polygon simplification tolerance as a fraction of the contour perimeter.
    pub poly_epsilon_frac: f64,
    /// Minimum `area(outer) - area(inner)` in square pixels; inclusive.
    pub min_ring_area: f64,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            canny_low: 50.0,
            canny_high: 200.0,
            poly_epsilon_frac: 0.02,
            min_ring_area: 400.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let p: DetectorParams = serde_json::from_str(r#"{ "min_ring_area": 50.0 }"#).expect("json");
        assert_eq!(p.min_ring_area, 50.0);
        assert_eq!(p.canny_high, 200.0);
        assert_eq!(p.poly_epsilon_frac, 0.02);
    }
}
