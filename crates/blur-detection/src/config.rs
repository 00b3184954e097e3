//! Threshold configuration for blur classification

use serde::{Deserialize, Serialize};

/// Fixed thresholds used by the metrics and the majority-vote classifier.
///
/// Each `*_threshold` used for voting is a strict lower bound: a score below
/// it counts as one vote for "poor quality".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlurThresholds {
    /// Gradient magnitude a pixel must exceed to count as an edge pixel
    pub edge_pixel_threshold: f64,
    /// Mean edge-pixel gradient below this votes "poor"
    pub edge_score_threshold: f64,
    /// Finest-level wavelet detail energy below this votes "poor"
    pub wavelet_score_threshold: f64,
    /// Laplacian response variance below this votes "poor"
    pub variance_threshold: f64,
    /// Number of Haar decomposition levels the wavelet metric requires
    pub wavelet_levels: u32,
}

impl Default for BlurThresholds {
    fn default() -> Self {
        Self {
            edge_pixel_threshold: 10.0,
            edge_score_threshold: 20.0,
            wavelet_score_threshold: 4.5,
            variance_threshold: 100.0,
            wavelet_levels: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let thresholds = BlurThresholds::default();
        assert_eq!(thresholds.edge_pixel_threshold, 10.0);
        assert_eq!(thresholds.edge_score_threshold, 20.0);
        assert_eq!(thresholds.wavelet_score_threshold, 4.5);
        assert_eq!(thresholds.variance_threshold, 100.0);
        assert_eq!(thresholds.wavelet_levels, 2);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let thresholds: BlurThresholds =
            serde_json::from_str(r#"{"variance_threshold": 250.0}"#).unwrap();
        assert_eq!(thresholds.variance_threshold, 250.0);
        assert_eq!(thresholds.edge_score_threshold, 20.0);
        assert_eq!(thresholds.wavelet_levels, 2);
    }
}
