//! Sobel edge-strength metric
//!
//! Averages gradient magnitude over strong-gradient pixels only, so the score
//! tracks how crisp the real edges are rather than how much flat background
//! the frame contains.

use crate::diagnostics::DiagnosticSink;
use crate::grayscale::GrayPlane;
use crate::kernel::{correlate3x3, Kernel3};
use crate::BlurMetric;

const SOBEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientEdgeMetric {
    /// Magnitude a pixel must exceed to be counted
    pub edge_pixel_threshold: f64,
}

impl GradientEdgeMetric {
    pub fn new(edge_pixel_threshold: f64) -> Self {
        Self { edge_pixel_threshold }
    }
}

impl Default for GradientEdgeMetric {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl BlurMetric for GradientEdgeMetric {
    fn name(&self) -> &'static str {
        "edge"
    }

    fn score(&self, gray: &GrayPlane, sink: &dyn DiagnosticSink) -> f64 {
        let gx = correlate3x3(gray, &SOBEL_X);
        let gy = correlate3x3(gray, &SOBEL_Y);

        let (sum, count) = gx
            .iter()
            .zip(gy.iter())
            .map(|(x, y)| x.hypot(*y))
            .filter(|magnitude| *magnitude > self.edge_pixel_threshold)
            .fold((0.0, 0usize), |(sum, count), magnitude| (sum + magnitude, count + 1));

        if count == 0 {
            sink.info(&format!(
                "No pixel gradient exceeds {}; edge score is 0",
                self.edge_pixel_threshold
            ));
            return 0.0;
        }

        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use ndarray::Array2;

    fn step_plane(rows: usize, cols: usize, step_col: usize, high: f64) -> GrayPlane {
        Array2::from_shape_fn((rows, cols), |(_, col)| if col < step_col { 0.0 } else { high })
    }

    #[test]
    fn test_flat_image_scores_zero() {
        let plane = Array2::from_elem((16, 16), 128.0);
        assert_eq!(GradientEdgeMetric::default().score(&plane, &NullSink), 0.0);
    }

    #[test]
    fn test_vertical_step_edge() {
        // Columns either side of the step see a Sobel response of 4 * 100
        let plane = step_plane(8, 8, 4, 100.0);
        let score = GradientEdgeMetric::default().score(&plane, &NullSink);
        assert!((score - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_ignores_background() {
        // A wider frame with the same single edge must score the same
        let narrow = step_plane(8, 8, 4, 100.0);
        let wide = step_plane(8, 64, 4, 100.0);
        let metric = GradientEdgeMetric::default();
        assert_eq!(metric.score(&narrow, &NullSink), metric.score(&wide, &NullSink));
    }

    #[test]
    fn test_weak_gradients_below_threshold() {
        // A step of 2 gives magnitude 8, under the default cutoff of 10
        let plane = step_plane(8, 8, 4, 2.0);
        assert_eq!(GradientEdgeMetric::default().score(&plane, &NullSink), 0.0);

        let sensitive = GradientEdgeMetric::new(5.0);
        assert!((sensitive.score(&plane, &NullSink) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_horizontal_edge_detected() {
        let plane = Array2::from_shape_fn((8, 8), |(row, _)| if row < 4 { 0.0 } else { 50.0 });
        let score = GradientEdgeMetric::default().score(&plane, &NullSink);
        assert!((score - 200.0).abs() < 1e-9);
    }
}
