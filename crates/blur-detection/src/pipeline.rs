//! Frame-level blur analysis
//!
//! Guards against empty frames, converts to grayscale, runs the three metrics
//! and hands their scores to the classifier.

use image::DynamicImage;

use crate::classifier::{BlurAssessment, BlurClassifier, MetricScores};
use crate::config::BlurThresholds;
use crate::diagnostics::DiagnosticSink;
use crate::gradient::GradientEdgeMetric;
use crate::grayscale::{to_gray_plane, GrayPlane};
use crate::laplacian::LaplacianVarianceMetric;
use crate::wavelet::WaveletDetailMetric;
use crate::BlurMetric;

pub struct BlurAnalyzer {
    edge: GradientEdgeMetric,
    wavelet: WaveletDetailMetric,
    laplacian: LaplacianVarianceMetric,
    classifier: BlurClassifier,
}

impl BlurAnalyzer {
    pub fn new(thresholds: BlurThresholds) -> Self {
        Self {
            edge: GradientEdgeMetric::new(thresholds.edge_pixel_threshold),
            wavelet: WaveletDetailMetric::new(thresholds.wavelet_levels),
            laplacian: LaplacianVarianceMetric,
            classifier: BlurClassifier::new(thresholds),
        }
    }

    pub fn thresholds(&self) -> &BlurThresholds {
        self.classifier.thresholds()
    }

    /// Assess a decoded frame.
    ///
    /// A missing or zero-sized frame is not an error: it yields
    /// [`BlurAssessment::unassessed`] without running any metric.
    pub fn assess(
        &self,
        frame: Option<&DynamicImage>,
        sink: &dyn DiagnosticSink,
    ) -> BlurAssessment {
        let frame = match frame {
            Some(frame) if frame.width() > 0 && frame.height() > 0 => frame,
            _ => {
                sink.info("Received empty or invalid frame; skipping blur assessment");
                return BlurAssessment::unassessed();
            }
        };

        let gray = to_gray_plane(frame);
        let (rows, cols) = gray.dim();
        sink.info(&format!("Converted to grayscale. Gray image shape: ({}, {})", rows, cols));

        self.assess_gray(&gray, sink)
    }

    /// Assess a grayscale plane that is already known to be non-empty
    pub fn assess_gray(&self, gray: &GrayPlane, sink: &dyn DiagnosticSink) -> BlurAssessment {
        let scores = self.score(gray, sink);
        sink.info(&format!(
            "Calculated scores: {}={:.2}, {}={:.2}, {}={:.2}",
            self.edge.name(),
            scores.edge,
            self.wavelet.name(),
            scores.wavelet,
            self.laplacian.name(),
            scores.laplacian,
        ));
        self.classifier.classify(scores)
    }

    /// Run the three metrics. They only read `gray`, so they run in parallel.
    fn score(&self, gray: &GrayPlane, sink: &dyn DiagnosticSink) -> MetricScores {
        let (edge, (wavelet, laplacian)) = rayon::join(
            || self.edge.score(gray, sink),
            || {
                rayon::join(
                    || self.wavelet.score(gray, sink),
                    || self.laplacian.score(gray, sink),
                )
            },
        );
        MetricScores { edge, wavelet, laplacian }
    }
}

impl Default for BlurAnalyzer {
    fn default() -> Self {
        Self::new(BlurThresholds::default())
    }
}
