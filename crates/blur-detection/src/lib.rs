//! Blur scoring and classification library for blurcheck
//!
//! This crate scores a decoded frame with three independent sharpness metrics
//! (Sobel edge strength, Haar wavelet detail energy, Laplacian variance) and
//! combines them with a majority vote into an "extremely blurry" verdict.

pub mod classifier;
pub mod config;
pub mod diagnostics;
pub mod gradient;
pub mod grayscale;
mod kernel;
pub mod laplacian;
pub mod pipeline;
pub mod wavelet;

pub use classifier::{BlurAssessment, BlurClassifier, MetricScores};
pub use config::BlurThresholds;
pub use diagnostics::{DiagnosticSink, LogSink, NullSink};
pub use gradient::GradientEdgeMetric;
pub use grayscale::{to_gray_plane, GrayPlane};
pub use laplacian::LaplacianVarianceMetric;
pub use pipeline::BlurAnalyzer;
pub use wavelet::{WaveletDetailMetric, WaveletError};

/// A single sharpness indicator computed over a grayscale plane.
///
/// Implementations are pure: the score depends only on the plane and the
/// metric's own parameters. Anything worth reporting goes to `sink`.
pub trait BlurMetric: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &'static str;

    /// Compute the metric's score. Never fails; degenerate input yields 0.
    fn score(&self, gray: &GrayPlane, sink: &dyn DiagnosticSink) -> f64;
}
