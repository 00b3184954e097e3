//! Variance-of-Laplacian sharpness metric

use crate::diagnostics::DiagnosticSink;
use crate::grayscale::GrayPlane;
use crate::kernel::{correlate3x3, Kernel3};
use crate::BlurMetric;

const LAPLACIAN: Kernel3 = [[0.0, 1.0, 0.0], [1.0, -4.0, 1.0], [0.0, 1.0, 0.0]];

/// Population variance of the Laplacian response over the whole frame.
/// Higher means more second-derivative detail, i.e. a sharper frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LaplacianVarianceMetric;

impl BlurMetric for LaplacianVarianceMetric {
    fn name(&self) -> &'static str {
        "laplacian"
    }

    fn score(&self, gray: &GrayPlane, _sink: &dyn DiagnosticSink) -> f64 {
        if gray.is_empty() {
            return 0.0;
        }
        let response = correlate3x3(gray, &LAPLACIAN);
        let n = response.len() as f64;
        let mean = response.sum() / n;
        response.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
    }
}
