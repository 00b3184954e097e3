//! Haar wavelet detail-energy metric
//!
//! Blur removes high-frequency content first, so the finest detail bands of a
//! Haar decomposition lose energy long before the approximation band does.

use std::f64::consts::FRAC_1_SQRT_2;

use ndarray::{Array2, Axis};
use thiserror::Error;

use crate::diagnostics::DiagnosticSink;
use crate::grayscale::GrayPlane;
use crate::BlurMetric;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaveletError {
    #[error("decomposition needs at least one level")]
    NoLevels,
    #[error(
        "{rows}x{cols} image is too small for a {levels}-level decomposition \
         (each side must be at least {min_side})"
    )]
    TooSmall {
        rows: usize,
        cols: usize,
        levels: u32,
        min_side: usize,
    },
}

/// Detail coefficients of one decomposition level
#[derive(Debug, Clone)]
pub struct DetailBands {
    /// High-pass across rows, low-pass across columns (LH)
    pub horizontal: Array2<f64>,
    /// Low-pass across rows, high-pass across columns (HL)
    pub vertical: Array2<f64>,
    /// High-pass in both directions (HH)
    pub diagonal: Array2<f64>,
}

impl DetailBands {
    /// Sum of the mean absolute coefficient of each band
    pub fn mean_abs_energy(&self) -> f64 {
        [&self.horizontal, &self.vertical, &self.diagonal]
            .into_iter()
            .map(mean_abs)
            .sum()
    }
}

/// Full multi-level decomposition: detail bands finest level first, plus the
/// final approximation band.
#[derive(Debug, Clone)]
pub struct Decomposition {
    pub details: Vec<DetailBands>,
    pub approximation: Array2<f64>,
}

/// Multi-level 2-D Haar decomposition.
///
/// Odd-length axes are extended by repeating the last sample, so every band at
/// a level has `ceil(n / 2)` samples along each axis.
pub fn decompose(gray: &GrayPlane, levels: u32) -> Result<Decomposition, WaveletError> {
    if levels == 0 {
        return Err(WaveletError::NoLevels);
    }
    let (rows, cols) = gray.dim();
    let min_side = 1usize.checked_shl(levels).unwrap_or(usize::MAX);
    if rows.min(cols) < min_side {
        return Err(WaveletError::TooSmall { rows, cols, levels, min_side });
    }

    let mut details = Vec::with_capacity(levels as usize);
    let mut approximation = gray.clone();
    for _ in 0..levels {
        let (low, high) = haar_split(&approximation, Axis(0));
        let (low_low, low_high) = haar_split(&low, Axis(1));
        let (high_low, high_high) = haar_split(&high, Axis(1));
        details.push(DetailBands {
            horizontal: high_low,
            vertical: low_high,
            diagonal: high_high,
        });
        approximation = low_low;
    }

    Ok(Decomposition { details, approximation })
}

/// One Haar analysis step along `axis`, returning (approximation, detail)
fn haar_split(input: &Array2<f64>, axis: Axis) -> (Array2<f64>, Array2<f64>) {
    let len = input.len_of(axis);
    let half = (len + 1) / 2;
    let mut shape = input.raw_dim();
    shape[axis.index()] = half;

    let mut low = Array2::zeros(shape);
    let mut high = Array2::zeros(shape);
    for k in 0..half {
        let even = input.index_axis(axis, 2 * k);
        let odd = input.index_axis(axis, (2 * k + 1).min(len - 1));
        low.index_axis_mut(axis, k)
            .assign(&((&even + &odd) * FRAC_1_SQRT_2));
        high.index_axis_mut(axis, k)
            .assign(&((&even - &odd) * FRAC_1_SQRT_2));
    }
    (low, high)
}

fn mean_abs(band: &Array2<f64>) -> f64 {
    if band.is_empty() {
        return 0.0;
    }
    band.iter().map(|v| v.abs()).sum::<f64>() / band.len() as f64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveletDetailMetric {
    pub levels: u32,
}

impl WaveletDetailMetric {
    pub fn new(levels: u32) -> Self {
        Self { levels }
    }
}

impl Default for WaveletDetailMetric {
    fn default() -> Self {
        Self::new(2)
    }
}

impl BlurMetric for WaveletDetailMetric {
    fn name(&self) -> &'static str {
        "wavelet"
    }

    /// Detail energy of the finest level; 0 when the frame cannot be decomposed
    fn score(&self, gray: &GrayPlane, sink: &dyn DiagnosticSink) -> f64 {
        match decompose(gray, self.levels) {
            Ok(decomposition) => decomposition
                .details
                .first()
                .map(DetailBands::mean_abs_energy)
                .unwrap_or(0.0),
            Err(e) => {
                sink.warn(&format!(
                    "Wavelet decomposition failed due to image dimensions: {}",
                    e
                ));
                0.0
            }
        }
    }
}
