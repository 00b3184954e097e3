//! Grayscale conversion for metric math

use image::DynamicImage;
use ndarray::Array2;

/// Single-channel intensity plane indexed `[row, col]`, values on the 0..=255 scale
pub type GrayPlane = Array2<f64>;

/// Convert a decoded frame into a grayscale plane.
///
/// Color frames use BT.601 luma weights in 14-bit fixed point; alpha is
/// ignored. Frames that are already luminance are only normalized to 8 bits.
pub fn to_gray_plane(image: &DynamicImage) -> GrayPlane {
    let (width, height) = (image.width() as usize, image.height() as usize);

    let is_luma = matches!(
        image,
        DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_)
    );

    if is_luma {
        let luma = image.to_luma8();
        Array2::from_shape_fn((height, width), |(row, col)| {
            luma.get_pixel(col as u32, row as u32)[0] as f64
        })
    } else {
        let rgb = image.to_rgb8();
        Array2::from_shape_fn((height, width), |(row, col)| {
            let pixel = rgb.get_pixel(col as u32, row as u32);
            bt601_luma(pixel[0], pixel[1], pixel[2])
        })
    }
}

// 0.299, 0.587, 0.114 scaled by 2^14; the three sum to exactly 1 << 14
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Perceived brightness of an RGB triple, rounded to an 8-bit level
pub fn bt601_luma(r: u8, g: u8, b: u8) -> f64 {
    let weighted = r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B;
    ((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as f64
}
