//! Frame decoding for blurcheck
//!
//! Turns the textual payload a client sends (plain base64 or a
//! `data:image/...;base64,` URI) into a decoded image buffer.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageReader};
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload contains no image data")]
    EmptyPayload,
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("could not decode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Drop a leading `"<prefix>,"` segment (as in a data URI) if one is present
pub fn strip_data_uri(payload: &str) -> &str {
    match payload.split_once(',') {
        Some((_, data)) => data.trim(),
        None => payload.trim(),
    }
}

/// Decode standard-alphabet base64, tolerating line breaks and other ASCII whitespace
pub fn decode_base64(data: &str) -> Result<Vec<u8>, DecodeError> {
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }
    Ok(STANDARD.decode(compact)?)
}

/// Decode encoded image bytes, guessing the format from the content
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::EmptyPayload);
    }
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)?
        .decode()?;
    Ok(image)
}

/// Full payload-to-image path: strip data URI prefix, base64-decode, image-decode
pub fn decode_frame(payload: &str) -> Result<DynamicImage, DecodeError> {
    debug!("Received base64 data. Length: {} characters.", payload.len());

    let data = strip_data_uri(payload);
    if data.len() != payload.trim().len() {
        debug!("Removed data URI prefix.");
    }

    let bytes = decode_base64(data)?;
    debug!("Decoded base64 to bytes. Length: {} bytes.", bytes.len());

    let image = decode_image(&bytes)?;
    debug!("Decoded image: {}x{}", image.width(), image.height());
    Ok(image)
}
