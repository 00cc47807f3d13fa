//! Image decode and re-encode.
//!
//! Untrusted bytes are decoded with content-based format detection and then
//! re-encoded from the decoded pixels. Nothing from the original container is
//! carried forward, which discards EXIF blocks and embedded profiles, and the
//! resulting extension comes from the detected format rather than anything
//! the client declared.

use std::io::Cursor;

use image::{GenericImageView, ImageFormat, ImageReader};

use orderdesk_core::AppError;

/// A decoded and re-encoded image.
#[derive(Debug, Clone)]
pub struct ReencodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

fn invalid_image() -> AppError {
    AppError::ImageProcessing("invalid image".to_string())
}

/// Canonical extension for a detected format.
pub fn extension_for(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("img")
}

/// Decode untrusted bytes and re-encode them in the detected format.
///
/// Fails with a caller-safe error when the content is not a decodable image
/// or decodes to a zero-area frame. CPU-bound; callers on an async runtime
/// should run this on a blocking thread.
pub fn reencode(data: &[u8]) -> Result<ReencodedImage, AppError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|err| AppError::Internal(format!("format probe failed: {}", err)))?;
    let format = reader.format().ok_or_else(invalid_image)?;
    let img = reader.decode().map_err(|_| invalid_image())?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(invalid_image());
    }

    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), format)
        .map_err(|err| AppError::Internal(format!("re-encode failed: {}", err)))?;

    Ok(ReencodedImage {
        data: out,
        width,
        height,
        format,
    })
}
