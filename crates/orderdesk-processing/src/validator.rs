//! Upload validation gate.
//!
//! Checks run in a fixed order and each failure is terminal: declared MIME
//! type against the allow-list, original filename safety (path separators,
//! drive and device syntax, reserved device names), then declared size
//! against both bounds. The lower size bound rejects trivially small decoy
//! files, not just empty ones.

use orderdesk_core::{AppError, UploadConfig};

/// Validation errors for uploaded files
#[derive(Debug, thiserror::Error)]
pub enum UploadValidationError {
    #[error("no file uploaded")]
    MissingFile,

    #[error("file type not allowed: {mime_type}")]
    InvalidMimeType { mime_type: String },

    #[error("unsafe filename: {0}")]
    UnsafeFilename(String),

    #[error("file too small: {size} bytes (min: {min} bytes)")]
    TooSmall { size: u64, min: u64 },

    #[error("file too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },
}

impl From<UploadValidationError> for AppError {
    fn from(err: UploadValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Filename characters that smuggle paths, drives, or pipes.
const UNSAFE_FILENAME_CHARS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*', '\0'];

/// Windows reserved device names; a file named after one (with or without an
/// extension) is rejected.
const RESERVED_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Upload validator built from [`UploadConfig`].
pub struct UploadValidator {
    min_bytes: u64,
    max_bytes: u64,
    allowed_mime_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            min_bytes: config.min_bytes,
            max_bytes: config.max_bytes,
            allowed_mime_types: config.allowed_mime_types.clone(),
        }
    }

    /// Validate the declared MIME type against the allow-list.
    pub fn validate_mime_type(&self, mime_type: &str) -> Result<(), UploadValidationError> {
        let normalized = mime_type.to_lowercase();
        if !self.allowed_mime_types.iter().any(|m| *m == normalized) {
            return Err(UploadValidationError::InvalidMimeType {
                mime_type: mime_type.to_string(),
            });
        }
        Ok(())
    }

    /// Validate the client-supplied filename. The name is only ever echoed
    /// back for display, but it must still be free of path separators, drive
    /// syntax, traversal, and reserved device names.
    pub fn validate_filename(&self, filename: &str) -> Result<(), UploadValidationError> {
        let unsafe_name = || UploadValidationError::UnsafeFilename(filename.to_string());

        if filename.is_empty() || filename.contains(UNSAFE_FILENAME_CHARS) {
            return Err(unsafe_name());
        }
        if filename.contains("..") {
            return Err(unsafe_name());
        }
        let stem = filename.split('.').next().unwrap_or(filename);
        if RESERVED_DEVICE_NAMES
            .iter()
            .any(|r| r.eq_ignore_ascii_case(stem))
        {
            return Err(unsafe_name());
        }
        Ok(())
    }

    /// Validate the declared size against both bounds.
    pub fn validate_size(&self, size: u64) -> Result<(), UploadValidationError> {
        if size < self.min_bytes {
            return Err(UploadValidationError::TooSmall {
                size,
                min: self.min_bytes,
            });
        }
        if size > self.max_bytes {
            return Err(UploadValidationError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }

    /// Run the whole gate in order.
    pub fn validate(
        &self,
        mime_type: &str,
        filename: &str,
        size: u64,
    ) -> Result<(), UploadValidationError> {
        self.validate_mime_type(mime_type)?;
        self.validate_filename(filename)?;
        self.validate_size(size)?;
        Ok(())
    }
}
