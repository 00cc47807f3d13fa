//! Configuration module
//!
//! Components receive explicit configuration structs at construction instead
//! of reading the process environment. Every knob has a documented default so
//! a plain `AppConfig::default()` yields a working setup.

use std::path::PathBuf;

/// Listing configuration.
#[derive(Clone, Debug)]
pub struct ListConfig {
    /// Default page size. Also the ceiling: callers may request fewer rows
    /// per page, never more.
    pub default_limit: u64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

/// Upload pipeline configuration.
#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Lower size bound; rejects trivially small or empty decoy files.
    pub min_bytes: u64,
    /// Upper size bound.
    pub max_bytes: u64,
    /// Declared MIME types accepted at the validation gate. The stored
    /// extension is always derived from the decoded content, never from
    /// the declared type.
    pub allowed_mime_types: Vec<String>,
    /// Directory the re-encoded artifact is written to.
    pub upload_dir: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            min_bytes: 2 * 1024,
            max_bytes: 5 * 1024 * 1024,
            allowed_mime_types: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/jpg".to_string(),
                "image/gif".to_string(),
            ],
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

/// Rules for normalizing phone numbers into E.164 for one default region.
#[derive(Clone, Debug)]
pub struct PhoneRegion {
    /// Country calling code without the leading `+`.
    pub country_code: String,
    /// Number of digits in a national subscriber number.
    pub national_digits: usize,
    /// Domestic trunk prefix replaced by the country code, if the region has one.
    pub trunk_prefix: Option<char>,
}

impl Default for PhoneRegion {
    fn default() -> Self {
        // RU: +7, 10-digit national numbers, domestic numbers dialed with a leading 8.
        Self {
            country_code: "7".to_string(),
            national_digits: 10,
            trunk_prefix: Some('8'),
        }
    }
}

/// Application configuration bundling all component settings.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub list: ListConfig,
    pub upload: UploadConfig,
    pub phone_region: PhoneRegion,
}
