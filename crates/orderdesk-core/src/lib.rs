//! Orderdesk Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! text sanitization shared across all Orderdesk components.

pub mod config;
pub mod error;
pub mod models;
pub mod sanitize;

// Re-export commonly used types
pub use config::{AppConfig, ListConfig, PhoneRegion, UploadConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    require_role, Customer, Identity, NewOrder, Order, OrderDraft, OrderStatus, Product, Role,
};
pub use sanitize::{escape_html, normalize_phone, sanitize_text};
