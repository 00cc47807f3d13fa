//! Orderdesk upload processing
//!
//! Safety pipeline for untrusted image uploads: validation gate, decode and
//! re-encode (dropping embedded metadata), collision-resistant naming with a
//! content-derived extension, and cleanup of temporary artifacts on every
//! exit path.

pub mod image;
pub mod pipeline;
pub mod validator;

pub use pipeline::{StoredImage, UploadArtifact, UploadPipeline};
pub use validator::{UploadValidationError, UploadValidator};
