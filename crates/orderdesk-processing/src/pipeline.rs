//! Upload pipeline: validate → transform → commit, with cleanup on every exit.
//!
//! The pipeline takes exclusive ownership of the temporary artifact deposited
//! by the multipart-parsing collaborator. Whatever happens, the temp file is
//! gone afterwards; on success only the re-encoded artifact remains, under a
//! freshly generated name whose extension comes from the detected format. A
//! failed removal is logged and never masks the outcome already determined by
//! the primary operation.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use orderdesk_core::{AppError, UploadConfig};

use crate::image::{extension_for, reencode};
use crate::validator::UploadValidator;

/// An inbound upload as reported by the multipart collaborator. Exclusively
/// owned by the pipeline for the duration of one request.
#[derive(Debug, Clone)]
pub struct UploadArtifact {
    pub temp_path: PathBuf,
    pub mime_type: String,
    pub size: u64,
    pub original_name: String,
}

/// Successful pipeline result. Exposes the generated name and the declared
/// original name for display; never the server-side temporary path.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoredImage {
    pub file_name: String,
    pub original_name: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

pub struct UploadPipeline {
    validator: UploadValidator,
    upload_dir: PathBuf,
}

impl UploadPipeline {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            validator: UploadValidator::new(config),
            upload_dir: config.upload_dir.clone(),
        }
    }

    /// Run the pipeline on one upload. `None` means the request carried no
    /// file at all.
    #[tracing::instrument(skip(self, artifact), fields(original_name, size))]
    pub async fn process(&self, artifact: Option<UploadArtifact>) -> Result<StoredImage, AppError> {
        let artifact =
            artifact.ok_or_else(|| AppError::Validation("no file uploaded".to_string()))?;
        tracing::Span::current()
            .record("original_name", artifact.original_name.as_str())
            .record("size", artifact.size);

        if let Err(err) =
            self.validator
                .validate(&artifact.mime_type, &artifact.original_name, artifact.size)
        {
            remove_quietly(&artifact.temp_path).await;
            return Err(err.into());
        }

        let reencoded = match self.transform(&artifact.temp_path).await {
            Ok(reencoded) => reencoded,
            Err(err) => {
                remove_quietly(&artifact.temp_path).await;
                return Err(err);
            }
        };

        let extension = extension_for(reencoded.format);
        let file_name = format!("{}.{}", Uuid::new_v4(), extension);
        let dest = self.upload_dir.join(&file_name);

        if let Err(err) = tokio::fs::write(&dest, &reencoded.data).await {
            // Remove the partial artifact before the temp file so nothing
            // half-written survives the error.
            remove_quietly(&dest).await;
            remove_quietly(&artifact.temp_path).await;
            return Err(err.into());
        }

        remove_quietly(&artifact.temp_path).await;

        tracing::debug!(
            file_name,
            width = reencoded.width,
            height = reencoded.height,
            "upload committed"
        );

        Ok(StoredImage {
            file_name,
            original_name: artifact.original_name,
            width: reencoded.width,
            height: reencoded.height,
            format: extension.to_string(),
        })
    }

    async fn transform(&self, temp_path: &Path) -> Result<crate::image::ReencodedImage, AppError> {
        let bytes = tokio::fs::read(temp_path).await?;
        // Image decode is CPU-bound; run off the async pool.
        tokio::task::spawn_blocking(move || reencode(&bytes))
            .await
            .map_err(|err| AppError::Internal(format!("decode task failed: {}", err)))?
    }
}

/// Best-effort removal: a cleanup failure is observed, not propagated.
async fn remove_quietly(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %err, "failed to remove file");
    }
}
