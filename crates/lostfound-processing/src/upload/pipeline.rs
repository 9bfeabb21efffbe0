//! Validate-then-store for item photos.
//!
//! Validation is delegated to [`UploadValidator`] so every rule lives in one place.
//! Storage is only touched once a candidate has passed all checks, so a rejected
//! upload never leaves a partial file behind.

use std::sync::Arc;

use lostfound_core::AppError;
use lostfound_storage::{Storage, StorageError};

use super::types::{AcceptedUpload, UploadCandidate};
use crate::validator::{UploadValidator, ValidationFailure};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error(transparent)]
    Rejected(#[from] ValidationFailure),

    #[error("Failed to store upload: {0}")]
    Storage(#[from] StorageError),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Rejected(failure) => failure.into(),
            UploadError::Storage(e) => e.into(),
        }
    }
}

/// Upload pipeline bound to a storage backend.
#[derive(Clone)]
pub struct UploadPipeline {
    validator: UploadValidator,
    storage: Arc<dyn Storage>,
}

impl UploadPipeline {
    pub fn new(validator: UploadValidator, storage: Arc<dyn Storage>) -> Self {
        Self { validator, storage }
    }

    pub fn validator(&self) -> &UploadValidator {
        &self.validator
    }

    /// Validate `candidate` and, if it passes, write its bytes to storage.
    #[tracing::instrument(skip(self, candidate), fields(size_bytes = candidate.size_bytes()))]
    pub async fn accept(&self, candidate: UploadCandidate) -> Result<AcceptedUpload, UploadError> {
        let mut accepted = self.validator.accept(&candidate)?;

        let url = self
            .storage
            .put(
                &accepted.storage_path,
                candidate.into_content(),
                &accepted.content_type,
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    storage_path = %accepted.storage_path,
                    "Storing accepted upload failed"
                );
                e
            })?;

        tracing::info!(
            storage_path = %accepted.storage_path,
            format = %accepted.format,
            "Upload accepted"
        );

        accepted.url = Some(url);
        Ok(accepted)
    }

    /// Remove a previously accepted upload, e.g. when its item is deleted or re-photographed.
    pub async fn discard(&self, storage_path: &str) -> Result<(), UploadError> {
        self.storage.delete(storage_path).await?;
        Ok(())
    }
}
