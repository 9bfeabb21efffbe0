//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage path: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for lostfound_core::AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(path) => {
                lostfound_core::AppError::NotFound(format!("File not found: {}", path))
            }
            other => lostfound_core::AppError::Storage(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Backends receive fully derived storage paths (see [`crate::keys`]) and never
/// see the uploader's original filename.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write `data` at `storage_path` and return the URL it is served from
    async fn put(
        &self,
        storage_path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Read a stored file
    async fn get(&self, storage_path: &str) -> StorageResult<Vec<u8>>;

    /// Delete a stored file. Deleting a missing file succeeds.
    async fn delete(&self, storage_path: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, storage_path: &str) -> StorageResult<bool>;

    /// Size in bytes of a stored file
    async fn content_length(&self, storage_path: &str) -> StorageResult<u64>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
