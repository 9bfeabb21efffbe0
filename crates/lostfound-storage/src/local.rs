use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/lostfound/media")
    /// * `base_url` - Base URL for serving files (e.g., "/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert a storage path to a filesystem path.
    ///
    /// Rejects paths that could escape the base directory.
    fn key_to_path(&self, storage_path: &str) -> StorageResult<PathBuf> {
        if storage_path.is_empty()
            || storage_path.contains("..")
            || storage_path.starts_with('/')
            || storage_path.contains('\\')
        {
            return Err(StorageError::InvalidKey(storage_path.to_string()));
        }

        Ok(self.base_path.join(storage_path))
    }

    fn generate_url(&self, storage_path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_path)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

/// Await `write` on a file just created at `path`. On failure the partial file is
/// removed, so a failed upload leaves nothing behind.
async fn write_or_remove<F>(path: &Path, write: F) -> StorageResult<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = write.await {
        if let Err(remove_err) = fs::remove_file(path).await {
            tracing::warn!(
                path = %path.display(),
                error = %remove_err,
                "Failed to remove partially written file"
            );
        }
        return Err(StorageError::UploadFailed(format!(
            "Failed to write file {}: {}",
            path.display(),
            e
        )));
    }
    Ok(())
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(
        &self,
        storage_path: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.key_to_path(storage_path)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        // create_new: a generated path is never reused, so an existing file means a collision
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        write_or_remove(&path, async {
            file.write_all(&data).await?;
            file.sync_all().await
        })
        .await?;

        tracing::info!(
            path = %path.display(),
            key = %storage_path,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(self.generate_url(storage_path))
    }

    async fn get(&self, storage_path: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_path)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_path.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            key = %storage_path,
            size_bytes = data.len(),
            "Local storage download successful"
        );

        Ok(data)
    }

    async fn delete(&self, storage_path: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_path)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(key = %storage_path, "Local storage delete successful");

        Ok(())
    }

    async fn exists(&self, storage_path: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_path)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn content_length(&self, storage_path: &str) -> StorageResult<u64> {
        let path = self.key_to_path(storage_path)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn test_storage() -> (TempDir, LocalStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "/media/".to_string())
            .await
            .unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let (_dir, storage) = test_storage().await;

        let url = storage
            .put("items/abc.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert_eq!(url, "/media/items/abc.png");

        assert!(storage.exists("items/abc.png").await.unwrap());
        assert_eq!(storage.content_length("items/abc.png").await.unwrap(), 3);
        assert_eq!(storage.get("items/abc.png").await.unwrap(), vec![1, 2, 3]);

        storage.delete("items/abc.png").await.unwrap();
        assert!(!storage.exists("items/abc.png").await.unwrap());
        // Deleting again is a no-op
        storage.delete("items/abc.png").await.unwrap();
    }

    #[tokio::test]
    async fn test_put_refuses_to_overwrite() {
        let (_dir, storage) = test_storage().await;
        storage.put("items/a.jpg", vec![1], "image/jpeg").await.unwrap();

        let err = storage
            .put("items/a.jpg", vec![2], "image/jpeg")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::UploadFailed(_)));
        assert_eq!(storage.get("items/a.jpg").await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_failed_write_removes_partial_file() {
        let (dir, _storage) = test_storage().await;
        let path = dir.path().join("partial.jpg");
        fs::write(&path, [0xFF, 0xD8]).await.unwrap();

        let err = write_or_remove(&path, async {
            Err::<(), _>(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, StorageError::UploadFailed(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_successful_write_keeps_file() {
        let (dir, _storage) = test_storage().await;
        let path = dir.path().join("whole.jpg");
        fs::write(&path, [0xFF, 0xD8, 0xFF]).await.unwrap();

        write_or_remove(&path, async { Ok::<(), std::io::Error>(()) }).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let (_dir, storage) = test_storage().await;
        assert!(matches!(
            storage.get("items/missing.png").await,
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            storage.content_length("items/missing.png").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let (_dir, storage) = test_storage().await;
        for key in ["../escape.png", "/etc/passwd", "items/../../x", "", "items\\x.png"] {
            assert!(
                matches!(
                    storage.put(key, vec![0], "image/png").await,
                    Err(StorageError::InvalidKey(_))
                ),
                "key {:?} should be rejected",
                key
            );
        }
    }
}
