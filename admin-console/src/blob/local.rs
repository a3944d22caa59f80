//! Filesystem-backed blob store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use shared::error::{AppError, AppResult, ErrorCode};
use uuid::Uuid;

use super::{BlobStore, check_upload};

/// Writes blobs under `root` and serves them from `base_url`
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    base_url: String,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a public URL back to a file under `root`
    fn path_for(&self, url: &str) -> Option<PathBuf> {
        let key = url.strip_prefix(&self.base_url)?.trim_start_matches('/');
        if key.is_empty() || key.contains("..") || key.contains('/') {
            return None;
        }
        Some(self.root.join(key))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn upload(&self, file_name: &str, bytes: &[u8]) -> AppResult<String> {
        let ext = check_upload(file_name, bytes)?;

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::with_message(
                ErrorCode::UploadFailed,
                format!("Failed to create blob dir: {}", e),
            )
        })?;

        let key = format!("{}.{}", Uuid::new_v4(), ext);
        let path = self.root.join(&key);
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            AppError::with_message(ErrorCode::UploadFailed, format!("Failed to write blob: {}", e))
        })?;

        tracing::info!(file = %file_name, key = %key, size = bytes.len(), "Blob uploaded");
        Ok(format!("{}/{}", self.base_url, key))
    }

    async fn delete(&self, url: &str) {
        let Some(path) = self.path_for(url) else {
            tracing::warn!(url = %url, "Blob URL does not belong to this store, skipping delete");
            return;
        };
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(url = %url, error = %e, "Failed to delete blob");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "https://cdn.example.com/images/");

        let url = store.upload("pho.png", b"\x89PNG").await.unwrap();
        assert!(url.starts_with("https://cdn.example.com/images/"));
        assert!(url.ends_with(".png"));

        let path = store.path_for(&url).unwrap();
        assert!(path.exists());

        store.delete(&url).await;
        assert!(!path.exists());

        // Second delete only logs
        store.delete(&url).await;
    }

    #[tokio::test]
    async fn test_foreign_urls_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "https://cdn.example.com");
        assert!(store.path_for("https://elsewhere.com/a.png").is_none());
        assert!(store.path_for("https://cdn.example.com/../etc/passwd").is_none());
        store.delete("https://elsewhere.com/a.png").await;
    }

    #[tokio::test]
    async fn test_rejected_upload_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().join("blobs"), "https://cdn.example.com");
        assert!(store.upload("menu.txt", b"hello").await.is_err());
        assert!(!store.root().exists());
    }
}
