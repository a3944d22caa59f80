//! Banner Repository

use std::sync::Arc;

use serde::Serialize;
use shared::error::{AppResult, ErrorCode};
use shared::models::{Banner, BannerCreate};
use validator::Validate;

use super::BaseRepository;
use crate::blob::BlobStore;
use crate::store::DocumentStore;
use crate::utils::time::now_millis;

#[derive(Serialize)]
struct ActiveUpdate {
    active: bool,
}

#[derive(Clone)]
pub struct BannerRepository {
    base: BaseRepository,
    blobs: Arc<dyn BlobStore>,
}

impl BannerRepository {
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            base: BaseRepository::new(store),
            blobs,
        }
    }

    pub async fn find_all(&self) -> AppResult<Vec<Banner>> {
        self.base.find_all::<Banner>().await
    }

    pub async fn get(&self, id: &str) -> AppResult<Banner> {
        self.base.get::<Banner>(id, ErrorCode::BannerNotFound).await
    }

    /// Upload the image, then create the banner pointing at it
    ///
    /// If the document write fails the uploaded image is removed again.
    pub async fn create(&self, data: BannerCreate, bytes: &[u8]) -> AppResult<Banner> {
        data.validate()?;
        let image = self.blobs.upload(&data.file_name, bytes).await?;

        let mut banner = Banner {
            id: String::new(),
            image,
            title: data.title,
            active: true,
            created_at: now_millis(),
        };
        match self.base.insert(&banner).await {
            Ok(id) => {
                banner.id = id;
                Ok(banner)
            }
            Err(e) => {
                self.blobs.delete(&banner.image).await;
                Err(e)
            }
        }
    }

    pub async fn set_active(&self, id: &str, active: bool) -> AppResult<()> {
        self.get(id).await?;
        self.base.patch::<Banner, _>(id, &ActiveUpdate { active }).await
    }

    /// Delete the banner and, best-effort, its image
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let Some(banner) = self.base.find_by_id::<Banner>(id).await? else {
            return Ok(false);
        };
        self.base.remove::<Banner>(id).await?;
        self.blobs.delete(&banner.image).await;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::LocalBlobStore;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_create_and_delete_manage_blob() {
        let dir = tempfile::tempdir().unwrap();
        let repo = BannerRepository::new(
            Arc::new(MemoryStore::new()),
            Arc::new(LocalBlobStore::new(dir.path(), "http://cdn.test/images")),
        );
        let banner = repo
            .create(
                BannerCreate {
                    title: "Tet menu".into(),
                    file_name: "tet.webp".into(),
                },
                b"img",
            )
            .await
            .unwrap();
        assert!(banner.active);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

        repo.set_active(&banner.id, false).await.unwrap();
        assert!(!repo.get(&banner.id).await.unwrap().active);
        let err = repo.set_active("missing", true).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BannerNotFound);

        assert!(repo.delete(&banner.id).await.unwrap());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(!repo.delete(&banner.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_write_removes_upload() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let repo = BannerRepository::new(
            Arc::new(store.clone()),
            Arc::new(LocalBlobStore::new(dir.path(), "http://cdn.test/images")),
        );
        store.set_offline(true);

        let err = repo
            .create(
                BannerCreate {
                    title: "Tet menu".into(),
                    file_name: "tet.png".into(),
                },
                b"img",
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreUnavailable);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
