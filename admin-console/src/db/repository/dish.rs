//! Dish Repository

use std::sync::Arc;

use serde::Serialize;
use shared::error::{AppResult, ErrorCode};
use shared::models::{Dish, DishCreate, DishUpdate};
use validator::Validate;

use super::{BaseRepository, Repository};
use crate::blob::BlobStore;
use crate::store::DocumentStore;
use crate::utils::time::now_millis;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PopularUpdate {
    is_popular: bool,
}

#[derive(Serialize)]
struct ImageUpdate<'a> {
    image: &'a str,
}

#[derive(Clone)]
pub struct DishRepository {
    base: BaseRepository,
    blobs: Arc<dyn BlobStore>,
}

impl DishRepository {
    pub fn new(store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            base: BaseRepository::new(store),
            blobs,
        }
    }

    pub async fn get(&self, id: &str) -> AppResult<Dish> {
        self.base.get::<Dish>(id, ErrorCode::DishNotFound).await
    }

    /// Dishes of one category
    /// Write only the `isPopular` field
    pub async fn set_popular(&self, id: &str, is_popular: bool) -> AppResult<()> {
        self.base
            .patch::<Dish, _>(id, &PopularUpdate { is_popular })
            .await
    }

    /// Upload a new image and point the dish at it; the previous image is
    /// deleted best-effort once the document is updated
    pub async fn set_image(&self, id: &str, file_name: &str, bytes: &[u8]) -> AppResult<Dish> {
        let dish = self.get(id).await?;
        let url = self.blobs.upload(file_name, bytes).await?;
        if let Err(e) = self.base.patch::<Dish, _>(id, &ImageUpdate { image: &url }).await {
            // The document still points at the old image
            self.blobs.delete(&url).await;
            return Err(e);
        }
        if let Some(old) = dish.image.as_deref() {
            self.blobs.delete(old).await;
        }
        self.get(id).await
    }
}

impl Repository<Dish, DishCreate, DishUpdate> for DishRepository {
    async fn find_all(&self) -> AppResult<Vec<Dish>> {
        self.base.find_all::<Dish>().await
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Dish>> {
        self.base.find_by_id::<Dish>(id).await
    }

    async fn create(&self, data: DishCreate) -> AppResult<Dish> {
        data.validate()?;
        let mut dish = Dish {
            id: String::new(),
            name: data.name,
            price: data.price,
            category: data.category,
            image: None,
            description: data.description,
            is_popular: false,
            is_available: true,
            created_at: now_millis(),
        };
        dish.id = self.base.insert(&dish).await?;
        Ok(dish)
    }

    async fn update(&self, id: &str, data: DishUpdate) -> AppResult<Dish> {
        data.validate()?;
        self.get(id).await?;
        self.base.patch::<Dish, _>(id, &data).await?;
        self.get(id).await
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let Some(dish) = self.base.find_by_id::<Dish>(id).await? else {
            return Ok(false);
        };
        self.base.remove::<Dish>(id).await?;
        if let Some(image) = dish.image.as_deref() {
            self.blobs.delete(image).await;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::LocalBlobStore;
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;

    fn repo(store: &MemoryStore, dir: &tempfile::TempDir) -> DishRepository {
        DishRepository::new(
            Arc::new(store.clone()),
            Arc::new(LocalBlobStore::new(dir.path(), "http://cdn.test/images")),
        )
    }

    fn pho() -> DishCreate {
        DishCreate {
            name: "Pho".into(),
            price: Decimal::new(550, 2),
            category: "soup".into(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_validates_before_writing() {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(&store, &dir);

        let err = repo
            .create(DishCreate {
                name: String::new(),
                ..pho()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(store.write_count(), 0);

        let dish = repo.create(pho()).await.unwrap();
        assert!(!dish.is_popular);
        assert_eq!(repo.get(&dish.id).await.unwrap().name, "Pho");
    }

    #[tokio::test]
    async fn test_replacing_image_deletes_old_blob() {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(&store, &dir);
        let dish = repo.create(pho()).await.unwrap();

        let first = repo.set_image(&dish.id, "pho.png", b"one").await.unwrap();
        let first_url = first.image.clone().unwrap();
        let second = repo.set_image(&dish.id, "pho.jpg", b"two").await.unwrap();

        assert_ne!(second.image, first.image);
        let remaining = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(remaining, 1);
        assert!(first_url.starts_with("http://cdn.test/images/"));
    }

    #[tokio::test]
    async fn test_set_popular_writes_single_field() {
        let store = MemoryStore::new();
        let dir = tempfile::tempdir().unwrap();
        let repo = repo(&store, &dir);
        let dish = repo.create(pho()).await.unwrap();

        repo.set_popular(&dish.id, true).await.unwrap();
        let stored = repo.get(&dish.id).await.unwrap();
        assert!(stored.is_popular);
        assert_eq!(stored.price, Decimal::new(550, 2));
    }
}
