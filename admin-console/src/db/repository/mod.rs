//! Repository Module
//!
//! Typed CRUD over the document store. Reads decode at the boundary, writes
//! encode explicit payloads and only send the fields they mean to change.
//! Write failures are logged at `warn` and returned; nothing is retried.

pub mod account;
pub mod banner;
pub mod category;
pub mod chat;
pub mod comment;
pub mod dish;
pub mod order;
pub mod voucher;

pub use account::AccountRepository;
pub use banner::BannerRepository;
pub use category::CategoryRepository;
pub use chat::ChatRepository;
pub use comment::CommentRepository;
pub use dish::DishRepository;
pub use order::OrderRepository;
pub use voucher::VoucherRepository;

use std::sync::Arc;

use serde::Serialize;
use shared::Record;
use shared::error::{AppError, AppResult, ErrorCode};

use crate::store::{DocumentStore, Query, SortDirection, encode};

/// Common repository trait for basic CRUD
#[allow(async_fn_in_trait)]
pub trait Repository<T, CreateDto, UpdateDto> {
    async fn find_all(&self) -> AppResult<Vec<T>>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<T>>;
    async fn create(&self, data: CreateDto) -> AppResult<T>;
    async fn update(&self, id: &str, data: UpdateDto) -> AppResult<T>;
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

/// Base repository with store reference
#[derive(Clone)]
pub struct BaseRepository {
    store: Arc<dyn DocumentStore>,
}

impl BaseRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub async fn find_by_id<T: Record>(&self, id: &str) -> AppResult<Option<T>> {
        match self.store.get_doc(T::COLLECTION, id).await? {
            Some(doc) => Ok(Some(doc.decode::<T>()?)),
            None => Ok(None),
        }
    }

    /// Like [`find_by_id`](Self::find_by_id) but a missing document is an error
    pub async fn get<T: Record>(&self, id: &str, missing: ErrorCode) -> AppResult<T> {
        self.find_by_id::<T>(id).await?.ok_or_else(|| {
            AppError::with_message(missing, format!("{} {} not found", T::RESOURCE, id))
                .with_detail("id", id)
        })
    }

    /// Every document of `T`, sort field descending; invalid documents skipped
    pub async fn find_all<T: Record>(&self) -> AppResult<Vec<T>> {
        let query = Query::collection(T::COLLECTION).order_by(T::SORT_FIELD, SortDirection::Descending);
        self.find_where(&query).await
    }

    pub async fn find_where<T: Record>(&self, query: &Query) -> AppResult<Vec<T>> {
        let docs = self.store.get(query).await?;
        Ok(crate::live::decode_all::<T>(&docs))
    }

    /// Insert a new document built from `record`; returns the generated id
    pub async fn insert<T: Record>(&self, record: &T) -> AppResult<String> {
        let data = encode(record)?;
        match self.store.add(T::COLLECTION, data).await {
            Ok(id) => {
                tracing::info!(collection = T::COLLECTION, id = %id, "Document created");
                Ok(id)
            }
            Err(e) => Err(write_failed(T::COLLECTION, "", e.into())),
        }
    }

    /// Partial update: only the serialized fields of `fields` are written
    pub async fn patch<T: Record, U: Serialize>(&self, id: &str, fields: &U) -> AppResult<()> {
        let data = encode(fields)?;
        if data.is_empty() {
            return Ok(());
        }
        match self.store.update(T::COLLECTION, id, data).await {
            Ok(()) => {
                tracing::info!(collection = T::COLLECTION, id = %id, "Document updated");
                Ok(())
            }
            Err(e) => Err(write_failed(T::COLLECTION, id, e.into())),
        }
    }

    pub async fn remove<T: Record>(&self, id: &str) -> AppResult<()> {
        match self.store.delete(T::COLLECTION, id).await {
            Ok(()) => {
                tracing::info!(collection = T::COLLECTION, id = %id, "Document deleted");
                Ok(())
            }
            Err(e) => Err(write_failed(T::COLLECTION, id, e.into())),
        }
    }
}

fn write_failed(collection: &str, id: &str, error: AppError) -> AppError {
    tracing::warn!(collection = collection, id = id, error = %error, "Write failed");
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;
    use shared::models::{Account, AccountRole, AccountUpdate};

    fn account() -> Account {
        Account {
            id: String::new(),
            email: "lan@example.com".into(),
            display_name: "Lan".into(),
            role: AccountRole::Staff,
            disabled: false,
            created_at: 1,
        }
    }

    #[tokio::test]
    async fn test_insert_then_patch_preserves_other_fields() {
        let store = MemoryStore::new();
        let base = BaseRepository::new(Arc::new(store.clone()));

        let id = base.insert(&account()).await.unwrap();
        base.patch::<Account, _>(
            &id,
            &AccountUpdate {
                disabled: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let stored: Account = base.get(&id, ErrorCode::AccountNotFound).await.unwrap();
        assert_eq!(stored.id, id);
        assert!(stored.disabled);
        assert_eq!(stored.display_name, "Lan");
    }

    #[tokio::test]
    async fn test_empty_patch_is_not_written() {
        let store = MemoryStore::new();
        let base = BaseRepository::new(Arc::new(store.clone()));
        let id = base.insert(&account()).await.unwrap();
        let writes = store.write_count();

        base.patch::<Account, _>(&id, &AccountUpdate::default()).await.unwrap();
        assert_eq!(store.write_count(), writes);
    }

    #[tokio::test]
    async fn test_get_missing_uses_resource_code() {
        let base = BaseRepository::new(Arc::new(MemoryStore::new()));
        let err = base
            .get::<Account>("nope", ErrorCode::AccountNotFound)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountNotFound);
        assert_eq!(err.details.and_then(|d| d.get("id").cloned()), Some(json!("nope")));
    }

    #[tokio::test]
    async fn test_offline_write_is_returned() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let base = BaseRepository::new(Arc::new(store));
        let err = base.insert(&account()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreUnavailable);
    }
}
