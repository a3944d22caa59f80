//! Category Repository

use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use validator::Validate;

use super::{BaseRepository, Repository};
use crate::store::{DocumentStore, Query};

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store),
        }
    }

    pub async fn get(&self, id: &str) -> AppResult<Category> {
        self.base.get::<Category>(id, ErrorCode::CategoryNotFound).await
    }

    async fn ensure_name_free(&self, name: &str, except: Option<&str>) -> AppResult<()> {
        let query = Query::collection("categories").where_eq("name", name);
        let taken = self
            .base
            .find_where::<Category>(&query)
            .await?
            .into_iter()
            .any(|c| Some(c.id.as_str()) != except);
        if taken {
            return Err(AppError::with_message(
                ErrorCode::CategoryNameExists,
                format!("Category '{}' already exists", name),
            ));
        }
        Ok(())
    }
}

impl Repository<Category, CategoryCreate, CategoryUpdate> for CategoryRepository {
    /// Ordered by `sortOrder` ascending, the menu order
    async fn find_all(&self) -> AppResult<Vec<Category>> {
        let mut categories = self.base.find_all::<Category>().await?;
        categories.reverse();
        Ok(categories)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Category>> {
        self.base.find_by_id::<Category>(id).await
    }

    async fn create(&self, data: CategoryCreate) -> AppResult<Category> {
        data.validate()?;
        self.ensure_name_free(&data.name, None).await?;
        let mut category = Category {
            id: String::new(),
            name: data.name,
            image: None,
            sort_order: data.sort_order,
        };
        category.id = self.base.insert(&category).await?;
        Ok(category)
    }

    async fn update(&self, id: &str, data: CategoryUpdate) -> AppResult<Category> {
        data.validate()?;
        self.get(id).await?;
        if let Some(name) = data.name.as_deref() {
            self.ensure_name_free(name, Some(id)).await?;
        }
        self.base.patch::<Category, _>(id, &data).await?;
        self.get(id).await
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        if self.base.find_by_id::<Category>(id).await?.is_none() {
            return Ok(false);
        }
        self.base.remove::<Category>(id).await?;
        Ok(true)
    }
}
