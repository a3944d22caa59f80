//! Account Repository

use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Account, AccountRole, AccountUpdate};

use super::BaseRepository;
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct AccountRepository {
    base: BaseRepository,
}

impl AccountRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store),
        }
    }

    pub async fn find_all(&self) -> AppResult<Vec<Account>> {
        self.base.find_all::<Account>().await
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Account>> {
        self.base.find_by_id::<Account>(id).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Account> {
        self.base.get::<Account>(id, ErrorCode::AccountNotFound).await
    }

    /// Enable or disable an account. Admin accounts cannot be disabled.
    pub async fn set_disabled(&self, id: &str, disabled: bool) -> AppResult<()> {
        let account = self.get(id).await?;
        if disabled && account.role == AccountRole::Admin {
            return Err(AppError::with_message(
                ErrorCode::CannotDisableAdmin,
                format!("Account {} is an admin", id),
            ));
        }
        if account.disabled == disabled {
            return Ok(());
        }
        self.base
            .patch::<Account, _>(
                id,
                &AccountUpdate {
                    disabled: Some(disabled),
                    ..Default::default()
                },
            )
            .await
    }

    pub async fn set_role(&self, id: &str, role: AccountRole) -> AppResult<()> {
        let account = self.get(id).await?;
        if account.role == role {
            return Ok(());
        }
        self.base
            .patch::<Account, _>(
                id,
                &AccountUpdate {
                    role: Some(role),
                    ..Default::default()
                },
            )
            .await
    }

    pub async fn update(&self, id: &str, data: AccountUpdate) -> AppResult<Account> {
        self.get(id).await?;
        self.base.patch::<Account, _>(id, &data).await?;
        self.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.seed(
            "accounts",
            [
                (
                    "a1".to_string(),
                    json!({ "email": "boss@example.com", "displayName": "Boss", "role": "admin", "createdAt": 1 })
                        .as_object()
                        .cloned()
                        .unwrap(),
                ),
                (
                    "a2".to_string(),
                    json!({ "email": "mai@example.com", "displayName": "Mai", "role": "customer", "createdAt": 2 })
                        .as_object()
                        .cloned()
                        .unwrap(),
                ),
            ],
        );
        store
    }

    #[tokio::test]
    async fn test_cannot_disable_admin() {
        let repo = AccountRepository::new(Arc::new(seeded()));
        let err = repo.set_disabled("a1", true).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CannotDisableAdmin);
    }

    #[tokio::test]
    async fn test_disable_and_change_role() {
        let store = seeded();
        let repo = AccountRepository::new(Arc::new(store.clone()));

        repo.set_disabled("a2", true).await.unwrap();
        repo.set_role("a2", AccountRole::Staff).await.unwrap();
        let account = repo.get("a2").await.unwrap();
        assert!(account.disabled);
        assert_eq!(account.role, AccountRole::Staff);

        // No-op writes are skipped
        let writes = store.write_count();
        repo.set_disabled("a2", true).await.unwrap();
        assert_eq!(store.write_count(), writes);
    }
}
