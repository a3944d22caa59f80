//! Voucher Repository

use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Voucher, VoucherCreate, VoucherUpdate};
use validator::Validate;

use super::{BaseRepository, Repository};
use crate::store::{DocumentStore, Query};
use crate::utils::time::now_millis;

#[derive(Clone)]
pub struct VoucherRepository {
    base: BaseRepository,
}

impl VoucherRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store),
        }
    }

    pub async fn get(&self, id: &str) -> AppResult<Voucher> {
        self.base.get::<Voucher>(id, ErrorCode::VoucherNotFound).await
    }

    /// Look a voucher up by its (case-insensitive) code
    pub async fn find_by_code(&self, code: &str) -> AppResult<Option<Voucher>> {
        let query = Query::collection("vouchers").where_eq("code", normalize_code(code));
        Ok(self.base.find_where::<Voucher>(&query).await?.into_iter().next())
    }

    /// Vouchers that can still be redeemed at `now_millis`
    pub async fn find_redeemable(&self, now_millis: i64) -> AppResult<Vec<Voucher>> {
        let vouchers = self.base.find_all::<Voucher>().await?;
        Ok(vouchers
            .into_iter()
            .filter(|v| v.is_redeemable(now_millis))
            .collect())
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

impl Repository<Voucher, VoucherCreate, VoucherUpdate> for VoucherRepository {
    async fn find_all(&self) -> AppResult<Vec<Voucher>> {
        self.base.find_all::<Voucher>().await
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Voucher>> {
        self.base.find_by_id::<Voucher>(id).await
    }

    async fn create(&self, data: VoucherCreate) -> AppResult<Voucher> {
        data.validate()?;
        let now = now_millis();
        if data.expires_at <= now {
            return Err(AppError::with_message(
                ErrorCode::VoucherExpired,
                "Voucher expiry must be in the future",
            ));
        }
        let code = normalize_code(&data.code);
        if self.find_by_code(&code).await?.is_some() {
            return Err(AppError::with_message(
                ErrorCode::VoucherCodeExists,
                format!("Voucher code {} already exists", code),
            ));
        }

        let mut voucher = Voucher {
            id: String::new(),
            code,
            discount_percent: data.discount_percent,
            quantity: data.quantity,
            expires_at: data.expires_at,
            created_at: now,
        };
        voucher.id = self.base.insert(&voucher).await?;
        Ok(voucher)
    }

    async fn update(&self, id: &str, data: VoucherUpdate) -> AppResult<Voucher> {
        data.validate()?;
        self.get(id).await?;
        self.base.patch::<Voucher, _>(id, &data).await?;
        self.get(id).await
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        if self.base.find_by_id::<Voucher>(id).await?.is_none() {
            return Ok(false);
        }
        self.base.remove::<Voucher>(id).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const DAY: i64 = 86_400_000;

    fn spring() -> VoucherCreate {
        VoucherCreate {
            code: "spring24".into(),
            discount_percent: 15,
            quantity: 10,
            expires_at: now_millis() + DAY,
        }
    }

    #[tokio::test]
    async fn test_codes_are_unique_ignoring_case() {
        let repo = VoucherRepository::new(Arc::new(MemoryStore::new()));
        let voucher = repo.create(spring()).await.unwrap();
        assert_eq!(voucher.code, "SPRING24");

        let err = repo
            .create(VoucherCreate {
                code: "Spring24".into(),
                ..spring()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VoucherCodeExists);
    }

    #[tokio::test]
    async fn test_expired_voucher_rejected() {
        let store = MemoryStore::new();
        let repo = VoucherRepository::new(Arc::new(store.clone()));
        let err = repo
            .create(VoucherCreate {
                expires_at: now_millis() - DAY,
                ..spring()
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::VoucherExpired);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_update_quantity() {
        let repo = VoucherRepository::new(Arc::new(MemoryStore::new()));
        let voucher = repo.create(spring()).await.unwrap();
        let updated = repo
            .update(
                &voucher.id,
                VoucherUpdate {
                    quantity: Some(0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.quantity, 0);
        assert!(repo.find_redeemable(now_millis()).await.unwrap().is_empty());
    }
}
