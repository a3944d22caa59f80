//! Order Repository

use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderStatus, OrderUpdate, ReportStatus};

use super::BaseRepository;
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store),
        }
    }

    pub async fn find_all(&self) -> AppResult<Vec<Order>> {
        self.base.find_all::<Order>().await
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Order>> {
        self.base.find_by_id::<Order>(id).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Order> {
        self.base.get::<Order>(id, ErrorCode::OrderNotFound).await
    }

    /// Move an order to `status`; only the status field is written
    pub async fn update_status(&self, id: &str, status: OrderStatus) -> AppResult<()> {
        let order = self.get(id).await?;
        if order.status == status {
            return Err(AppError::with_message(
                ErrorCode::OrderStatusUnchanged,
                format!("Order {} is already {}", id, status.as_str()),
            ));
        }
        self.base
            .patch::<Order, _>(
                id,
                &OrderUpdate {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
    }

    /// Mark an open report as handled
    pub async fn resolve_report(&self, id: &str) -> AppResult<()> {
        let order = self.get(id).await?;
        if !order.report_status.is_open() {
            return Err(AppError::with_message(
                ErrorCode::ReportNotOpen,
                format!("Order {} has no open report", id),
            )
            .with_detail("reportStatus", order.report_status.code()));
        }
        self.base
            .patch::<Order, _>(
                id,
                &OrderUpdate {
                    report_status: Some(ReportStatus::Handled),
                    ..Default::default()
                },
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.base.remove::<Order>(id).await
    }
}
