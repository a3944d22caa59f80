//! Comment Repository

use std::sync::Arc;

use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Comment, ModerationStatus};

use super::BaseRepository;
use crate::store::DocumentStore;

#[derive(Serialize)]
struct ModerationUpdate {
    status: ModerationStatus,
}

#[derive(Clone)]
pub struct CommentRepository {
    base: BaseRepository,
}

impl CommentRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store),
        }
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Comment>> {
        self.base.find_by_id::<Comment>(id).await
    }

    pub async fn get(&self, id: &str) -> AppResult<Comment> {
        self.base.get::<Comment>(id, ErrorCode::CommentNotFound).await
    }

    /// Set the moderation status; re-applying the current status is rejected
    pub async fn moderate(&self, id: &str, status: ModerationStatus) -> AppResult<()> {
        let comment = self.get(id).await?;
        if comment.status == status {
            return Err(AppError::with_message(
                ErrorCode::CommentAlreadyModerated,
                format!("Comment {} is already {}", id, status.as_str()),
            ));
        }
        self.base
            .patch::<Comment, _>(id, &ModerationUpdate { status })
            .await
    }

    pub async fn approve(&self, id: &str) -> AppResult<()> {
        self.moderate(id, ModerationStatus::Approved).await
    }

    pub async fn reject(&self, id: &str) -> AppResult<()> {
        self.moderate(id, ModerationStatus::Rejected).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.base.remove::<Comment>(id).await
    }
}
