//! Chat Repository
//!
//! Conversations hold a preview of their last message and the admin-side
//! unread counter; messages live in their own collection.

use std::sync::Arc;

use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{ChatMessage, Conversation, Sender};

use super::BaseRepository;
use crate::store::{DocumentStore, Query, SortDirection};
use crate::utils::time::now_millis;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewUpdate<'a> {
    last_message: &'a str,
    updated_at: i64,
}

#[derive(Serialize)]
struct UnreadUpdate {
    unread: u32,
}

#[derive(Clone)]
pub struct ChatRepository {
    base: BaseRepository,
}

impl ChatRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseRepository::new(store),
        }
    }

    pub async fn get_conversation(&self, id: &str) -> AppResult<Conversation> {
        self.base
            .get::<Conversation>(id, ErrorCode::ConversationNotFound)
            .await
    }

    /// Query of one conversation's messages, oldest first
    pub fn thread_query(conversation_id: &str) -> Query {
        Query::collection("messages")
            .where_eq("conversation", conversation_id)
            .order_by("createdAt", SortDirection::Ascending)
    }

    pub async fn messages(&self, conversation_id: &str) -> AppResult<Vec<ChatMessage>> {
        self.base
            .find_where::<ChatMessage>(&Self::thread_query(conversation_id))
            .await
    }

    /// Post an admin reply and refresh the conversation preview
    pub async fn send(&self, conversation_id: &str, body: &str) -> AppResult<ChatMessage> {
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::new(ErrorCode::EmptyMessage));
        }
        self.get_conversation(conversation_id).await?;

        let mut message = ChatMessage {
            id: String::new(),
            conversation: conversation_id.to_string(),
            sender: Sender::Admin,
            body: body.to_string(),
            created_at: now_millis(),
        };
        message.id = self.base.insert(&message).await?;

        self.base
            .patch::<Conversation, _>(
                conversation_id,
                &PreviewUpdate {
                    last_message: &message.body,
                    updated_at: message.created_at,
                },
            )
            .await?;
        Ok(message)
    }

    /// Reset the admin-side unread counter
    pub async fn mark_read(&self, conversation_id: &str) -> AppResult<()> {
        let conversation = self.get_conversation(conversation_id).await?;
        if conversation.unread == 0 {
            return Ok(());
        }
        self.base
            .patch::<Conversation, _>(conversation_id, &UnreadUpdate { unread: 0 })
            .await
    }
}
