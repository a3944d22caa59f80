//! Chat inbox
//!
//! Conversations are paged by most recent activity. Opening one gives a
//! live thread of its messages and clears the unread counter.

use std::sync::Arc;

use shared::error::AppResult;
use shared::models::{ChatMessage, Conversation};

use crate::db::ChatRepository;
use crate::live::{LiveCollection, LookaheadPolicy, PageSpec, PageWindow, PagedLiveQuery};
use crate::store::{DocumentStore, Filter};

pub struct ChatInbox {
    store: Arc<dyn DocumentStore>,
    page: PagedLiveQuery<Conversation>,
    chat: ChatRepository,
}

/// Live message list of one conversation, oldest first
pub struct ChatThread {
    conversation: String,
    messages: LiveCollection<ChatMessage>,
    chat: ChatRepository,
}

impl ChatInbox {
    pub fn new(store: Arc<dyn DocumentStore>, page_size: usize, lookahead: LookaheadPolicy) -> Self {
        Self {
            page: PagedLiveQuery::new(store.clone(), PageSpec::of::<Conversation>(page_size))
                .with_lookahead(lookahead),
            chat: ChatRepository::new(store.clone()),
            store,
        }
    }

    pub fn window(&self) -> &PageWindow<Conversation> {
        self.page.window()
    }

    pub fn page_mut(&mut self) -> &mut PagedLiveQuery<Conversation> {
        &mut self.page
    }

    pub async fn open(&mut self) -> AppResult<&PageWindow<Conversation>> {
        self.page.first_page(Filter::none()).await
    }

    pub async fn next_page(&mut self) -> AppResult<bool> {
        self.page.next_page().await
    }

    pub async fn prev_page(&mut self) -> AppResult<bool> {
        self.page.prev_page().await
    }

    /// Subscribe to a conversation's messages and mark it read
    pub async fn open_thread(&self, conversation_id: &str) -> AppResult<ChatThread> {
        self.chat.get_conversation(conversation_id).await?;
        let messages = LiveCollection::open(
            self.store.clone(),
            ChatRepository::thread_query(conversation_id),
        )
        .await?;
        if let Err(e) = self.chat.mark_read(conversation_id).await {
            tracing::warn!(conversation = %conversation_id, error = %e, "Failed to reset unread counter");
        }
        Ok(ChatThread {
            conversation: conversation_id.to_string(),
            messages,
            chat: self.chat.clone(),
        })
    }

    pub fn close(&mut self) {
        self.page.close();
    }
}

impl ChatThread {
    pub fn conversation(&self) -> &str {
        &self.conversation
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.messages.items()
    }

    /// Send an admin reply; it shows up with the next snapshot
    pub async fn send(&self, body: &str) -> AppResult<ChatMessage> {
        self.chat.send(&self.conversation, body).await
    }

    pub async fn changed(&mut self) -> AppResult<bool> {
        self.messages.changed().await
    }

    pub fn drain(&mut self) -> AppResult<bool> {
        self.messages.drain()
    }
}
