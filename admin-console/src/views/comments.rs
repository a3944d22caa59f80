//! Comment inbox

use std::sync::Arc;

use shared::error::AppResult;
use shared::models::{Comment, ModerationStatus};

use crate::db::CommentRepository;
use crate::live::{LookaheadPolicy, PageSpec, PageWindow, PagedLiveQuery};
use crate::store::{DocumentStore, Filter};

/// Paged live list of comments, optionally narrowed to one moderation status
pub struct CommentInbox {
    page: PagedLiveQuery<Comment>,
    comments: CommentRepository,
    status: Option<ModerationStatus>,
}

impl CommentInbox {
    pub fn new(store: Arc<dyn DocumentStore>, page_size: usize, lookahead: LookaheadPolicy) -> Self {
        Self {
            page: PagedLiveQuery::new(store.clone(), PageSpec::of::<Comment>(page_size))
                .with_lookahead(lookahead),
            comments: CommentRepository::new(store),
            status: None,
        }
    }

    pub fn status(&self) -> Option<ModerationStatus> {
        self.status
    }

    pub fn window(&self) -> &PageWindow<Comment> {
        self.page.window()
    }

    pub fn page_mut(&mut self) -> &mut PagedLiveQuery<Comment> {
        &mut self.page
    }

    /// `None` shows every comment
    pub async fn open(&mut self, status: Option<ModerationStatus>) -> AppResult<&PageWindow<Comment>> {
        self.status = status;
        let filter = match status {
            Some(status) => Filter::none().eq("status", status.as_str()),
            None => Filter::none(),
        };
        self.page.set_filter(filter).await
    }

    pub async fn next_page(&mut self) -> AppResult<bool> {
        self.page.next_page().await
    }

    pub async fn prev_page(&mut self) -> AppResult<bool> {
        self.page.prev_page().await
    }

    pub async fn approve(&self, id: &str) -> AppResult<()> {
        self.comments.approve(id).await
    }

    pub async fn reject(&self, id: &str) -> AppResult<()> {
        self.comments.reject(id).await
    }

    pub fn close(&mut self) {
        self.page.close();
    }
}
