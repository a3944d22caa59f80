use std::sync::Arc;

use crate::blob::{BlobStore, LocalBlobStore};
use crate::core::Config;
use crate::db::{
    AccountRepository, BannerRepository, CategoryRepository, ChatRepository, CommentRepository,
    DishRepository, OrderRepository, VoucherRepository,
};
use crate::store::{DocumentStore, MemoryStore};
use crate::utils::AppResult;
use crate::views::{AccountDirectory, ChatInbox, CommentInbox, OrderBoard, StatisticsDashboard};

/// Console context - shared handles every screen is built from
///
/// Cheap to clone: the store and blob store are behind `Arc`.
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Config | Configuration (immutable) |
/// | store | Arc<dyn DocumentStore> | Document database |
/// | blobs | Arc<dyn BlobStore> | Image storage |
///
/// ```ignore
/// let ctx = ConsoleContext::with_store(config, Arc::new(MemoryStore::new()));
/// let mut board = ctx.order_board();
/// board.open(OrderTab::All).await?;
/// ```
#[derive(Clone)]
pub struct ConsoleContext {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
    pub blobs: Arc<dyn BlobStore>,
}

impl ConsoleContext {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            config,
            store,
            blobs,
        }
    }

    /// Use `store` and a local blob store configured from `config`
    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let blobs = Arc::new(LocalBlobStore::new(
            config.blob_dir.clone(),
            config.blob_base_url.clone(),
        ));
        Self::new(config, store, blobs)
    }

    /// Validate `config` and back the console with an in-process store
    pub fn initialize(config: Config) -> AppResult<(Self, MemoryStore)> {
        config.validate()?;
        let store = MemoryStore::new();
        tracing::info!(
            environment = %config.environment,
            page_size = config.page_size,
            timezone = %config.timezone,
            lookahead = %config.lookahead,
            "Console context initialized"
        );
        Ok((Self::with_store(config, Arc::new(store.clone())), store))
    }

    // ========== Repositories ==========

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.store.clone())
    }

    pub fn comments(&self) -> CommentRepository {
        CommentRepository::new(self.store.clone())
    }

    pub fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.store.clone())
    }

    pub fn dishes(&self) -> DishRepository {
        DishRepository::new(self.store.clone(), self.blobs.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.store.clone())
    }

    pub fn vouchers(&self) -> VoucherRepository {
        VoucherRepository::new(self.store.clone())
    }

    pub fn banners(&self) -> BannerRepository {
        BannerRepository::new(self.store.clone(), self.blobs.clone())
    }

    pub fn chat(&self) -> ChatRepository {
        ChatRepository::new(self.store.clone())
    }

    // ========== Screens ==========

    pub fn order_board(&self) -> OrderBoard {
        OrderBoard::new(self.store.clone(), self.config.page_size, self.config.lookahead)
    }

    pub fn comment_inbox(&self) -> CommentInbox {
        CommentInbox::new(self.store.clone(), self.config.page_size, self.config.lookahead)
    }

    pub fn account_directory(&self) -> AccountDirectory {
        AccountDirectory::new(self.store.clone(), self.config.page_size, self.config.lookahead)
    }

    pub fn chat_inbox(&self) -> ChatInbox {
        ChatInbox::new(self.store.clone(), self.config.page_size, self.config.lookahead)
    }

    pub async fn dashboard(&self) -> AppResult<StatisticsDashboard> {
        StatisticsDashboard::open(
            self.store.clone(),
            self.dishes(),
            self.config.timezone,
            self.config.popular_top_n,
        )
        .await
    }
}
