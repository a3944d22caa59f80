//! Admin Console - data layer of the restaurant admin console
//!
//! # Overview
//!
//! - **Store** (`store`): document store abstraction, query grammar and the
//!   in-process `MemoryStore`
//! - **Live queries** (`live`): cursor pagination over real-time
//!   subscriptions, unpaginated live collections
//! - **Statistics** (`statistics`): revenue series, best sellers, popular-dish
//!   refresh
//! - **Repositories** (`db`): typed CRUD per entity
//! - **Screens** (`views`): order board, comment inbox, account directory,
//!   chat inbox, statistics dashboard
//!
//! # Layout
//!
//! ```text
//! admin-console/src/
//! ├── core/          # config, console context
//! ├── store/         # DocumentStore, Query, MemoryStore
//! ├── blob/          # BlobStore, LocalBlobStore
//! ├── live/          # PagedLiveQuery, LiveCollection
//! ├── db/            # repositories
//! ├── statistics/    # aggregation
//! ├── views/         # screens
//! └── utils/         # logging, time
//! ```

pub mod blob;
pub mod core;
pub mod db;
pub mod live;
pub mod statistics;
pub mod store;
pub mod utils;
pub mod views;

// Re-export public types
pub use core::{Config, ConsoleContext};
pub use live::{Direction, LiveCollection, LookaheadPolicy, PageWindow, PagedLiveQuery, ViewState};
pub use store::{DocumentStore, MemoryStore};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Load `.env`, configuration and logging
pub fn setup_environment() -> AppResult<Config> {
    let config = Config::from_env();

    if let Some(dir) = config.log_dir.as_deref()
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!("Failed to create log dir {}: {}", dir, e);
    }

    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );
    config.validate()?;
    Ok(config)
}
