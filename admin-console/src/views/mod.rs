//! Screen view models
//!
//! Each screen owns its live subscriptions and is driven from one task
//! through `&mut self`. Actions go through the repositories and return typed
//! errors; what is displayed only changes when a snapshot is applied.

pub mod accounts;
pub mod chat;
pub mod comments;
pub mod dashboard;
pub mod orders;

pub use accounts::AccountDirectory;
pub use chat::{ChatInbox, ChatThread};
pub use comments::CommentInbox;
pub use dashboard::StatisticsDashboard;
pub use orders::{OrderBoard, OrderTab};
