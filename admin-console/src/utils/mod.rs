//! Utilities: error re-exports, logging, time helpers

pub mod logger;
pub mod time;

// Re-export error types from shared
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};
