//! Shared types for the restaurant admin console
//!
//! Entity schemas for every document collection the console touches and the
//! error types used across crates.

pub mod error;
pub mod models;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::Record;
pub use serde::{Deserialize, Serialize};
