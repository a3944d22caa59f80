//! Document store errors

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Errors reported by a [`DocumentStore`](super::DocumentStore)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("Query on {collection} requires an index on ({fields})")]
    MissingIndex { collection: String, fields: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Document {collection}/{id} is invalid: {reason}")]
    InvalidDocument {
        collection: String,
        id: String,
        reason: String,
    },

    #[error("Cannot encode document: {0}")]
    Encode(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let code = match &err {
            StoreError::NotFound { .. } => ErrorCode::DocumentNotFound,
            StoreError::MissingIndex { .. } => ErrorCode::MissingIndex,
            StoreError::Unavailable(_) => ErrorCode::StoreUnavailable,
            StoreError::InvalidDocument { .. } => ErrorCode::InvalidDocument,
            StoreError::Encode(_) => ErrorCode::InvalidFormat,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
