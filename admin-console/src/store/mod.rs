//! Document store abstraction
//!
//! The console never talks to a concrete database. Everything goes through
//! [`DocumentStore`]: live subscriptions that deliver full result snapshots,
//! one-shot queries with the same grammar, and point writes with partial-field
//! update semantics. [`MemoryStore`] is the in-process implementation.
//!
//! # Subscription lifecycle
//!
//! ```text
//! subscribe(query) ──▶ Subscription ──▶ next() ─▶ Ok(snapshot) ...
//!                          │                  └─▶ Err(e)  (terminal)
//!                          └── drop ──▶ token cancelled ──▶ store stops delivering
//! ```

pub mod error;
pub mod memory;
pub mod query;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use query::{Cursor, Filter, IndexKey, Query, SortDirection};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use shared::Record;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

/// Raw document body
pub type DocumentData = Map<String, Value>;

/// One delivery of a live subscription
pub type SnapshotEvent = StoreResult<Vec<Document>>;

/// A document as returned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: DocumentData,
}

impl Document {
    pub fn new(id: impl Into<String>, data: DocumentData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Decode into a typed record, validating the schema at the boundary
    pub fn decode<T: Record>(&self) -> StoreResult<T> {
        let mut body = self.data.clone();
        body.insert("id".to_string(), Value::String(self.id.clone()));

        let invalid = |reason: String| StoreError::InvalidDocument {
            collection: T::COLLECTION.to_string(),
            id: self.id.clone(),
            reason,
        };

        let record: T = serde_json::from_value(Value::Object(body))
            .map_err(|e| invalid(e.to_string()))?;
        record.check().map_err(invalid)?;
        Ok(record)
    }
}

/// Encode a record or a partial update payload into a document body
pub fn encode<T: Serialize>(value: &T) -> StoreResult<DocumentData> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(StoreError::Encode(format!(
            "expected an object, got {}",
            other
        ))),
        Err(e) => Err(StoreError::Encode(e.to_string())),
    }
}

/// Owned handle to a live query
///
/// Dropping the handle cancels the subscription synchronously; the store
/// never delivers to a cancelled subscription.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<SnapshotEvent>,
    _guard: DropGuard,
}

impl Subscription {
    pub fn new(id: u64, rx: mpsc::UnboundedReceiver<SnapshotEvent>, token: CancellationToken) -> Self {
        Self {
            id,
            rx,
            _guard: token.drop_guard(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Wait for the next snapshot; `None` once the store has closed the stream
    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        self.rx.recv().await
    }

    /// Take an already-delivered snapshot without waiting
    pub fn try_next(&mut self) -> Option<SnapshotEvent> {
        self.rx.try_recv().ok()
    }
}

/// Capability set the console needs from its document database
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Open a live query. The current result set is delivered first, then a
    /// full snapshot on every change of the matching set.
    async fn subscribe(&self, query: Query) -> StoreResult<Subscription>;

    /// One-shot query with the same grammar as [`subscribe`](Self::subscribe)
    async fn get(&self, query: &Query) -> StoreResult<Vec<Document>>;

    async fn get_doc(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Create a document with a generated id
    async fn add(&self, collection: &str, data: DocumentData) -> StoreResult<String>;

    /// Create or replace a document
    async fn set(&self, collection: &str, id: &str, data: DocumentData) -> StoreResult<()>;

    /// Merge `fields` into an existing document; other fields are preserved
    async fn update(&self, collection: &str, id: &str, fields: DocumentData) -> StoreResult<()>;

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::models::{Comment, ModerationStatus};

    #[test]
    fn test_decode_injects_id_and_validates() {
        let doc = Document::new(
            "c-1",
            json!({
                "dish": "d-1",
                "rating": 4,
                "body": "tasty",
                "status": "approved",
                "createdAt": 10
            })
            .as_object()
            .cloned()
            .unwrap(),
        );
        let comment: Comment = doc.decode().unwrap();
        assert_eq!(comment.id, "c-1");
        assert_eq!(comment.status, ModerationStatus::Approved);

        let broken = Document::new("c-2", json!({ "dish": "d-1" }).as_object().cloned().unwrap());
        assert!(matches!(
            broken.decode::<Comment>(),
            Err(StoreError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn test_encode_requires_object() {
        assert!(encode(&json!({ "a": 1 })).is_ok());
        assert!(matches!(encode(&json!(3)), Err(StoreError::Encode(_))));
    }
}
