//! Data models
//!
//! Explicit schemas for the documents the console reads from and writes to the
//! document store. Document fields are camelCase, money is `Decimal` stored as
//! a JSON number and timestamps are Unix milliseconds.
//!
//! Every entity implements [`Record`]. The document id is not part of the
//! stored body: it is injected when a document is decoded and skipped when a
//! record is encoded.

pub mod account;
pub mod banner;
pub mod category;
pub mod chat;
pub mod comment;
pub mod dish;
pub mod order;
pub mod voucher;

pub use account::*;
pub use banner::*;
pub use category::*;
pub use chat::*;
pub use comment::*;
pub use dish::*;
pub use order::*;
pub use voucher::*;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A typed view over one collection of the document store
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection holding documents of this type
    const COLLECTION: &'static str;

    /// Default sort key for live pages (always descending)
    const SORT_FIELD: &'static str = "createdAt";

    /// Human-readable resource name used in error messages
    const RESOURCE: &'static str;

    fn id(&self) -> &str;

    /// Schema checks that serde alone cannot express
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}
