//! In-process document store
//!
//! Emulates the behavior of a managed document database closely enough for
//! the console and its tests:
//!
//! - live subscriptions receive the full result set on subscribe and again on
//!   every write that changes it
//! - filtered + sorted queries can be made to require declared composite
//!   indexes, failing the same way a hosted backend does
//! - the store can be switched offline, or have only one-shot reads fail

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{
    Document, DocumentData, DocumentStore, IndexKey, Query, SnapshotEvent, StoreError,
    StoreResult, Subscription,
};

struct Subscriber {
    query: Query,
    tx: mpsc::UnboundedSender<SnapshotEvent>,
    token: CancellationToken,
    last: Vec<Document>,
}

impl Subscriber {
    fn is_live(&self) -> bool {
        !self.token.is_cancelled() && !self.tx.is_closed()
    }
}

#[derive(Default)]
struct Inner {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
    subscribers: DashMap<u64, Subscriber>,
    next_subscriber: AtomicU64,
    /// `None` disables index enforcement
    indexes: RwLock<Option<HashSet<IndexKey>>>,
    offline: AtomicBool,
    fail_reads: AtomicBool,
    writes: AtomicU64,
}

/// Shared-state in-memory [`DocumentStore`]; clones share the same data
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("subscribers", &self.inner.subscribers.len())
            .field("writes", &self.write_count())
            .finish()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject filtered + sorted queries that have no declared index
    pub fn require_indexes(&self) {
        let mut indexes = self.inner.indexes.write();
        if indexes.is_none() {
            *indexes = Some(HashSet::new());
        }
    }

    pub fn declare_index(&self, collection: &str, fields: &[&str], order_by: &str) {
        self.inner
            .indexes
            .write()
            .get_or_insert_with(HashSet::new)
            .insert(IndexKey::new(collection, fields, order_by));
    }

    /// Every operation fails with [`StoreError::Unavailable`] while offline
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Only one-shot reads fail; live subscriptions keep working
    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Subscriptions that have not been released
    pub fn active_subscriptions(&self) -> usize {
        self.inner.subscribers.retain(|_, s| s.is_live());
        self.inner.subscribers.len()
    }

    /// Insert documents without counting them as writes (test fixtures, seeding)
    pub fn seed(&self, collection: &str, docs: impl IntoIterator<Item = (String, DocumentData)>) {
        {
            let mut collections = self.inner.collections.write();
            let coll = collections.entry(collection.to_string()).or_default();
            for (id, data) in docs {
                coll.insert(id.clone(), Document::new(id, data));
            }
        }
        self.notify(collection);
    }

    fn ensure_online(&self) -> StoreResult<()> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }

    fn check_index(&self, query: &Query) -> StoreResult<()> {
        let indexes = self.inner.indexes.read();
        let (Some(declared), Some(required)) = (indexes.as_ref(), query.required_index()) else {
            return Ok(());
        };
        if declared.contains(&required) {
            return Ok(());
        }
        Err(StoreError::MissingIndex {
            collection: required.collection,
            fields: format!("{} / {}", required.fields.join(", "), required.order_by),
        })
    }

    fn run(&self, query: &Query) -> Vec<Document> {
        let collections = self.inner.collections.read();
        match collections.get(&query.collection) {
            Some(coll) => query.execute(coll.values()),
            None => Vec::new(),
        }
    }

    /// Push a fresh snapshot to every live subscriber of `collection` whose
    /// result set changed
    fn notify(&self, collection: &str) {
        self.inner.subscribers.retain(|_, s| s.is_live());
        for mut entry in self.inner.subscribers.iter_mut() {
            if entry.query.collection != collection {
                continue;
            }
            let result = self.run(&entry.query);
            if result == entry.last {
                continue;
            }
            if entry.tx.send(Ok(result.clone())).is_ok() {
                entry.last = result;
            }
        }
    }

    fn record_write(&self, collection: &str) {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        self.notify(collection);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn subscribe(&self, query: Query) -> StoreResult<Subscription> {
        self.ensure_online()?;

        let id = self.inner.next_subscriber.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();

        if let Err(e) = self.check_index(&query) {
            tracing::debug!(subscription = id, error = %e, "Live query rejected");
            // Terminal event; the subscriber is never registered
            let _ = tx.send(Err(e));
            return Ok(Subscription::new(id, rx, token));
        }

        let initial = self.run(&query);
        let _ = tx.send(Ok(initial.clone()));
        tracing::debug!(
            subscription = id,
            collection = %query.collection,
            size = initial.len(),
            "Live query opened"
        );

        self.inner.subscribers.insert(
            id,
            Subscriber {
                query,
                tx,
                token: token.clone(),
                last: initial,
            },
        );
        Ok(Subscription::new(id, rx, token))
    }

    async fn get(&self, query: &Query) -> StoreResult<Vec<Document>> {
        self.ensure_online()?;
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read failed".to_string()));
        }
        self.check_index(query)?;
        Ok(self.run(query))
    }

    async fn get_doc(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.ensure_online()?;
        let collections = self.inner.collections.read();
        Ok(collections.get(collection).and_then(|c| c.get(id)).cloned())
    }

    async fn add(&self, collection: &str, data: DocumentData) -> StoreResult<String> {
        self.ensure_online()?;
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.inner
            .collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), Document::new(id.clone(), data));
        self.record_write(collection);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, data: DocumentData) -> StoreResult<()> {
        self.ensure_online()?;
        self.inner
            .collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), Document::new(id, data));
        self.record_write(collection);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: DocumentData) -> StoreResult<()> {
        self.ensure_online()?;
        {
            let mut collections = self.inner.collections.write();
            let doc = collections
                .get_mut(collection)
                .and_then(|c| c.get_mut(id))
                .ok_or_else(|| StoreError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })?;
            doc.data.extend(fields);
        }
        self.record_write(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.ensure_online()?;
        let removed = self
            .inner
            .collections
            .write()
            .get_mut(collection)
            .and_then(|c| c.remove(id));
        if removed.is_some() {
            self.record_write(collection);
        }
        Ok(())
    }
}
