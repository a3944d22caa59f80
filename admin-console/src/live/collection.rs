//! Unpaginated live view
//!
//! Used where the whole matching set is small or needed at once: the
//! statistics dashboard (every order), a chat thread, the category list.

use std::marker::PhantomData;
use std::sync::Arc;

use shared::Record;
use shared::error::{AppError, AppResult, ErrorCode};

use super::{ViewState, decode_all};
use crate::store::{Document, DocumentStore, Query, Subscription};

pub struct LiveCollection<T: Record> {
    store: Arc<dyn DocumentStore>,
    query: Query,
    subscription: Option<Subscription>,
    docs: Vec<Document>,
    items: Vec<T>,
    state: ViewState,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> LiveCollection<T> {
    /// Subscribe to `query` and wait for the first snapshot
    pub async fn open(store: Arc<dyn DocumentStore>, query: Query) -> AppResult<Self> {
        let mut view = Self {
            store,
            query,
            subscription: None,
            docs: Vec::new(),
            items: Vec::new(),
            state: ViewState::Idle,
            _record: PhantomData,
        };
        view.reopen().await?;
        Ok(view)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Raw documents of the last snapshot, in query order
    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Drop the current subscription and subscribe again
    pub async fn reopen(&mut self) -> AppResult<()> {
        self.subscription = None;
        self.state = ViewState::Loading;

        let mut subscription = match self.store.subscribe(self.query.clone()).await {
            Ok(s) => s,
            Err(e) => return Err(self.fail(e.into())),
        };
        match subscription.next().await {
            Some(Ok(docs)) => {
                self.subscription = Some(subscription);
                self.apply(docs);
                Ok(())
            }
            Some(Err(e)) => Err(self.fail(e.into())),
            None => Err(self.fail(AppError::with_message(
                ErrorCode::SubscriptionFailed,
                "Live query closed before its first snapshot",
            ))),
        }
    }

    /// Wait for the next snapshot; `Ok(false)` when nothing is open
    pub async fn changed(&mut self) -> AppResult<bool> {
        let Some(subscription) = self.subscription.as_mut() else {
            return Ok(false);
        };
        match subscription.next().await {
            Some(Ok(docs)) => {
                self.apply(docs);
                Ok(true)
            }
            Some(Err(e)) => Err(self.fail(e.into())),
            None => {
                self.subscription = None;
                Ok(false)
            }
        }
    }

    /// Apply the newest already-delivered snapshot, if any
    pub fn drain(&mut self) -> AppResult<bool> {
        let Some(subscription) = self.subscription.as_mut() else {
            return Ok(false);
        };
        let mut latest = None;
        while let Some(event) = subscription.try_next() {
            match event {
                Ok(docs) => latest = Some(docs),
                Err(e) => return Err(self.fail(e.into())),
            }
        }
        match latest {
            Some(docs) => {
                self.apply(docs);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn close(&mut self) {
        self.subscription = None;
        self.docs.clear();
        self.items.clear();
        self.state = ViewState::Idle;
    }

    fn apply(&mut self, docs: Vec<Document>) {
        self.items = decode_all::<T>(&docs);
        self.docs = docs;
        self.state = ViewState::Ready;
    }

    fn fail(&mut self, error: AppError) -> AppError {
        tracing::warn!(collection = %self.query.collection, error = %error, "Live collection failed");
        self.subscription = None;
        self.state = ViewState::Error(error.clone());
        error
    }
}
