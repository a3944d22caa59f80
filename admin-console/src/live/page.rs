//! Cursor pagination over live subscriptions
//!
//! The store only supports forward cursors (`start_after`). Navigation is
//! built on that:
//!
//! ```text
//! Initial: order(desc)                          limit N
//! Next:    order(desc) start_after(last)        limit N
//! Prev:    order(asc)  start_after(first)       limit N, then reverse
//! ```
//!
//! Every delivered snapshot recomputes the page's first/last cursors and
//! runs a one-item lookahead past the last cursor to decide `has_next`.
//! Only one subscription is held at a time; the previous one is dropped
//! before the next is requested.

use std::marker::PhantomData;
use std::sync::Arc;

use shared::Record;
use shared::error::{AppError, AppResult, ErrorCode};

use super::{LookaheadPolicy, ViewState, decode_all};
use crate::store::{Cursor, Document, DocumentStore, Filter, Query, SortDirection, Subscription};

/// Navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// First page, no cursor
    Initial,
    /// Page after the current last cursor
    Next,
    /// Page before the current first cursor
    Prev,
}

/// What a paged view is configured to read
#[derive(Debug, Clone, PartialEq)]
pub struct PageSpec {
    pub collection: String,
    /// Field sorted descending for display
    pub sort_field: String,
    pub page_size: usize,
}

impl PageSpec {
    pub fn new(collection: impl Into<String>, sort_field: impl Into<String>, page_size: usize) -> Self {
        Self {
            collection: collection.into(),
            sort_field: sort_field.into(),
            page_size: page_size.max(1),
        }
    }

    /// Collection and sort field of `T`
    pub fn of<T: Record>(page_size: usize) -> Self {
        Self::new(T::COLLECTION, T::SORT_FIELD, page_size)
    }
}

/// The page currently on screen
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow<T> {
    /// Display order: sort field descending
    pub items: Vec<T>,
    /// Cursor of the first document of the page
    pub first: Option<Cursor>,
    /// Cursor of the last document of the page
    pub last: Option<Cursor>,
    pub has_next: bool,
    pub has_prev: bool,
    /// 0 for the initial page
    pub page_index: usize,
}

impl<T> Default for PageWindow<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            first: None,
            last: None,
            has_next: false,
            has_prev: false,
            page_index: 0,
        }
    }
}

impl<T> PageWindow<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Last navigation attempted, kept so a failed open can be retried
#[derive(Debug, Clone)]
struct Request {
    direction: Direction,
    cursor: Option<Cursor>,
    page_index: usize,
}

/// A live, paginated view over one collection
///
/// ```ignore
/// let mut orders = PagedLiveQuery::<Order>::new(store, PageSpec::of::<Order>(10));
/// orders.first_page(Filter::none()).await?;
/// while orders.window().has_next {
///     orders.next_page().await?;
/// }
/// ```
pub struct PagedLiveQuery<T: Record> {
    store: Arc<dyn DocumentStore>,
    spec: PageSpec,
    lookahead: LookaheadPolicy,
    filter: Filter,
    subscription: Option<Subscription>,
    request: Option<Request>,
    window: PageWindow<T>,
    state: ViewState,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> PagedLiveQuery<T> {
    pub fn new(store: Arc<dyn DocumentStore>, spec: PageSpec) -> Self {
        Self {
            store,
            spec,
            lookahead: LookaheadPolicy::EverySnapshot,
            filter: Filter::none(),
            subscription: None,
            request: None,
            window: PageWindow::default(),
            state: ViewState::Idle,
            _record: PhantomData,
        }
    }

    pub fn with_lookahead(mut self, policy: LookaheadPolicy) -> Self {
        self.lookahead = policy;
        self
    }

    pub fn window(&self) -> &PageWindow<T> {
        &self.window
    }

    pub fn items(&self) -> &[T] {
        &self.window.items
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn spec(&self) -> &PageSpec {
        &self.spec
    }

    pub fn page_index(&self) -> usize {
        self.window.page_index
    }

    pub fn is_open(&self) -> bool {
        self.subscription.is_some()
    }

    /// Open a page and wait for its first snapshot
    ///
    /// A filter different from the current one always restarts at the
    /// initial page, whatever `direction` says. `Next`/`Prev` without a
    /// cursor fall back to the initial page as well.
    pub async fn open_page(
        &mut self,
        direction: Direction,
        cursor: Option<Cursor>,
        filter: Filter,
    ) -> AppResult<&PageWindow<T>> {
        let filter_changed = filter != self.filter;
        self.filter = filter;

        let request = match (direction, cursor) {
            (Direction::Initial, _) => Request::initial(),
            (_, _) if filter_changed => {
                tracing::debug!(collection = %self.spec.collection, "Filter changed, restarting at first page");
                Request::initial()
            }
            (_, None) => {
                tracing::debug!(collection = %self.spec.collection, ?direction, "No cursor, opening first page");
                Request::initial()
            }
            (Direction::Next, Some(cursor)) => Request {
                direction: Direction::Next,
                cursor: Some(cursor),
                page_index: self.window.page_index + 1,
            },
            // Stepping back onto page 0 re-opens the unanchored first page so
            // new documents at the top keep showing up
            (Direction::Prev, Some(_)) if self.window.page_index <= 1 => Request::initial(),
            (Direction::Prev, Some(cursor)) => Request {
                direction: Direction::Prev,
                cursor: Some(cursor),
                page_index: self.window.page_index - 1,
            },
        };

        self.open(request).await
    }

    /// Open the initial page with `filter`
    pub async fn first_page(&mut self, filter: Filter) -> AppResult<&PageWindow<T>> {
        self.open_page(Direction::Initial, None, filter).await
    }

    /// Replace the filter; always lands on the initial page
    pub async fn set_filter(&mut self, filter: Filter) -> AppResult<&PageWindow<T>> {
        self.first_page(filter).await
    }

    /// Advance one page. Returns `false` without touching the subscription
    /// when there is no next page.
    pub async fn next_page(&mut self) -> AppResult<bool> {
        if !self.window.has_next || self.window.last.is_none() {
            return Ok(false);
        }
        let cursor = self.window.last.clone();
        let filter = self.filter.clone();
        self.open_page(Direction::Next, cursor, filter).await?;
        Ok(true)
    }

    /// Go back one page. A no-op on the initial page.
    ///
    /// When the current page has no first cursor (it emptied out under
    /// us) the initial page is opened instead.
    pub async fn prev_page(&mut self) -> AppResult<bool> {
        if self.window.page_index == 0 {
            return Ok(false);
        }
        let cursor = self.window.first.clone();
        let filter = self.filter.clone();
        self.open_page(Direction::Prev, cursor, filter).await?;
        Ok(true)
    }

    /// Re-issue the last navigation (after an error state)
    pub async fn retry(&mut self) -> AppResult<&PageWindow<T>> {
        let request = self.request.clone().unwrap_or_else(Request::initial);
        self.open(request).await
    }

    /// Wait for the next snapshot of the open page and apply it
    ///
    /// `Ok(None)` when nothing is open or the store closed the stream.
    pub async fn changed(&mut self) -> AppResult<Option<&PageWindow<T>>> {
        let Some(subscription) = self.subscription.as_mut() else {
            return Ok(None);
        };
        match subscription.next().await {
            Some(Ok(docs)) => {
                self.apply(docs).await;
                Ok(Some(&self.window))
            }
            Some(Err(e)) => Err(self.fail(e.into())),
            None => {
                tracing::debug!(collection = %self.spec.collection, "Live query closed by store");
                self.subscription = None;
                Ok(None)
            }
        }
    }

    /// Apply every snapshot already delivered, without waiting
    ///
    /// Only the newest snapshot is applied since each one is complete.
    /// Returns whether the window changed.
    pub async fn drain(&mut self) -> AppResult<bool> {
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
                self.apply(docs).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Release the subscription and reset the view
    pub fn close(&mut self) {
        self.release();
        self.window = PageWindow::default();
        self.request = None;
        self.state = ViewState::Idle;
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            tracing::debug!(
                collection = %self.spec.collection,
                subscription = subscription.id(),
                "Releasing live query"
            );
        }
    }

    async fn open(&mut self, request: Request) -> AppResult<&PageWindow<T>> {
        // Teardown strictly precedes the new subscription
        self.release();
        self.request = Some(request.clone());
        self.state = ViewState::Loading;

        let query = self.page_query(request.direction, request.cursor.clone());
        let mut subscription = match self.store.subscribe(query).await {
            Ok(s) => s,
            Err(e) => return Err(self.fail(e.into())),
        };

        match subscription.next().await {
            Some(Ok(docs)) => {
                tracing::debug!(
                    collection = %self.spec.collection,
                    direction = ?request.direction,
                    page = request.page_index,
                    "Page opened"
                );
                self.subscription = Some(subscription);
                self.window.page_index = request.page_index;
                self.window.has_prev = request.page_index > 0;
                // Cursors of the old page must not drive the lookahead policy
                self.window.last = None;
                self.apply(docs).await;
                Ok(&self.window)
            }
            Some(Err(e)) => Err(self.fail(e.into())),
            None => Err(self.fail(AppError::with_message(
                ErrorCode::SubscriptionFailed,
                "Live query closed before its first snapshot",
            ))),
        }
    }

    fn base_query(&self) -> Query {
        Query::collection(self.spec.collection.as_str()).filter(self.filter.clone())
    }

    fn page_query(&self, direction: Direction, cursor: Option<Cursor>) -> Query {
        let sort = self.spec.sort_field.as_str();
        let query = match direction {
            Direction::Prev => self.base_query().order_by(sort, SortDirection::Ascending),
            _ => self.base_query().order_by(sort, SortDirection::Descending),
        };
        let query = match cursor {
            Some(cursor) if direction != Direction::Initial => query.start_after(cursor),
            _ => query,
        };
        query.limit(self.spec.page_size)
    }

    fn active_direction(&self) -> Direction {
        self.request
            .as_ref()
            .map(|r| r.direction)
            .unwrap_or(Direction::Initial)
    }

    async fn apply(&mut self, mut docs: Vec<Document>) {
        if self.active_direction() == Direction::Prev {
            docs.reverse();
        }

        if docs.is_empty() {
            self.window.items.clear();
            self.window.first = None;
            self.window.last = None;
            self.window.has_next = false;
            self.state = ViewState::Ready;
            return;
        }

        let display = self
            .base_query()
            .order_by(self.spec.sort_field.as_str(), SortDirection::Descending);
        // Cursors come from the raw snapshot so a bad document never shifts them
        let first = docs.first().map(|d| display.cursor_for(d));
        let last = docs.last().map(|d| display.cursor_for(d));

        let cursor_moved = last != self.window.last;
        self.window.items = decode_all::<T>(&docs);
        self.window.first = first;
        self.window.last = last;

        let run_lookahead = match self.lookahead {
            LookaheadPolicy::EverySnapshot => true,
            LookaheadPolicy::WhenCursorMoves => cursor_moved,
        };
        if run_lookahead {
            self.window.has_next = self.lookahead().await;
        }
        self.state = ViewState::Ready;
    }

    /// Is there at least one document past the last cursor?
    ///
    /// A failed read is logged and reported as "no next page".
    async fn lookahead(&self) -> bool {
        let Some(last) = self.window.last.clone() else {
            return false;
        };
        let query = self
            .base_query()
            .order_by(self.spec.sort_field.as_str(), SortDirection::Descending)
            .start_after(last)
            .limit(1);
        match self.store.get(&query).await {
            Ok(docs) => !docs.is_empty(),
            Err(e) => {
                tracing::warn!(collection = %self.spec.collection, error = %e, "Lookahead failed, assuming last page");
                false
            }
        }
    }

    fn fail(&mut self, error: AppError) -> AppError {
        tracing::warn!(collection = %self.spec.collection, error = %error, "Live query failed");
        self.release();
        self.window.items.clear();
        self.window.first = None;
        self.window.last = None;
        self.window.has_next = false;
        // `page_index` stays put; `retry` re-issues the stored request
        self.window.has_prev = false;
        self.state = ViewState::Error(error.clone());
        error
    }
}

impl Request {
    fn initial() -> Self {
        Self {
            direction: Direction::Initial,
            cursor: None,
            page_index: 0,
        }
    }
}
