//! Order board
//!
//! Paged live list of orders with three kinds of tabs. Actions write through
//! the repository; the page itself only changes when the store delivers the
//! next snapshot.

use std::sync::Arc;

use serde_json::json;
use shared::error::AppResult;
use shared::models::{Order, OrderStatus, ReportStatus};

use crate::db::OrderRepository;
use crate::live::{LookaheadPolicy, PageSpec, PageWindow, PagedLiveQuery};
use crate::store::{DocumentStore, Filter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTab {
    All,
    Status(OrderStatus),
    /// Orders with an open report
    Reported,
}

impl OrderTab {
    pub fn filter(&self) -> Filter {
        match self {
            OrderTab::All => Filter::none(),
            OrderTab::Status(status) => Filter::none().eq("status", status.as_str()),
            OrderTab::Reported => Filter::none().any_of(
                "reportStatus",
                [
                    ReportStatus::NotDelivered,
                    ReportStatus::QualityIssue,
                    ReportStatus::WrongItem,
                ]
                .iter()
                .map(|r| json!(r.code()))
                .collect(),
            ),
        }
    }
}

pub struct OrderBoard {
    page: PagedLiveQuery<Order>,
    orders: OrderRepository,
    tab: OrderTab,
}

impl OrderBoard {
    pub fn new(store: Arc<dyn DocumentStore>, page_size: usize, lookahead: LookaheadPolicy) -> Self {
        Self {
            page: PagedLiveQuery::new(store.clone(), PageSpec::of::<Order>(page_size))
                .with_lookahead(lookahead),
            orders: OrderRepository::new(store),
            tab: OrderTab::All,
        }
    }

    pub fn tab(&self) -> OrderTab {
        self.tab
    }

    pub fn window(&self) -> &PageWindow<Order> {
        self.page.window()
    }

    pub fn page(&self) -> &PagedLiveQuery<Order> {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut PagedLiveQuery<Order> {
        &mut self.page
    }

    /// Switch tab; always lands on the first page
    pub async fn open(&mut self, tab: OrderTab) -> AppResult<&PageWindow<Order>> {
        self.tab = tab;
        self.page.set_filter(tab.filter()).await
    }

    pub async fn next_page(&mut self) -> AppResult<bool> {
        self.page.next_page().await
    }

    pub async fn prev_page(&mut self) -> AppResult<bool> {
        self.page.prev_page().await
    }

    pub async fn change_status(&self, id: &str, status: OrderStatus) -> AppResult<()> {
        self.orders.update_status(id, status).await
    }

    pub async fn resolve_report(&self, id: &str) -> AppResult<()> {
        self.orders.resolve_report(id).await
    }

    pub fn close(&mut self) {
        self.page.close();
    }
}
