//! Statistics dashboard
//!
//! Holds a live subscription to every order and answers the aggregation
//! questions over whatever snapshot it currently has.

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::error::{AppError, AppResult};
use shared::models::Order;

use crate::db::DishRepository;
use crate::live::LiveCollection;
use crate::statistics::{self, Overview, PopularityReport, RevenueSeries, TimeRange, TopItem};
use crate::store::{DocumentStore, Query, SortDirection};
use crate::utils::time;

pub struct StatisticsDashboard {
    orders: LiveCollection<Order>,
    dishes: DishRepository,
    timezone: Tz,
    popular_top_n: usize,
}

impl StatisticsDashboard {
    /// Subscribe to the full order set
    pub async fn open(
        store: Arc<dyn DocumentStore>,
        dishes: DishRepository,
        timezone: Tz,
        popular_top_n: usize,
    ) -> AppResult<Self> {
        let query = Query::collection("orders").order_by("createdAt", SortDirection::Descending);
        let orders = LiveCollection::open(store, query).await?;
        Ok(Self {
            orders,
            dishes,
            timezone,
            popular_top_n,
        })
    }

    pub fn orders(&self) -> &[Order] {
        self.orders.items()
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub async fn changed(&mut self) -> AppResult<bool> {
        self.orders.changed().await
    }

    pub fn drain(&mut self) -> AppResult<bool> {
        self.orders.drain()
    }

    pub fn yearly_series(&self, year: i32) -> RevenueSeries {
        statistics::yearly_series(self.orders(), year, self.timezone)
    }

    pub fn monthly_series(&self, year: i32, month: u32) -> AppResult<RevenueSeries> {
        statistics::monthly_series(self.orders(), year, month, self.timezone)
    }

    pub fn daily_series(&self, date: NaiveDate) -> RevenueSeries {
        statistics::daily_series(self.orders(), date, self.timezone)
    }

    /// Best sellers among orders created inside `range`
    pub fn top_items(&self, range: TimeRange, n: usize) -> Vec<TopItem> {
        statistics::top_items(statistics::in_range(self.orders(), range), n)
    }

    /// Best sellers of the month containing `now_millis`
    pub fn top_items_of_month(&self, now_millis: i64, n: usize) -> AppResult<Vec<TopItem>> {
        let (year, month) = time::year_month_of(now_millis, self.timezone)
            .ok_or_else(|| AppError::invalid(format!("Invalid timestamp: {}", now_millis)))?;
        let range = statistics::month_range(year, month, self.timezone)?;
        Ok(self.top_items(range, n))
    }

    pub fn overview(&self, range: TimeRange) -> Overview {
        statistics::overview(self.orders(), range)
    }

    /// Re-flag popular dishes from the current snapshot
    pub async fn refresh_popularity(&self, now_millis: i64) -> AppResult<PopularityReport> {
        statistics::refresh_popularity(
            &self.dishes,
            self.orders(),
            now_millis,
            self.timezone,
            self.popular_top_n,
        )
        .await
    }

    pub fn close(&mut self) {
        self.orders.close();
    }
}
