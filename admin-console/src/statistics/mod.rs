//! Revenue aggregation over an in-memory order list
//!
//! Everything here is pure and synchronous: callers hand in the orders they
//! already hold (usually the dashboard's live snapshot). Calendar boundaries
//! are computed in the business time zone.

pub mod popularity;

pub use popularity::{PopularityReport, refresh_popularity};

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Timelike};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::AppResult;
use shared::models::{Order, OrderStatus};

use crate::utils::time;

/// Inclusive `[start, end]` interval in Unix millis
pub type TimeRange = (i64, i64);

// ============================================================================
// Time Ranges
// ============================================================================

/// Local day of `date`; `end` is the next midnight minus one millisecond
pub fn day_range(date: NaiveDate, tz: Tz) -> TimeRange {
    let start = time::day_start_millis(date, tz);
    let next = date
        .succ_opt()
        .map(|d| time::day_start_millis(d, tz))
        .unwrap_or(start + 86_400_000);
    (start, next - 1)
}

pub fn month_range(year: i32, month: u32, tz: Tz) -> AppResult<TimeRange> {
    let start = time::day_start_millis(time::month_start(year, month)?, tz);
    let next = time::day_start_millis(time::next_month_start(year, month)?, tz);
    Ok((start, next - 1))
}

pub fn year_range(year: i32, tz: Tz) -> AppResult<TimeRange> {
    let start = time::day_start_millis(time::month_start(year, 1)?, tz);
    let next = time::day_start_millis(time::month_start(year + 1, 1)?, tz);
    Ok((start, next - 1))
}

/// Orders created inside `range`
pub fn in_range<'a>(orders: &'a [Order], range: TimeRange) -> impl Iterator<Item = &'a Order> {
    let (start, end) = range;
    orders
        .iter()
        .filter(move |o| o.created_at >= start && o.created_at <= end)
}

// ============================================================================
// Revenue Series
// ============================================================================

/// Revenue per calendar bucket
///
/// Buckets are numbered from `first`: months 1-12, days 1-31, hours 0-23.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSeries {
    pub first: u32,
    pub totals: Vec<Decimal>,
}

impl RevenueSeries {
    fn zeroed(first: u32, len: usize) -> Self {
        Self {
            first,
            totals: vec![Decimal::ZERO; len],
        }
    }

    fn add(&mut self, bucket: u32, amount: Decimal) {
        if let Some(slot) = bucket
            .checked_sub(self.first)
            .and_then(|i| self.totals.get_mut(i as usize))
        {
            *slot += amount;
        }
    }

    /// Total of one bucket; zero outside the series
    pub fn at(&self, bucket: u32) -> Decimal {
        bucket
            .checked_sub(self.first)
            .and_then(|i| self.totals.get(i as usize))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn sum(&self) -> Decimal {
        self.totals.iter().copied().sum()
    }
}

/// Twelve monthly totals for `year`
pub fn yearly_series(orders: &[Order], year: i32, tz: Tz) -> RevenueSeries {
    let mut series = RevenueSeries::zeroed(1, 12);
    for order in orders {
        let Some(local) = time::local_datetime(order.created_at, tz) else {
            continue;
        };
        if local.year() == year {
            series.add(local.month(), order.total);
        }
    }
    series
}

/// One total per day of the month
pub fn monthly_series(orders: &[Order], year: i32, month: u32, tz: Tz) -> AppResult<RevenueSeries> {
    let days = time::days_in_month(year, month)?;
    let mut series = RevenueSeries::zeroed(1, days as usize);
    for order in orders {
        let Some(local) = time::local_datetime(order.created_at, tz) else {
            continue;
        };
        if local.year() == year && local.month() == month {
            series.add(local.day(), order.total);
        }
    }
    Ok(series)
}

/// Twenty-four hourly totals for `date`
pub fn daily_series(orders: &[Order], date: NaiveDate, tz: Tz) -> RevenueSeries {
    let mut series = RevenueSeries::zeroed(0, 24);
    for order in in_range(orders, day_range(date, tz)) {
        if let Some(local) = time::local_datetime(order.created_at, tz) {
            series.add(local.hour(), order.total);
        }
    }
    series
}

// ============================================================================
// Top Items
// ============================================================================

/// Best seller entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopItem {
    pub name: String,
    /// Sum of price × quantity
    pub revenue: Decimal,
    pub quantity: u64,
}

/// Group line items by name and keep the `n` highest earners
///
/// Ties keep the order in which names were first seen.
pub fn top_items<'a>(orders: impl IntoIterator<Item = &'a Order>, n: usize) -> Vec<TopItem> {
    let mut items: Vec<TopItem> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for line in orders.into_iter().flat_map(|o| o.items.iter()) {
        let slot = *index.entry(line.name.as_str()).or_insert_with(|| {
            items.push(TopItem {
                name: line.name.clone(),
                revenue: Decimal::ZERO,
                quantity: 0,
            });
            items.len() - 1
        });
        items[slot].revenue += line.revenue();
        items[slot].quantity += u64::from(line.quantity);
    }

    // sort_by is stable
    items.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    items.truncate(n);
    items
}

// ============================================================================
// Overview
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub orders: usize,
    pub revenue: Decimal,
    pub average_order_value: Decimal,
    pub by_status: HashMap<OrderStatus, usize>,
    /// Orders whose report is still waiting for an admin
    pub open_reports: usize,
}

pub fn overview(orders: &[Order], range: TimeRange) -> Overview {
    let mut count = 0usize;
    let mut revenue = Decimal::ZERO;
    let mut by_status: HashMap<OrderStatus, usize> =
        OrderStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut open_reports = 0usize;

    for order in in_range(orders, range) {
        count += 1;
        revenue += order.total;
        *by_status.entry(order.status).or_insert(0) += 1;
        if order.report_status.is_open() {
            open_reports += 1;
        }
    }

    let average_order_value = if count > 0 {
        (revenue / Decimal::from(count)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    Overview {
        orders: count,
        revenue,
        average_order_value,
        by_status,
        open_reports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderLine, ReportStatus};

    fn order(created_at: i64, total: i64) -> Order {
        Order {
            id: format!("o{}", created_at),
            items: Vec::new(),
            total: Decimal::from(total),
            status: OrderStatus::Completed,
            report_status: ReportStatus::None,
            created_at,
            customer: "u1".into(),
            address: None,
            note: None,
        }
    }

    fn millis(y: i32, m: u32, d: u32, h: u32) -> i64 {
        time::date_hms_to_millis(NaiveDate::from_ymd_opt(y, m, d).unwrap(), h, 0, 0, Tz::UTC)
    }

    #[test]
    fn test_ranges_are_inclusive() {
        let (start, end) = year_range(2024, Tz::UTC).unwrap();
        assert_eq!(start, 1_704_067_200_000);
        assert_eq!(end + 1, year_range(2025, Tz::UTC).unwrap().0);

        let (start, end) = month_range(2024, 2, Tz::UTC).unwrap();
        assert_eq!(end - start + 1, 29 * 86_400_000);

        let (start, end) = day_range(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), Tz::UTC);
        assert_eq!(end - start, 86_399_999);
        assert!(month_range(2024, 13, Tz::UTC).is_err());
    }

    #[test]
    fn test_series_bucket_by_local_calendar() {
        let orders = vec![order(millis(2024, 3, 31, 23), 10), order(millis(2024, 4, 1, 1), 5)];

        let utc = yearly_series(&orders, 2024, Tz::UTC);
        assert_eq!(utc.at(3), Decimal::from(10));
        assert_eq!(utc.at(4), Decimal::from(5));

        // Madrid is UTC+2 in April: 23:00Z on the 31st is already April 1st
        let madrid = yearly_series(&orders, 2024, chrono_tz::Europe::Madrid);
        assert_eq!(madrid.at(3), Decimal::ZERO);
        assert_eq!(madrid.at(4), Decimal::from(15));
    }

    #[test]
    fn test_monthly_and_daily_series() {
        let orders = vec![
            order(millis(2024, 2, 29, 8), 7),
            order(millis(2024, 2, 29, 8), 3),
            order(millis(2024, 2, 1, 20), 1),
        ];
        let month = monthly_series(&orders, 2024, 2, Tz::UTC).unwrap();
        assert_eq!(month.len(), 29);
        assert_eq!(month.at(29), Decimal::from(10));
        assert_eq!(month.at(1), Decimal::from(1));
        assert_eq!(month.sum(), Decimal::from(11));

        let day = daily_series(&orders, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(), Tz::UTC);
        assert_eq!(day.len(), 24);
        assert_eq!(day.at(8), Decimal::from(10));
        assert_eq!(day.at(20), Decimal::ZERO);
    }

    #[test]
    fn test_day_starting_in_dst_gap() {
        // America/Santiago jumps from 00:00 -04 to 01:00 -03 on 2022-09-11
        let tz = chrono_tz::America::Santiago;
        let eve = NaiveDate::from_ymd_opt(2022, 9, 10).unwrap();
        let day = NaiveDate::from_ymd_opt(2022, 9, 11).unwrap();
        let orders = vec![
            // 21:00 -04 on the 10th
            order(1_662_858_000_000, 50),
            // 10:00 -03 on the 11th
            order(1_662_901_200_000, 7),
        ];

        let (start, end) = day_range(day, tz);
        assert_eq!(start, day_range(eve, tz).1 + 1);
        assert_eq!(end - start + 1, 23 * 3_600_000);

        let series = daily_series(&orders, day, tz);
        assert_eq!(series.sum(), Decimal::from(7));
        assert_eq!(series.at(10), Decimal::from(7));

        let previous = daily_series(&orders, eve, tz);
        assert_eq!(previous.at(21), Decimal::from(50));
        assert_eq!(monthly_series(&orders, 2022, 9, tz).unwrap().at(10), Decimal::from(50));
    }

    #[test]
    fn test_top_items_ties_keep_first_seen_order() {
        let line = |name: &str, price: i64, quantity: u32| OrderLine {
            name: name.into(),
            price: Decimal::from(price),
            quantity,
            image: None,
        };
        let mut a = order(1, 0);
        a.items = vec![line("Tra Da", 1, 4), line("Com Tam", 2, 2), line("Pho", 5, 3)];
        let mut b = order(2, 0);
        b.items = vec![line("Com Tam", 4, 1)];

        let top = top_items(&[a, b], 3);
        let names: Vec<&str> = top.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Pho", "Com Tam", "Tra Da"]);
        assert_eq!(top[1].revenue, Decimal::from(8));
        assert_eq!(top[1].quantity, 3);

        // Equal revenue keeps first-seen order
        let mut c = order(3, 0);
        c.items = vec![line("Banh Xeo", 8, 1)];
        let mut d = order(4, 0);
        d.items = vec![line("Che", 4, 2)];
        let top = top_items([&c, &d], 5);
        assert_eq!(top[0].name, "Banh Xeo");
        assert_eq!(top[1].name, "Che");
        assert!(top_items(&[order(5, 0)], 3).is_empty());
    }

    #[test]
    fn test_overview() {
        let mut reported = order(millis(2024, 5, 2, 9), 30);
        reported.report_status = ReportStatus::WrongItem;
        reported.status = OrderStatus::Delivering;
        let orders = vec![order(millis(2024, 5, 1, 9), 10), reported, order(millis(2023, 5, 1, 9), 99)];

        let stats = overview(&orders, month_range(2024, 5, Tz::UTC).unwrap());
        assert_eq!(stats.orders, 2);
        assert_eq!(stats.revenue, Decimal::from(40));
        assert_eq!(stats.average_order_value, Decimal::from(20));
        assert_eq!(stats.by_status[&OrderStatus::Delivering], 1);
        assert_eq!(stats.by_status[&OrderStatus::Pending], 0);
        assert_eq!(stats.open_reports, 1);

        let empty = overview(&[], (0, 1));
        assert_eq!(empty.average_order_value, Decimal::ZERO);
    }
}
