//! Popular-dish flag refresh
//!
//! The current month's best sellers (by revenue) get `isPopular = true`,
//! every other dish gets `false`. Only dishes whose flag actually changes are
//! written, one partial update each, and a failed write does not stop the
//! others.

use std::collections::HashSet;

use chrono_tz::Tz;
use serde::Serialize;
use shared::error::{AppError, AppResult};
use shared::models::Order;

use super::{in_range, month_range, top_items};
use crate::db::{DishRepository, Repository};
use crate::utils::time;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularityReport {
    /// Names ranked into the top set, best first
    pub top: Vec<String>,
    pub updated: usize,
    pub failed: usize,
    pub unchanged: usize,
}

/// Recompute `isPopular` for every dish from the orders of the month
/// containing `now_millis`
///
/// Loading the dish list is the only hard failure; individual flag writes
/// are counted in the report.
pub async fn refresh_popularity(
    dishes: &DishRepository,
    orders: &[Order],
    now_millis: i64,
    tz: Tz,
    top_n: usize,
) -> AppResult<PopularityReport> {
    let (year, month) = time::year_month_of(now_millis, tz)
        .ok_or_else(|| AppError::invalid(format!("Invalid timestamp: {}", now_millis)))?;
    let range = month_range(year, month, tz)?;

    let top: Vec<String> = top_items(in_range(orders, range), top_n)
        .into_iter()
        .map(|item| item.name)
        .collect();
    let popular: HashSet<&str> = top.iter().map(String::as_str).collect();

    let mut report = PopularityReport::default();
    for dish in dishes.find_all().await? {
        let should_be_popular = popular.contains(dish.name.as_str());
        if dish.is_popular == should_be_popular {
            report.unchanged += 1;
            continue;
        }
        match dishes.set_popular(&dish.id, should_be_popular).await {
            Ok(()) => report.updated += 1,
            Err(e) => {
                tracing::warn!(dish = %dish.id, error = %e, "Failed to update popular flag");
                report.failed += 1;
            }
        }
    }

    tracing::info!(
        top = ?top,
        updated = report.updated,
        failed = report.failed,
        unchanged = report.unchanged,
        "Popular dishes refreshed"
    );
    report.top = top;
    Ok(report)
}
