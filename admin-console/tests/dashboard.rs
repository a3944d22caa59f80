use std::sync::Arc;

use admin_console::blob::LocalBlobStore;
use admin_console::db::{DishRepository, Repository};
use admin_console::statistics::{self, year_range};
use admin_console::store::DocumentData;
use admin_console::utils::time::{date_hms_to_millis, now_millis};
use admin_console::views::StatisticsDashboard;
use admin_console::{Config, ConsoleContext, MemoryStore};
use chrono::NaiveDate;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde_json::{Value, json};

fn at(y: i32, m: u32, d: u32) -> i64 {
    date_hms_to_millis(NaiveDate::from_ymd_opt(y, m, d).unwrap(), 12, 0, 0, Tz::UTC)
}

fn order(id: &str, created_at: i64, total: i64, items: Value) -> (String, DocumentData) {
    (
        id.to_string(),
        json!({
            "items": items,
            "total": total,
            "status": "completed",
            "createdAt": created_at,
            "customer": "u1"
        })
        .as_object()
        .cloned()
        .unwrap(),
    )
}

fn dish(id: &str, name: &str, is_popular: bool) -> (String, DocumentData) {
    (
        id.to_string(),
        json!({
            "name": name,
            "price": 5,
            "category": "main",
            "isPopular": is_popular,
            "createdAt": 1
        })
        .as_object()
        .cloned()
        .unwrap(),
    )
}

fn pho_and_banh_mi() -> Value {
    json!([
        { "name": "Pho", "price": 5, "quantity": 2 },
        { "name": "Banh Mi", "price": 3, "quantity": 1 }
    ])
}

async fn open_dashboard(store: &MemoryStore, dir: &tempfile::TempDir) -> StatisticsDashboard {
    let dishes = DishRepository::new(
        Arc::new(store.clone()),
        Arc::new(LocalBlobStore::new(dir.path(), "http://cdn.test/images")),
    );
    StatisticsDashboard::open(Arc::new(store.clone()), dishes, Tz::UTC, 6)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_yearly_series_buckets_by_month() {
    let store = MemoryStore::new();
    store.seed(
        "orders",
        [
            order("o1", at(2024, 1, 10), 10, json!([])),
            order("o2", at(2024, 1, 20), 20, json!([])),
            order("o3", at(2024, 6, 30), 30, json!([])),
            order("o4", at(2023, 12, 31), 99, json!([])),
        ],
    );
    let dir = tempfile::tempdir().unwrap();
    let dashboard = open_dashboard(&store, &dir).await;

    let series = dashboard.yearly_series(2024);
    assert_eq!(series.len(), 12);
    assert_eq!(series.at(1), Decimal::from(30));
    assert_eq!(series.at(6), Decimal::from(30));
    for month in [2, 3, 4, 5, 7, 8, 9, 10, 11, 12] {
        assert_eq!(series.at(month), Decimal::ZERO);
    }

    let stats = dashboard.overview(year_range(2024, Tz::UTC).unwrap());
    assert_eq!(stats.orders, 3);
    assert_eq!(stats.revenue, Decimal::from(60));
}

#[tokio::test]
async fn test_top_items_rank_by_revenue() {
    let store = MemoryStore::new();
    store.seed(
        "orders",
        [
            order("o1", at(2024, 3, 1), 13, pho_and_banh_mi()),
            order("o2", at(2024, 3, 2), 13, pho_and_banh_mi()),
        ],
    );
    let dir = tempfile::tempdir().unwrap();
    let dashboard = open_dashboard(&store, &dir).await;

    let top = dashboard.top_items(statistics::month_range(2024, 3, Tz::UTC).unwrap(), 6);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].name, "Pho");
    assert_eq!(top[0].revenue, Decimal::from(20));
    assert_eq!(top[0].quantity, 4);
    assert_eq!(top[1].name, "Banh Mi");
    assert_eq!(top[1].revenue, Decimal::from(6));

    assert!(dashboard.top_items(statistics::month_range(2024, 4, Tz::UTC).unwrap(), 6).is_empty());

    let best = dashboard.top_items_of_month(at(2024, 3, 15), 1).unwrap();
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].name, "Pho");
    assert!(dashboard.top_items_of_month(at(2024, 4, 15), 1).unwrap().is_empty());
}

#[tokio::test]
async fn test_popularity_refresh_writes_only_changed_dishes() {
    let store = MemoryStore::new();
    let now = now_millis();
    store.seed(
        "orders",
        [
            order("o1", now, 13, pho_and_banh_mi()),
            // Last year's best seller must not count
            order("o2", now - 400 * 86_400_000, 500, json!([{ "name": "Com Tam", "price": 100, "quantity": 5 }])),
        ],
    );
    store.seed(
        "dishes",
        [
            dish("d1", "Pho", false),
            dish("d2", "Banh Mi", true),
            dish("d3", "Com Tam", true),
            dish("d4", "Che", false),
        ],
    );
    let dir = tempfile::tempdir().unwrap();
    let dashboard = open_dashboard(&store, &dir).await;

    let writes = store.write_count();
    let report = dashboard.refresh_popularity(now).await.unwrap();
    assert_eq!(report.top, vec!["Pho", "Banh Mi"]);
    assert_eq!(report.updated, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.unchanged, 2);
    assert_eq!(store.write_count() - writes, 2);

    let dishes = DishRepository::new(
        Arc::new(store.clone()),
        Arc::new(LocalBlobStore::new(dir.path(), "http://cdn.test/images")),
    );
    assert!(dishes.get("d1").await.unwrap().is_popular);
    assert!(dishes.get("d2").await.unwrap().is_popular);
    assert!(!dishes.get("d3").await.unwrap().is_popular);
    assert!(!dishes.get("d4").await.unwrap().is_popular);

    // Nothing left to change
    let again = dashboard.refresh_popularity(now).await.unwrap();
    assert_eq!(again.updated, 0);
    assert_eq!(store.write_count() - writes, 2);
    assert_eq!(dishes.find_all().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_dashboard_follows_new_orders() {
    let dir = tempfile::tempdir().unwrap();
    let work_dir = dir.path().to_string_lossy().to_string();
    let config = Config::with_overrides(work_dir, 10, Tz::UTC);
    let (ctx, store) = ConsoleContext::initialize(config).unwrap();

    let mut dashboard = ctx.dashboard().await.unwrap();
    assert!(dashboard.orders().is_empty());

    store.seed("orders", [order("o1", at(2024, 2, 29), 42, json!([]))]);
    assert!(dashboard.changed().await.unwrap());
    assert_eq!(dashboard.monthly_series(2024, 2).unwrap().at(29), Decimal::from(42));

    dashboard.close();
    assert_eq!(store.active_subscriptions(), 0);
}

#[tokio::test]
async fn test_context_screens_share_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let work_dir = dir.path().to_string_lossy().to_string();
    let (ctx, store) = ConsoleContext::initialize(Config::with_overrides(work_dir, 5, Tz::UTC)).unwrap();

    let mut comments = ctx.comment_inbox();
    let mut accounts = ctx.account_directory();
    let mut chats = ctx.chat_inbox();
    assert!(comments.open(None).await.unwrap().is_empty());
    assert!(accounts.open(None).await.unwrap().is_empty());
    assert!(chats.open().await.unwrap().is_empty());
    assert_eq!(store.active_subscriptions(), 3);

    comments.close();
    accounts.close();
    chats.close();
    assert_eq!(store.active_subscriptions(), 0);
}
