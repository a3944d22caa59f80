use admin_console::views::OrderTab;
use admin_console::{ConsoleContext, setup_environment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. dotenv, configuration, logging
    let config = setup_environment()?;

    tracing::info!("Admin console starting...");

    // 2. Context backed by the in-process store
    let (ctx, _store) = ConsoleContext::initialize(config)?;

    // 3. Screens that stay open for the whole session
    let mut dashboard = ctx.dashboard().await?;
    let mut board = ctx.order_board();
    board.open(OrderTab::All).await?;

    let now = admin_console::utils::time::now_millis();
    let report = dashboard.refresh_popularity(now).await?;
    tracing::info!(updated = report.updated, failed = report.failed, "Initial popularity refresh");

    loop {
        tokio::select! {
            changed = dashboard.changed() => {
                if !changed? {
                    break;
                }
                tracing::info!(orders = dashboard.orders().len(), "Order set changed");
            }
            window = board.page_mut().changed() => {
                let Some(window) = window? else {
                    break;
                };
                tracing::info!(page = window.page_index, items = window.len(), "Order board updated");
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    board.close();
    dashboard.close();
    Ok(())
}
