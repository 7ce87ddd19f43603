use std::sync::Arc;

use market_news::service::automation::news_poller::{poll_interval_from_env, spawn_news_poller};
use market_news::service::automation::PollerTargets;
use market_news::NewsService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .compact()
        .init();

    let service = Arc::new(NewsService::from_env()?);
    let targets = PollerTargets::from_env();
    let every = poll_interval_from_env();

    tracing::info!(
        proxy = %service.config().proxy_base,
        api = %service.config().api_base,
        "news poller configured"
    );

    let Some(handle) = spawn_news_poller(service, targets, every) else {
        return Err("news poller did not start".into());
    };

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down news poller");
    handle.abort();
    Ok(())
}
