use anyhow::{anyhow, Result};
use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;

use market_news::service::command::news::{self as news_cmd, Cli};
use market_news::NewsService;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let news = NewsService::from_env()?;

    let output = news_cmd::handle(&cli, &news)
        .await
        .map_err(|e| anyhow!(e))?;
    println!("{output}");
    Ok(())
}
