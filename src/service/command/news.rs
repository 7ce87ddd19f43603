use clap::Parser;

use crate::models::{NewsCategory, NewsItem, UnknownCategory};
use crate::service::news::NewsService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsTarget {
    Market(NewsCategory),
    Symbol(String),
}

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "market-news", about = "Latest market or ticker headlines")]
pub struct Cli {
    /// `market` for the general feed, otherwise a ticker symbol
    pub target: Option<String>,

    /// Provider category for the market feed (general, forex, crypto, merger)
    #[arg(value_parser = parse_category)]
    pub category: Option<NewsCategory>,

    /// Maximum number of headlines
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Print the normalized items as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_category(raw: &str) -> Result<NewsCategory, UnknownCategory> {
    raw.parse()
}

impl Cli {
    /// Which feed the arguments ask for. A category only applies to `market`.
    pub fn news_target(&self) -> Result<NewsTarget, String> {
        match (self.target.as_deref(), self.category) {
            (None, _) => Ok(NewsTarget::Market(self.category.unwrap_or_default())),
            (Some(target), category) if target.eq_ignore_ascii_case("market") => {
                Ok(NewsTarget::Market(category.unwrap_or_default()))
            }
            (Some(symbol), None) => Ok(NewsTarget::Symbol(symbol.trim().to_uppercase())),
            (Some(symbol), Some(category)) => Err(format!(
                "category {category} only applies to the market feed, not {symbol}"
            )),
        }
    }
}

pub async fn handle(cli: &Cli, news: &NewsService) -> Result<String, String> {
    let (heading, items) = match cli.news_target()? {
        NewsTarget::Market(category) => (
            format!("Latest {category} market news"),
            news.fetch_market_news(category, cli.limit).await,
        ),
        NewsTarget::Symbol(symbol) => (
            format!("Latest news for {symbol}"),
            news.fetch_symbol_news(&symbol, cli.limit).await,
        ),
    };

    if cli.json {
        return serde_json::to_string_pretty(&items).map_err(|e| format!("encode error: {e}"));
    }
    Ok(format_headlines(&heading, &items))
}

/// Plain-text rendering: one bullet per headline with source, time and link.
pub fn format_headlines(heading: &str, items: &[NewsItem]) -> String {
    let mut lines = Vec::with_capacity(items.len() * 2 + 1);
    lines.push(heading.to_string());

    if items.is_empty() {
        lines.push("No headlines available.".to_string());
        return lines.join("\n");
    }

    for item in items {
        let source = if item.source.is_empty() {
            "Unknown"
        } else {
            item.source.as_str()
        };
        let time_str = item.published_at.format("%Y-%m-%d %H:%M UTC");
        lines.push(format!("• {} — {} ({})", item.title, source, time_str));
        if !item.url.is_empty() {
            lines.push(format!("  {}", item.url));
        }
    }

    lines.join("\n")
}
