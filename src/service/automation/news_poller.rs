use std::collections::{HashMap, HashSet};
use std::env;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::models::{NewsCategory, NewsItem, NewsTier};
use crate::service::news::NewsService;

pub const DEFAULT_POLL_SECS: u64 = 300;

/// Feeds refreshed on every tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerTargets {
    pub category: NewsCategory,
    pub symbols: Vec<String>,
}

impl Default for PollerTargets {
    fn default() -> Self {
        Self {
            category: NewsCategory::General,
            symbols: Vec::new(),
        }
    }
}

impl PollerTargets {
    /// `NEWS_POLL_CATEGORY` and comma-separated `NEWS_POLL_SYMBOLS`.
    pub fn from_env() -> Self {
        let category = match env::var("NEWS_POLL_CATEGORY") {
            Ok(raw) => raw.parse().unwrap_or_else(|err| {
                warn!("{err}; polling the general feed instead");
                NewsCategory::General
            }),
            Err(_) => NewsCategory::General,
        };
        let symbols = env::var("NEWS_POLL_SYMBOLS")
            .map(|raw| parse_symbols(&raw))
            .unwrap_or_default();
        Self { category, symbols }
    }
}

pub fn parse_symbols(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for symbol in raw.split(',').map(|s| s.trim().to_uppercase()) {
        if !symbol.is_empty() && !out.contains(&symbol) {
            out.push(symbol);
        }
    }
    out
}

/// `NEWS_POLL_SECS`, falling back to [`DEFAULT_POLL_SECS`].
pub fn poll_interval_from_env() -> Duration {
    match env::var("NEWS_POLL_SECS") {
        Ok(raw) => parse_poll_secs(&raw),
        Err(_) => Duration::from_secs(DEFAULT_POLL_SECS),
    }
}

fn parse_poll_secs(raw: &str) -> Duration {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            warn!("NEWS_POLL_SECS={raw:?} is not a positive number of seconds; using {DEFAULT_POLL_SECS}");
            Duration::from_secs(DEFAULT_POLL_SECS)
        }
    }
}

/// Result of refreshing one feed.
#[derive(Debug, Clone)]
pub struct FeedUpdate {
    pub feed: String,
    pub tier: NewsTier,
    pub total: usize,
    pub fresh: Vec<NewsItem>,
}

/// Ids served on the previous tick, per feed.
#[derive(Debug, Default)]
pub struct SeenHeadlines {
    by_feed: HashMap<String, HashSet<String>>,
}

impl SeenHeadlines {
    /// Items not present last time; replaces the remembered set with `items`.
    fn diff(&mut self, feed: &str, items: &[NewsItem]) -> Vec<NewsItem> {
        let previous = self.by_feed.get(feed);
        let fresh = items
            .iter()
            .filter(|item| previous.map_or(true, |seen| !seen.contains(&item.id)))
            .cloned()
            .collect();
        self.by_feed.insert(
            feed.to_string(),
            items.iter().map(|item| item.id.clone()).collect(),
        );
        fresh
    }
}

/// Run the full tier sequence once for every target feed.
pub async fn poll_once(
    service: &NewsService,
    targets: &PollerTargets,
    seen: &mut SeenHeadlines,
) -> Vec<FeedUpdate> {
    let mut updates = Vec::with_capacity(targets.symbols.len() + 1);

    let batch = service
        .fetch_market_news_with_tier(targets.category, None)
        .await;
    let feed = format!("market:{}", targets.category);
    updates.push(FeedUpdate {
        fresh: seen.diff(&feed, &batch.items),
        total: batch.items.len(),
        tier: batch.tier,
        feed,
    });

    for symbol in &targets.symbols {
        let batch = service.fetch_symbol_news_with_tier(symbol, None).await;
        updates.push(FeedUpdate {
            fresh: seen.diff(symbol, &batch.items),
            total: batch.items.len(),
            tier: batch.tier,
            feed: symbol.clone(),
        });
    }

    updates
}

/// Spawn the interval poller. Returns `None` for a zero interval.
pub fn spawn_news_poller(
    service: Arc<NewsService>,
    targets: PollerTargets,
    every: Duration,
) -> Option<JoinHandle<()>> {
    if every.is_zero() {
        warn!("news poll interval is zero; poller not started");
        return None;
    }

    info!(
        "Starting news poller every {:?} for {} + {} symbol(s)",
        every,
        targets.category,
        targets.symbols.len()
    );

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        let mut seen = SeenHeadlines::default();
        loop {
            interval.tick().await;
            for update in poll_once(&service, &targets, &mut seen).await {
                info!(
                    feed = %update.feed,
                    tier = %update.tier,
                    total = update.total,
                    fresh = update.fresh.len(),
                    "news poll"
                );
                for item in &update.fresh {
                    info!(feed = %update.feed, source = %item.source, "{}", item.title);
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(id: &str) -> NewsItem {
        NewsItem {
            id: id.into(),
            title: format!("headline {id}"),
            summary: String::new(),
            source: String::new(),
            url: String::new(),
            image: String::new(),
            published_at: Utc::now(),
            category: None,
            symbol: None,
            related: String::new(),
        }
    }

    #[test]
    fn diff_reports_only_new_ids() {
        let mut seen = SeenHeadlines::default();
        assert_eq!(seen.diff("AAPL", &[item("1"), item("2")]).len(), 2);

        let fresh = seen.diff("AAPL", &[item("2"), item("3")]);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].id, "3");

        // other feeds are tracked separately
        assert_eq!(seen.diff("MSFT", &[item("2")]).len(), 1);
    }

    #[test]
    fn symbols_are_trimmed_upper_cased_and_deduped() {
        assert_eq!(parse_symbols(" aapl, MSFT,,aapl ,tsla"), ["AAPL", "MSFT", "TSLA"]);
        assert!(parse_symbols("").is_empty());
    }

    #[test]
    fn new_headline_in_a_feed_without_ids_is_fresh() {
        use crate::models::ProviderNewsItem;
        use crate::service::news::normalize::{normalize, Feed};

        let story = |title: &str| ProviderNewsItem {
            headline: Some(title.to_string()),
            datetime: Some(1_700_000_000),
            ..Default::default()
        };
        let mut seen = SeenHeadlines::default();

        let first = normalize(vec![story("a"), story("b")], Feed::Symbol("AMD"), 15);
        assert_eq!(seen.diff("AMD", &first).len(), 2);

        let second = normalize(vec![story("c"), story("a")], Feed::Symbol("AMD"), 15);
        let fresh: Vec<_> = seen
            .diff("AMD", &second)
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(fresh, ["c"]);
    }

    #[test]
    fn poll_secs_falls_back_on_bad_values() {
        assert_eq!(parse_poll_secs("60"), Duration::from_secs(60));
        assert_eq!(parse_poll_secs(" 15 "), Duration::from_secs(15));
        assert_eq!(parse_poll_secs("0"), Duration::from_secs(DEFAULT_POLL_SECS));
        assert_eq!(parse_poll_secs("often"), Duration::from_secs(DEFAULT_POLL_SECS));
    }

    #[tokio::test]
    async fn zero_interval_does_not_spawn() {
        let service = Arc::new(NewsService::with_client(
            reqwest::Client::new(),
            Default::default(),
        ));
        assert!(spawn_news_poller(service, PollerTargets::default(), Duration::ZERO).is_none());
    }
}
