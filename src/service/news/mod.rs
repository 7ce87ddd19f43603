use chrono::{Duration as ChronoDuration, Utc};
use once_cell::sync::Lazy;
use reqwest::{Client, Url};
use tracing::{debug, info, warn};

use crate::models::{NewsBatch, NewsCategory, NewsItem, NewsTier};

pub mod config;
pub mod fallback;
pub mod http;
pub mod normalize;

pub use config::{NewsConfig, NewsConfigError};
pub use http::NewsFetchError;
pub use normalize::{MAX_MARKET_ITEMS, MAX_SYMBOL_ITEMS};

use normalize::{effective_limit, normalize, Feed};

/// Days of history requested from the provider's company-news endpoint.
const SYMBOL_WINDOW_DAYS: i64 = 7;

#[derive(Debug, thiserror::Error)]
pub enum NewsServiceError {
    #[error(transparent)]
    Config(#[from] NewsConfigError),
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Market-news client that walks proxy → provider → fallback.
///
/// None of the fetch operations return an error: every tier failure is
/// logged and treated as "nothing from this tier".
#[derive(Debug, Clone)]
pub struct NewsService {
    client: Client,
    config: NewsConfig,
}

impl NewsService {
    pub fn new(config: NewsConfig) -> Result<Self, NewsServiceError> {
        let client = Client::builder()
            .user_agent(concat!("market-news/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Build a service around an existing client, e.g. to share a pool.
    pub fn with_client(client: Client, config: NewsConfig) -> Self {
        Self { client, config }
    }

    pub fn from_env() -> Result<Self, NewsServiceError> {
        Self::new(NewsConfig::from_env()?)
    }

    pub fn config(&self) -> &NewsConfig {
        &self.config
    }

    /// General market headlines, at most [`MAX_MARKET_ITEMS`].
    pub async fn fetch_market_news(
        &self,
        category: NewsCategory,
        limit: Option<usize>,
    ) -> Vec<NewsItem> {
        self.fetch_market_news_with_tier(category, limit).await.items
    }

    pub async fn fetch_market_news_with_tier(
        &self,
        category: NewsCategory,
        limit: Option<usize>,
    ) -> NewsBatch {
        let cap = effective_limit(limit, MAX_MARKET_ITEMS);
        let feed = Feed::Market(category.as_str());

        let proxy_path = ["api", "stocks", "news", "market"];
        if let Some(items) = self
            .attempt(NewsTier::Proxy, &self.config.proxy_base, &proxy_path, &[], feed, cap)
            .await
        {
            return served(NewsTier::Proxy, "market", items);
        }

        let query = [
            ("category", category.as_str()),
            ("token", self.config.api_key.as_str()),
        ];
        if let Some(items) = self
            .attempt(NewsTier::Direct, &self.config.api_base, &["news"], &query, feed, cap)
            .await
        {
            return served(NewsTier::Direct, "market", items);
        }

        let mut items = fallback::fallback_market_news(category.as_str());
        items.truncate(cap);
        served(NewsTier::Fallback, "market", items)
    }

    /// Company headlines for `symbol`, at most [`MAX_SYMBOL_ITEMS`].
    ///
    /// A blank symbol returns an empty list without touching the network.
    pub async fn fetch_symbol_news(&self, symbol: &str, limit: Option<usize>) -> Vec<NewsItem> {
        self.fetch_symbol_news_with_tier(symbol, limit).await.items
    }

    pub async fn fetch_symbol_news_with_tier(
        &self,
        symbol: &str,
        limit: Option<usize>,
    ) -> NewsBatch {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            debug!("symbol news requested without a symbol");
            return NewsBatch {
                tier: NewsTier::Empty,
                items: Vec::new(),
            };
        }

        let cap = effective_limit(limit, MAX_SYMBOL_ITEMS);
        let feed = Feed::Symbol(&symbol);

        let proxy_path = ["api", "stocks", "news", symbol.as_str()];
        if let Some(items) = self
            .attempt(NewsTier::Proxy, &self.config.proxy_base, &proxy_path, &[], feed, cap)
            .await
        {
            return served(NewsTier::Proxy, &symbol, items);
        }

        let to = Utc::now().date_naive();
        let from = to - ChronoDuration::days(SYMBOL_WINDOW_DAYS);
        let from_str = from.format("%Y-%m-%d").to_string();
        let to_str = to.format("%Y-%m-%d").to_string();

        let query = [
            ("symbol", symbol.as_str()),
            ("from", from_str.as_str()),
            ("to", to_str.as_str()),
            ("token", self.config.api_key.as_str()),
        ];
        if let Some(items) = self
            .attempt(NewsTier::Direct, &self.config.api_base, &["company-news"], &query, feed, cap)
            .await
        {
            return served(NewsTier::Direct, &symbol, items);
        }

        served(NewsTier::Empty, &symbol, Vec::new())
    }

    /// One tier, one request. `None` means move on to the next tier.
    async fn attempt(
        &self,
        tier: NewsTier,
        base: &str,
        path: &[&str],
        query: &[(&str, &str)],
        feed: Feed<'_>,
        cap: usize,
    ) -> Option<Vec<NewsItem>> {
        let url = match endpoint(base, path) {
            Ok(url) => url,
            Err(error) => {
                warn!(tier = %tier, %error, "news tier produced nothing");
                return None;
            }
        };
        let budget = match tier {
            NewsTier::Proxy => self.config.proxy_timeout,
            _ => self.config.direct_timeout,
        };

        let raw = match http::get_news_array(&self.client, url.as_str(), query, budget).await {
            Ok(raw) => raw,
            Err(error) => {
                warn!(tier = %tier, %url, %error, "news tier produced nothing");
                return None;
            }
        };

        let items = normalize(raw, feed, cap);
        if items.is_empty() {
            warn!(tier = %tier, %url, error = %NewsFetchError::Empty, "news tier produced nothing");
            return None;
        }
        Some(items)
    }
}

/// Append `path` to `base` as individually percent-encoded segments, so a
/// symbol containing `/`, `?` or `#` stays a single path segment.
pub fn endpoint(base: &str, path: &[&str]) -> Result<Url, NewsFetchError> {
    let mut url = Url::parse(base).map_err(|e| NewsFetchError::InvalidUrl(format!("{base}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| NewsFetchError::InvalidUrl(format!("{base}: cannot carry a path")))?
        .pop_if_empty()
        .extend(path);
    Ok(url)
}

fn served(tier: NewsTier, feed: &str, items: Vec<NewsItem>) -> NewsBatch {
    info!(tier = %tier, feed, count = items.len(), "news served");
    NewsBatch { tier, items }
}

static DEFAULT_SERVICE: Lazy<NewsService> = Lazy::new(|| {
    let config = NewsConfig::from_env_lenient();
    NewsService::new(config.clone()).unwrap_or_else(|err| {
        warn!("{err}; using a default http client");
        NewsService::with_client(Client::new(), config)
    })
});

/// General market headlines using the environment-configured service.
pub async fn fetch_market_news(category: NewsCategory, limit: Option<usize>) -> Vec<NewsItem> {
    DEFAULT_SERVICE.fetch_market_news(category, limit).await
}

/// Company headlines using the environment-configured service.
pub async fn fetch_symbol_news(symbol: &str, limit: Option<usize>) -> Vec<NewsItem> {
    DEFAULT_SERVICE.fetch_symbol_news(symbol, limit).await
}
