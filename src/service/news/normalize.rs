use chrono::{DateTime, Utc};

use crate::models::{NewsItem, ProviderNewsItem};

pub const MAX_MARKET_ITEMS: usize = 20;
pub const MAX_SYMBOL_ITEMS: usize = 15;

/// What a normalized item is tagged with.
#[derive(Debug, Clone, Copy)]
pub enum Feed<'a> {
    Market(&'a str),
    Symbol(&'a str),
}

/// Resolve a caller-supplied limit against the feed's hard maximum.
pub fn effective_limit(limit: Option<usize>, max: usize) -> usize {
    limit.map(|l| l.clamp(1, max)).unwrap_or(max)
}

/// Map provider items onto [`NewsItem`], dropping items without a headline
/// and keeping at most `cap` entries in upstream order.
pub fn normalize(raw: Vec<ProviderNewsItem>, feed: Feed<'_>, cap: usize) -> Vec<NewsItem> {
    let now = Utc::now();
    let mut items = Vec::with_capacity(raw.len().min(cap));

    for item in raw {
        if items.len() >= cap {
            break;
        }

        let title = item.headline.as_deref().unwrap_or("").trim().to_string();
        if title.is_empty() {
            continue;
        }

        let published_at = item
            .datetime
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .unwrap_or(now);

        let (category, symbol) = match feed {
            Feed::Market(requested) => (
                Some(
                    item.category
                        .filter(|c| !c.trim().is_empty())
                        .unwrap_or_else(|| requested.to_string()),
                ),
                None,
            ),
            Feed::Symbol(symbol) => (None, Some(symbol.to_string())),
        };

        let url = text(item.url);
        // without a provider id the link (or headline) identifies the story
        let id = match item.id {
            Some(id) => id.to_string(),
            None if !url.is_empty() => url.clone(),
            None => title.clone(),
        };

        items.push(NewsItem {
            id,
            title,
            summary: text(item.summary),
            source: text(item.source),
            url,
            image: text(item.image),
            published_at,
            category,
            symbol,
            related: text(item.related),
        });
    }

    items
}

fn text(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProviderId;

    fn headline(h: &str) -> ProviderNewsItem {
        ProviderNewsItem {
            headline: Some(h.to_string()),
            datetime: Some(1_700_000_000),
            ..Default::default()
        }
    }

    #[test]
    fn maps_provider_fields() {
        let raw = vec![ProviderNewsItem {
            id: Some(ProviderId::Number(9001)),
            category: Some("crypto".into()),
            datetime: Some(1_700_000_000),
            headline: Some(" Bitcoin rallies ".into()),
            image: Some("https://img".into()),
            related: Some("BTC".into()),
            source: Some("Reuters".into()),
            summary: Some("sum".into()),
            url: Some("https://article".into()),
        }];

        let items = normalize(raw, Feed::Market("general"), MAX_MARKET_ITEMS);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.id, "9001");
        assert_eq!(item.title, "Bitcoin rallies");
        assert_eq!(item.category.as_deref(), Some("crypto"));
        assert_eq!(item.symbol, None);
        assert_eq!(item.related, "BTC");
        assert_eq!(item.published_at.timestamp(), 1_700_000_000);
    }

    #[test]
    fn tags_symbol_feed_and_defaults_missing_fields() {
        let items = normalize(vec![headline("Apple earnings")], Feed::Symbol("AAPL"), 15);
        assert_eq!(items[0].symbol.as_deref(), Some("AAPL"));
        assert_eq!(items[0].category, None);
        assert_eq!(items[0].id, "Apple earnings");
        assert_eq!(items[0].source, "");
    }

    #[test]
    fn drops_items_without_headline() {
        let raw = vec![
            ProviderNewsItem::default(),
            headline("   "),
            headline("kept"),
        ];
        let items = normalize(raw, Feed::Market("general"), 20);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "kept");
        assert_eq!(items[0].id, "kept");
    }

    #[test]
    fn missing_id_prefers_url() {
        let raw = vec![ProviderNewsItem {
            url: Some("https://news.example/a".into()),
            ..headline("linked")
        }];
        let items = normalize(raw, Feed::Market("general"), 20);
        assert_eq!(items[0].id, "https://news.example/a");
    }

    #[test]
    fn caps_output() {
        let raw: Vec<_> = (0..50).map(|i| headline(&format!("h{i}"))).collect();
        assert_eq!(normalize(raw.clone(), Feed::Market("general"), 20).len(), 20);
        let symbol = normalize(raw, Feed::Symbol("TSLA"), 15);
        assert_eq!(symbol.len(), 15);
        assert_eq!(symbol[14].title, "h14");
    }

    #[test]
    fn limit_never_exceeds_max() {
        assert_eq!(effective_limit(None, 20), 20);
        assert_eq!(effective_limit(Some(5), 20), 5);
        assert_eq!(effective_limit(Some(100), 15), 15);
        assert_eq!(effective_limit(Some(0), 15), 1);
    }
}
