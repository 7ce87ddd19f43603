use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw news object as returned by the proxy and by the provider API.
///
/// Every field is optional; the provider omits fields freely and the proxy
/// passes its cache through untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderNewsItem {
    #[serde(default)]
    pub id: Option<ProviderId>,
    #[serde(default)]
    pub category: Option<String>,
    /// Epoch seconds.
    #[serde(default)]
    pub datetime: Option<i64>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub related: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Provider ids are numeric upstream but some caches stringify them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProviderId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderId::Number(n) => write!(f, "{n}"),
            ProviderId::Text(s) => f.write_str(s),
        }
    }
}

/// Normalized news item handed to terminal consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub source: String,
    pub url: String,
    pub image: String,
    #[serde(serialize_with = "iso_millis::serialize")]
    pub published_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub related: String,
}

/// Which tier ended up serving a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsTier {
    Proxy,
    Direct,
    Fallback,
    Empty,
}

impl NewsTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsTier::Proxy => "proxy",
            NewsTier::Direct => "direct",
            NewsTier::Fallback => "fallback",
            NewsTier::Empty => "empty",
        }
    }
}

impl fmt::Display for NewsTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Items together with the tier that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsBatch {
    pub tier: NewsTier,
    pub items: Vec<NewsItem>,
}

/// Provider news categories for the general feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewsCategory {
    #[default]
    General,
    Forex,
    Crypto,
    Merger,
}

impl NewsCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsCategory::General => "general",
            NewsCategory::Forex => "forex",
            NewsCategory::Crypto => "crypto",
            NewsCategory::Merger => "merger",
        }
    }
}

impl fmt::Display for NewsCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown news category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for NewsCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(NewsCategory::General),
            "forex" => Ok(NewsCategory::Forex),
            "crypto" => Ok(NewsCategory::Crypto),
            "merger" => Ok(NewsCategory::Merger),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// `2023-11-14T22:13:20.000Z` style timestamps.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}
