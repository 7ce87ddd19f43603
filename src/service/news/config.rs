use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_PROXY_BASE: &str = "http://localhost:3001";
pub const DEFAULT_API_BASE: &str = "https://finnhub.io/api/v1";
pub const DEFAULT_API_KEY: &str = "demo";
pub const DEFAULT_PROXY_TIMEOUT: Duration = Duration::from_millis(6_000);
pub const DEFAULT_DIRECT_TIMEOUT: Duration = Duration::from_millis(5_000);

#[derive(Debug, Error)]
pub enum NewsConfigError {
    #[error("{key} must be a positive integer number of milliseconds, got {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Endpoints, credential and per-tier timeouts for the news client.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    pub proxy_base: String,
    pub api_base: String,
    pub api_key: String,
    pub proxy_timeout: Duration,
    pub direct_timeout: Duration,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            proxy_base: DEFAULT_PROXY_BASE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            proxy_timeout: DEFAULT_PROXY_TIMEOUT,
            direct_timeout: DEFAULT_DIRECT_TIMEOUT,
        }
    }
}

impl NewsConfig {
    /// Build a config pointing at explicit proxy and provider base URLs.
    pub fn new(proxy_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            proxy_base: trim_base(proxy_base.into()),
            api_base: trim_base(api_base.into()),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    pub fn with_timeouts(mut self, proxy: Duration, direct: Duration) -> Self {
        self.proxy_timeout = proxy;
        self.direct_timeout = direct;
        self
    }

    /// Read the config from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, NewsConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`NewsConfig::from_env`], but an invalid value only resets its
    /// own key to the default; every other setting is kept.
    pub fn from_env_lenient() -> Self {
        Self::from_lookup_lenient(|key| env::var(key).ok())
    }

    fn from_lookup_lenient<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ["NEWS_PROXY_TIMEOUT_MS", "NEWS_DIRECT_TIMEOUT_MS"] {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                if !valid_millis(&value) {
                    warn!("{key}={value:?} is not a positive number of milliseconds; using its default");
                }
            }
        }

        // invalid timeouts are hidden so they resolve to their defaults
        Self::from_lookup(|key: &str| {
            lookup(key).filter(|v| !key.ends_with("_TIMEOUT_MS") || valid_millis(v))
        })
        .unwrap_or_default()
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, NewsConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        Ok(Self {
            proxy_base: trim_base(read("NEWS_PROXY_BASE").unwrap_or(defaults.proxy_base)),
            api_base: trim_base(read("NEWS_API_BASE").unwrap_or(defaults.api_base)),
            api_key: read("NEWS_API_KEY").unwrap_or(defaults.api_key),
            proxy_timeout: parse_millis(
                "NEWS_PROXY_TIMEOUT_MS",
                read("NEWS_PROXY_TIMEOUT_MS"),
                defaults.proxy_timeout,
            )?,
            direct_timeout: parse_millis(
                "NEWS_DIRECT_TIMEOUT_MS",
                read("NEWS_DIRECT_TIMEOUT_MS"),
                defaults.direct_timeout,
            )?,
        })
    }
}

fn parse_millis(
    key: &'static str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration, NewsConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.parse::<u64>() {
            Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
            _ => Err(NewsConfigError::Invalid { key, value }),
        },
    }
}

fn valid_millis(raw: &str) -> bool {
    matches!(raw.trim().parse::<u64>(), Ok(ms) if ms > 0)
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}
