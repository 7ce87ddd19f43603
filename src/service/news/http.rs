use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::models::ProviderNewsItem;

/// Everything that can make a single tier attempt come back empty-handed.
#[derive(Debug, Error)]
pub enum NewsFetchError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("malformed json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("expected a json array, got {0}")]
    NotAnArray(&'static str),
    #[error("no usable items")]
    Empty,
    #[error("invalid url {0}")]
    InvalidUrl(String),
}

/// GET `url` and decode a JSON array of provider items.
///
/// The whole exchange (connect, headers, body) races `budget`; if the timer
/// fires first the request future is dropped, which aborts the call.
pub async fn get_news_array(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
    budget: Duration,
) -> Result<Vec<ProviderNewsItem>, NewsFetchError> {
    match tokio::time::timeout(budget, exchange(client, url, query)).await {
        Ok(result) => result,
        Err(_) => Err(NewsFetchError::Timeout(budget)),
    }
}

async fn exchange(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<Vec<ProviderNewsItem>, NewsFetchError> {
    let mut req = client.get(url);
    if !query.is_empty() {
        req = req.query(query);
    }
    let resp = req.send().await?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "unable to read body".to_string());
        return Err(NewsFetchError::Status {
            status,
            body: preview(&body),
        });
    }

    let bytes = resp.bytes().await?;
    parse_news_array(&bytes)
}

/// Decode a body that should be a JSON array of provider items.
///
/// Elements that are not objects of the expected shape are skipped rather
/// than failing the whole payload.
pub fn parse_news_array(bytes: &[u8]) -> Result<Vec<ProviderNewsItem>, NewsFetchError> {
    let value: Value = serde_json::from_slice(bytes)?;
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(_) => return Err(NewsFetchError::NotAnArray("object")),
        Value::Null => return Err(NewsFetchError::NotAnArray("null")),
        Value::String(_) => return Err(NewsFetchError::NotAnArray("string")),
        Value::Number(_) => return Err(NewsFetchError::NotAnArray("number")),
        Value::Bool(_) => return Err(NewsFetchError::NotAnArray("bool")),
    };

    let items: Vec<ProviderNewsItem> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();

    if items.is_empty() {
        return Err(NewsFetchError::Empty);
    }
    Ok(items)
}

fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
