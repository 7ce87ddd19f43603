pub mod models;
pub mod service;

pub use service::news::{fetch_market_news, fetch_symbol_news, NewsConfig, NewsService};
