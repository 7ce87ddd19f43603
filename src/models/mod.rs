pub mod news;

pub use news::{
    NewsBatch, NewsCategory, NewsItem, NewsTier, ProviderId, ProviderNewsItem, UnknownCategory,
};
