pub mod news_poller;

pub use news_poller::{poll_once, spawn_news_poller, FeedUpdate, PollerTargets, SeenHeadlines};
