use std::env;

use mockito::{Matcher, Server};

use market_news::models::NewsCategory;
use market_news::{fetch_market_news, fetch_symbol_news};

/// The module-level functions build their service from the environment on
/// first use, so this file holds a single test that owns the process env.
#[tokio::test]
async fn module_functions_keep_valid_env_when_a_timeout_is_bad() {
    let mut proxy = Server::new_async().await;
    let mut api = Server::new_async().await;

    env::set_var("NEWS_PROXY_BASE", proxy.url());
    env::set_var("NEWS_API_BASE", api.url());
    env::set_var("NEWS_API_KEY", "env-key");
    env::set_var("NEWS_PROXY_TIMEOUT_MS", "soon");
    env::set_var("NEWS_DIRECT_TIMEOUT_MS", "2000");

    let market = proxy
        .mock("GET", "/api/stocks/news/market")
        .with_status(200)
        .with_body(r#"[{"id":1,"headline":"from env proxy","datetime":1700000000}]"#)
        .expect(1)
        .create_async()
        .await;
    let symbol_proxy = proxy
        .mock("GET", "/api/stocks/news/AMD")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;
    let symbol_direct = api
        .mock("GET", "/company-news")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "AMD".into()),
            Matcher::UrlEncoded("token".into(), "env-key".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"id":9,"headline":"from env provider","datetime":1700000000}]"#)
        .expect(1)
        .create_async()
        .await;

    let items = fetch_market_news(NewsCategory::General, None).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "from env proxy");

    let items = fetch_symbol_news("amd", None).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "from env provider");
    assert_eq!(items[0].symbol.as_deref(), Some("AMD"));

    market.assert_async().await;
    symbol_proxy.assert_async().await;
    symbol_direct.assert_async().await;
}
