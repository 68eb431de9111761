//! Integration tests for news document resolution: the ordered candidate
//! list, first-success semantics, and the demo fallback.

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use drip::source::{resolve, DocumentOrigin, SourceDescriptor};

fn document_json(n: usize) -> String {
    let articles: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#"{{"category":"1. Top News","title":"Article {i}","link":"https://example.com/{i}","summary":"Summary {i}"}}"#
            )
        })
        .collect();
    format!(
        r#"{{"updated_at":"2026-08-07T06:00:00+00:00","articles":[{}]}}"#,
        articles.join(",")
    )
}

fn descriptors(raw: &[String]) -> Vec<SourceDescriptor> {
    SourceDescriptor::parse_list(raw)
}

// ============================================================================
// First-success resolution
// ============================================================================

#[tokio::test]
async fn test_reachable_source_yields_all_articles_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(document_json(5)))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let sources = descriptors(&[format!("{}/news.json", server.uri())]);

    let resolved = resolve(&client, &sources).await;
    assert!(!resolved.is_demo());
    assert_eq!(resolved.document.articles.len(), 5);

    let titles: Vec<_> = resolved
        .document
        .articles
        .iter()
        .map(|a| a.title.as_str())
        .collect();
    assert_eq!(
        titles,
        ["Article 0", "Article 1", "Article 2", "Article 3", "Article 4"]
    );
}

#[tokio::test]
async fn test_later_candidate_wins_when_earlier_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/public/news.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(document_json(2)))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let first = format!("{}/news.json", server.uri());
    let second = format!("{}/public/news.json", server.uri());
    let sources = descriptors(&[first, second.clone()]);

    let resolved = resolve(&client, &sources).await;
    assert_eq!(resolved.origin, DocumentOrigin::Source(second));
    assert_eq!(resolved.document.articles.len(), 2);
}

#[tokio::test]
async fn test_malformed_candidate_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/public/news.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(document_json(1)))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let sources = descriptors(&[
        format!("{}/news.json", server.uri()),
        format!("{}/public/news.json", server.uri()),
    ]);

    let resolved = resolve(&client, &sources).await;
    assert!(!resolved.is_demo());
    assert_eq!(resolved.document.articles.len(), 1);
}

#[tokio::test]
async fn test_remote_fetch_carries_cache_buster() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(document_json(1)))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let sources = descriptors(&[format!("{}/news.json", server.uri())]);
    resolve(&client, &sources).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let query = requests[0].url.query().unwrap_or_default();
    assert!(
        query.contains("_="),
        "expected cache-buster in query, got: {query}"
    );
}

// ============================================================================
// Demo fallback
// ============================================================================

#[tokio::test]
async fn test_all_candidates_unreachable_yields_demo_set() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let sources = descriptors(&[
        format!("{}/news.json", server.uri()),
        format!("{}/public/news.json", server.uri()),
        "/nonexistent/drip/news.json".to_string(),
    ]);

    let resolved = resolve(&client, &sources).await;
    assert!(resolved.is_demo());
    assert_eq!(resolved.origin, DocumentOrigin::Demo);

    // The demo set is the fixed 3-item document
    assert_eq!(resolved.document, drip::source::demo_document());
}

#[tokio::test]
async fn test_empty_candidate_list_yields_demo_set() {
    let client = reqwest::Client::new();
    let resolved = resolve(&client, &[]).await;
    assert!(resolved.is_demo());
    assert_eq!(resolved.document.articles.len(), 3);
}

// ============================================================================
// Document-embedded market data
// ============================================================================

#[tokio::test]
async fn test_document_market_snapshot_parses() {
    let body = r#"{
        "updated_at": "2026-08-07T06:00:00+00:00",
        "articles": [],
        "market_data": {
            "arabica": {"symbol": "KC=F", "regularMarketPrice": 342.5, "previousClose": 339.0},
            "robusta": {"symbol": "RC=F", "regularMarketPrice": 4485.0, "chartPreviousClose": 4512.0}
        }
    }"#;

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let sources = descriptors(&[format!("{}/news.json", server.uri())]);

    let resolved = resolve(&client, &sources).await;
    let market = resolved.document.market_data.unwrap();
    assert_eq!(
        market.arabica.unwrap().regular_market_price,
        Some(342.5)
    );
    assert_eq!(
        market.robusta.unwrap().chart_previous_close,
        Some(4512.0)
    );
}
