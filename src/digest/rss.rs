use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use thiserror::Error;

use crate::source::Article;

use super::classify::classify_article;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
const MAX_CONCURRENT_FEEDS: usize = 4;

/// Summaries are capped for the document; the reader fetches full content.
const SUMMARY_MAX_CHARS: usize = 400;

#[derive(Debug, Error)]
enum FeedError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Request timed out")]
    Timeout,
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large")]
    TooLarge,
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Fetch every configured feed and collect window-fresh articles.
///
/// Feeds are fetched with bounded concurrency; a failing feed is logged
/// and skipped, never fatal. Entries published before `now − hours_ago`
/// are dropped; entries without a parseable timestamp are treated as just
/// published so they are still carried (feeds that omit dates should not
/// vanish from the digest). Duplicate links across feeds keep their first
/// occurrence.
pub async fn collect_articles(
    client: &reqwest::Client,
    feeds: &[String],
    hours_ago: i64,
) -> Vec<Article> {
    let cutoff = Utc::now() - chrono::Duration::hours(hours_ago);

    let results: Vec<(String, Result<Vec<Article>, FeedError>)> =
        stream::iter(feeds.iter().cloned())
            .map(|url| {
                let client = client.clone();
                async move {
                    let result = fetch_feed(&client, &url, cutoff).await;
                    (url, result)
                }
            })
            .buffer_unordered(MAX_CONCURRENT_FEEDS)
            .collect()
            .await;

    // Re-impose config order: buffer_unordered yields in completion order
    let mut by_url: std::collections::HashMap<String, Vec<Article>> = results
        .into_iter()
        .filter_map(|(url, result)| match result {
            Ok(articles) => Some((url, articles)),
            Err(e) => {
                tracing::warn!(feed = %url, error = %e, "Feed fetch failed, skipping");
                None
            }
        })
        .collect();

    let mut seen = std::collections::HashSet::new();
    let mut articles = Vec::new();
    for url in feeds {
        for article in by_url.remove(url).unwrap_or_default() {
            if seen.insert(article.link.clone()) {
                articles.push(article);
            }
        }
    }

    tracing::info!(
        feeds = feeds.len(),
        articles = articles.len(),
        hours_ago = hours_ago,
        "Collected feed articles"
    );
    articles
}

async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    cutoff: DateTime<Utc>,
) -> Result<Vec<Article>, FeedError> {
    let response = tokio::time::timeout(FETCH_TIMEOUT, client.get(url).send())
        .await
        .map_err(|_| FeedError::Timeout)?
        .map_err(FeedError::Network)?;

    if !response.status().is_success() {
        return Err(FeedError::HttpStatus(response.status().as_u16()));
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_FEED_SIZE {
            return Err(FeedError::TooLarge);
        }
    }
    let bytes = response.bytes().await.map_err(FeedError::Network)?;
    if bytes.len() > MAX_FEED_SIZE {
        return Err(FeedError::TooLarge);
    }

    let feed = feed_rs::parser::parse(bytes.as_ref()).map_err(|e| FeedError::Parse(e.to_string()))?;
    Ok(entries_to_articles(feed, cutoff))
}

/// Convert parsed feed entries into document articles, applying the
/// recency window.
pub(crate) fn entries_to_articles(feed: feed_rs::model::Feed, cutoff: DateTime<Utc>) -> Vec<Article> {
    let source = feed.title.map(|t| t.content);

    feed.entries
        .into_iter()
        .filter_map(|entry| {
            // No link, no article — the dashboard cannot do anything with it
            let link = entry.links.first().map(|l| l.href.clone())?;

            let published = entry.published.or(entry.updated);
            if let Some(ts) = published {
                if ts < cutoff {
                    return None;
                }
            }
            // Missing timestamp: treated as just published, kept

            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());
            let raw_summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .unwrap_or_default();
            let summary = summarize(&raw_summary);
            let category = classify_article(&title, &summary).to_string();

            Some(Article {
                category,
                title,
                link,
                summary,
                source: source.clone(),
            })
        })
        .collect()
}

/// Flatten feed-provided HTML into a plain-text summary.
fn summarize(html: &str) -> String {
    let text = strip_html(html);
    if text.chars().count() <= SUMMARY_MAX_CHARS {
        return text;
    }
    let truncated: String = text.chars().take(SUMMARY_MAX_CHARS).collect();
    format!("{}…", truncated.trim_end())
}

/// Remove tags and decode the handful of entities feeds actually use,
/// collapsing whitespace runs.
fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    let decoded = out
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
