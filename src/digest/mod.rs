//! The digest exporter: produces the `news.json` document the dashboard
//! consumes.
//!
//! Mirrors the upstream aggregation pipeline: fetch each configured RSS
//! feed, keep entries inside the recency window, classify them into the
//! seven fixed categories, snapshot the Arabica/Robusta quotes, and write
//! the document atomically. Per-feed and per-quote failures are tolerated —
//! a digest with one dead feed or a missing market side still ships.

mod classify;
mod export;
mod rss;

pub use classify::{classify_article, CATEGORIES};
pub use export::{export, ExportOptions, ExportOutcome};
pub use rss::collect_articles;

use thiserror::Error;

/// Errors that abort an export entirely (per-feed fetch problems do not —
/// they are logged and skipped).
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Failed to write document: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}
