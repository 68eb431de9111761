use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::cache::OfflineCache;
use crate::config::Config;
use crate::market::fetch_quote;
use crate::source::{MarketData, NewsDocument};

use super::rss::collect_articles;
use super::DigestError;

/// What an export run should do.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Weekly mode widens the recency window from 24 hours to 7 days.
    pub weekly: bool,
    /// Dry-run assembles the document but writes nothing.
    pub dry_run: bool,
    /// Destination path for the document.
    pub output: PathBuf,
}

/// Result of an export run.
#[derive(Debug)]
pub struct ExportOutcome {
    pub document: NewsDocument,
    /// Where the document landed; `None` on dry-run.
    pub written: Option<PathBuf>,
}

/// Run the digest pipeline and export the news document.
///
/// RSS aggregation and the market snapshot are both best-effort: an export
/// with zero articles or a missing market side is still a valid document.
pub async fn export(
    client: &reqwest::Client,
    cache: &OfflineCache,
    config: &Config,
    options: &ExportOptions,
) -> Result<ExportOutcome, DigestError> {
    let hours_ago = if options.weekly { 24 * 7 } else { 24 };
    let articles = collect_articles(client, &config.feeds, hours_ago).await;

    let mut market = MarketData::default();
    for ticker in &config.tickers {
        let slot = match ticker.label.to_ascii_lowercase().as_str() {
            "arabica" => &mut market.arabica,
            "robusta" => &mut market.robusta,
            other => {
                tracing::debug!(label = %other, "Ticker has no document slot, skipping in export");
                continue;
            }
        };

        match fetch_quote(cache, &ticker.symbol, config.quote_relay.as_deref()).await {
            Ok(raw) => *slot = Some(raw),
            Err(e) => {
                tracing::warn!(symbol = %ticker.symbol, error = %e, "Market snapshot failed");
            }
        }
    }

    let document = NewsDocument {
        updated_at: Utc::now().to_rfc3339(),
        is_weekly: options.weekly,
        articles,
        market_data: Some(market),
    };

    let written = if options.dry_run {
        tracing::info!(articles = document.articles.len(), "Dry run, skipping write");
        None
    } else {
        write_document_atomically(&options.output, &document)?;
        tracing::info!(
            path = %options.output.display(),
            articles = document.articles.len(),
            "Exported news document"
        );
        Some(options.output.clone())
    };

    Ok(ExportOutcome { document, written })
}

/// Write the document with the write-to-temp-then-rename pattern so the
/// destination is never left in a partial state — the dashboard may be
/// reading it concurrently.
fn write_document_atomically(path: &Path, document: &NewsDocument) -> Result<(), DigestError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Randomized temp filename so a concurrent export cannot collide
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = path.with_extension(format!("tmp.{:016x}", nanos));

    let json = serde_json::to_vec_pretty(document)?;

    let mut temp_file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)?;

    if let Err(e) = temp_file
        .write_all(&json)
        .and_then(|()| temp_file.sync_all())
    {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }
    drop(temp_file);

    // Atomic on POSIX; Windows requires removing the destination first
    #[cfg(windows)]
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            let _ = std::fs::remove_file(&temp_path);
            return Err(e.into());
        }
    }

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}
