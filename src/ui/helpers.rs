//! Shared helpers for spawning background work and formatting timestamps.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::app::{App, AppEvent, ContentState, View};
use crate::content::{fetch_article, resolve_reader_key};
use crate::market::{fetch_quote, QuoteView};
use crate::source::resolve;

/// Kick off one fetch cycle: the document, then one task per ticker.
///
/// Cycles are not mutually excluded — a manual refresh may overlap the
/// periodic timer, and the last event applied to the view-model wins.
pub(super) fn spawn_refresh(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    app.refreshing = true;

    let client = app.client.clone();
    let sources = app.sources.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let resolved = resolve(&client, &sources).await;
        let _ = tx.send(AppEvent::DocumentResolved(resolved)).await;
    });

    let relay = app.config.quote_relay.clone();
    for (slot, (ticker, _)) in app.quotes.iter().enumerate() {
        let cache = app.cache.clone();
        let ticker = ticker.clone();
        let relay = relay.clone();
        let tx = event_tx.clone();
        tokio::spawn(async move {
            let result = fetch_quote(&cache, &ticker.symbol, relay.as_deref())
                .await
                .map(|raw| QuoteView::from_raw(&ticker.label, &ticker.symbol, &raw))
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::QuoteLoaded { slot, result }).await;
        });
    }
}

/// Open the reader on the selected headline and load its content through
/// the offline gateway.
pub(super) fn spawn_content_load(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(article) = app.selected_article().cloned() else {
        return;
    };

    app.view = View::Reader;
    app.reader_article = Some(article.clone());
    app.content_state = ContentState::Loading;
    app.scroll_offset = 0;

    let cache = app.cache.clone();
    let relay = app.config.reader_relay.clone();
    let config_key = app.config.reader_api_key.clone();
    let tx = event_tx.clone();
    tokio::spawn(async move {
        // Resolved per fetch: the env var wins over the config value
        let key = resolve_reader_key(config_key.as_deref());
        let result = fetch_article(&cache, &article.link, &relay, key.as_ref())
            .await
            .map_err(|e| e.to_string());
        let _ = tx
            .send(AppEvent::ContentLoaded {
                link: article.link,
                result,
            })
            .await;
    });
}

/// Parse the document's ISO-8601 `updated_at` into a unix timestamp.
pub(super) fn parse_updated_at(updated_at: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(updated_at)
        .ok()
        .map(|dt| dt.timestamp())
}

/// Compact relative time: "3m", "2h", "5d", then a date.
pub(super) fn format_relative_time(timestamp: Option<i64>) -> String {
    let Some(ts) = timestamp else {
        return String::new();
    };

    let now = Utc::now().timestamp();
    let diff = now - ts;

    // Future dates (clock skew between exporter and viewer)
    if diff < 0 {
        return "now".to_string();
    }

    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }

    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%b %d").to_string())
        .unwrap_or_default()
}
