//! Application state: the explicit view-model every render reads from.
//!
//! Render functions take `&App` and draw; background tasks send
//! [`AppEvent`]s that mutate it. Fetch cycles are independent and may
//! overlap (a manual refresh racing the timer); the last event applied
//! wins, which is acceptable because the consequences are purely cosmetic.

use ratatui::text::Line;
use reqwest::redirect::Policy;
use tokio::time::Instant;

use crate::cache::OfflineCache;
use crate::config::{Config, Ticker};
use crate::content::ArticleContent;
use crate::market::{QuoteView, RawQuote};
use crate::source::{demo_document, Article, DocumentOrigin, NewsDocument, Resolved, SourceDescriptor};
use crate::theme::{ColorPalette, ThemeVariant};

/// How long a transient status message stays on the bar.
const STATUS_TTL_SECS: u64 = 5;

/// Maximum scroll offset for the reader view (ratatui u16 limit).
pub const MAX_SCROLL: usize = u16::MAX as usize;

// ============================================================================
// View State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Reader,
}

/// One slot on the market panel.
#[derive(Debug, Clone)]
pub enum QuoteSlot {
    Loading,
    Loaded(QuoteView),
    /// Rendered as the inert "load failed" string; nothing propagates.
    Failed,
}

/// Reader content lifecycle.
pub enum ContentState {
    Idle,
    Loading,
    Loaded {
        rendered_lines: Vec<Line<'static>>,
        from_cache: bool,
    },
    Failed {
        error: String,
        /// The article summary, shown when full content is unavailable.
        fallback: Option<String>,
    },
}

// ============================================================================
// Events
// ============================================================================

/// Events sent from background tasks to the event loop.
pub enum AppEvent {
    /// A fetch cycle finished (successfully or by demo fallback).
    DocumentResolved(Resolved),
    /// A live quote fetch finished for the ticker at `slot`.
    QuoteLoaded {
        slot: usize,
        result: Result<QuoteView, String>,
    },
    /// Reader content finished loading for `link`.
    ContentLoaded {
        link: String,
        result: Result<ArticleContent, String>,
    },
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub config: Config,
    pub cache: OfflineCache,
    pub client: reqwest::Client,
    pub sources: Vec<SourceDescriptor>,

    pub theme: ThemeVariant,
    pub palette: ColorPalette,

    pub view: View,
    pub document: NewsDocument,
    pub origin: DocumentOrigin,
    pub quotes: Vec<(Ticker, QuoteSlot)>,

    pub selected: usize,
    pub reader_article: Option<Article>,
    pub content_state: ContentState,
    pub scroll_offset: usize,
    pub reader_visible_lines: usize,

    pub refreshing: bool,
    pub status_message: Option<(String, Instant)>,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(config: Config, cache: OfflineCache, client: reqwest::Client) -> Self {
        let sources = SourceDescriptor::parse_list(&config.sources);
        let theme = ThemeVariant::from_str_name(&config.theme).unwrap_or(ThemeVariant::Dark);
        let quotes = config
            .tickers
            .iter()
            .cloned()
            .map(|t| (t, QuoteSlot::Loading))
            .collect();

        Self {
            config,
            cache,
            client,
            sources,
            theme,
            palette: theme.palette(),
            view: View::Dashboard,
            document: demo_document(),
            origin: DocumentOrigin::Demo,
            quotes,
            selected: 0,
            reader_article: None,
            content_state: ContentState::Idle,
            scroll_offset: 0,
            reader_visible_lines: 0,
            refreshing: false,
            status_message: None,
            needs_redraw: true,
        }
    }

    /// Whether the dashboard is showing the built-in demo set.
    pub fn is_demo(&self) -> bool {
        self.origin == DocumentOrigin::Demo
    }

    /// Apply a resolved document from a finished fetch cycle.
    ///
    /// Quote slots are seeded from the document's embedded market snapshot;
    /// live quote fetches land afterwards and overwrite them.
    pub fn apply_document(&mut self, resolved: Resolved) {
        self.document = resolved.document;
        self.origin = resolved.origin;

        if self.selected >= self.document.articles.len() {
            self.selected = self.document.articles.len().saturating_sub(1);
        }

        if let Some(market) = self.document.market_data.clone() {
            self.seed_quote("arabica", market.arabica.as_ref());
            self.seed_quote("robusta", market.robusta.as_ref());
        }
    }

    fn seed_quote(&mut self, label: &str, raw: Option<&RawQuote>) {
        let Some(raw) = raw else { return };
        for (ticker, slot) in &mut self.quotes {
            if ticker.label.eq_ignore_ascii_case(label) {
                *slot = QuoteSlot::Loaded(QuoteView::from_raw(&ticker.label, &ticker.symbol, raw));
            }
        }
    }

    /// The currently selected headline, if any.
    pub fn selected_article(&self) -> Option<&Article> {
        self.document.articles.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.document.articles.is_empty() {
            self.selected = (self.selected + 1).min(self.document.articles.len() - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.palette = self.theme.palette();
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Drop an expired status message. Returns true when one was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, since)) = &self.status_message {
            if since.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Clamp the reader scroll to the rendered content length.
    pub fn clamp_reader_scroll(&mut self, content_lines: usize) {
        let max = content_lines
            .saturating_sub(self.reader_visible_lines)
            .min(MAX_SCROLL);
        if self.scroll_offset > max {
            self.scroll_offset = max;
        }
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// Redirect policy with loop detection and limited hops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );
        attempt.follow()
    })
}

/// Build the HTTP client shared by every fetch path.
///
/// The finance API refuses requests without a browser-ish user agent, so
/// the exporter's UA is sent everywhere.
pub fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (compatible; drip/0.1)")
        .redirect(create_redirect_policy())
        .build()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MarketData;
    use crate::storage::Database;

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let client = build_http_client();
        let cache = OfflineCache::new(db, client.clone());
        App::new(Config::default(), cache, client)
    }

    fn resolved(articles: usize) -> Resolved {
        Resolved {
            document: NewsDocument {
                updated_at: "2026-08-07T06:00:00+00:00".to_string(),
                is_weekly: false,
                articles: (0..articles)
                    .map(|i| Article {
                        category: String::new(),
                        title: format!("Article {i}"),
                        link: format!("https://example.com/{i}"),
                        summary: String::new(),
                        source: None,
                    })
                    .collect(),
                market_data: None,
            },
            origin: DocumentOrigin::Source("./news.json".to_string()),
        }
    }

    #[tokio::test]
    async fn test_starts_in_demo_mode() {
        let app = test_app().await;
        assert!(app.is_demo());
        assert_eq!(app.document.articles.len(), 3);
        assert_eq!(app.quotes.len(), 2);
        assert!(matches!(app.quotes[0].1, QuoteSlot::Loading));
    }

    #[tokio::test]
    async fn test_apply_document_replaces_demo() {
        let mut app = test_app().await;
        app.apply_document(resolved(5));
        assert!(!app.is_demo());
        assert_eq!(app.document.articles.len(), 5);
    }

    #[tokio::test]
    async fn test_apply_document_clamps_selection() {
        let mut app = test_app().await;
        app.apply_document(resolved(5));
        app.selected = 4;
        app.apply_document(resolved(2));
        assert_eq!(app.selected, 1);
    }

    #[tokio::test]
    async fn test_selection_bounds() {
        let mut app = test_app().await;
        app.apply_document(resolved(2));
        app.select_previous();
        assert_eq!(app.selected, 0);
        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected, 1);
    }

    #[tokio::test]
    async fn test_document_market_data_seeds_quote_slots() {
        let mut app = test_app().await;
        let mut r = resolved(1);
        r.document.market_data = Some(MarketData {
            arabica: Some(RawQuote {
                regular_market_price: Some(342.5),
                previous_close: Some(339.0),
                ..RawQuote::default()
            }),
            robusta: None,
        });
        app.apply_document(r);

        match &app.quotes[0].1 {
            QuoteSlot::Loaded(view) => assert_eq!(view.price, Some(342.5)),
            other => panic!("expected seeded quote, got {:?}", other),
        }
        assert!(matches!(app.quotes[1].1, QuoteSlot::Loading));
    }

    #[tokio::test]
    async fn test_theme_cycle() {
        let mut app = test_app().await;
        let before = app.theme;
        app.cycle_theme();
        assert_ne!(app.theme, before);
    }
}
