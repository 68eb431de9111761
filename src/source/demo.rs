use super::document::{Article, NewsDocument};

/// The fixed demo set shown when every candidate source fails.
///
/// Three items, stable content — tests assert on this exact shape, and the
/// status bar flags the session as demo mode so stale-looking data is never
/// mistaken for a live feed.
pub fn demo_document() -> NewsDocument {
    NewsDocument {
        updated_at: String::new(),
        is_weekly: false,
        articles: vec![
            Article {
                category: "1. Top News".to_string(),
                title: "Welcome to drip — live data unavailable".to_string(),
                link: "https://perfectdailygrind.com/".to_string(),
                summary: "None of the configured news sources could be reached. \
                          Showing built-in demo content until the next refresh succeeds."
                    .to_string(),
                source: Some("drip".to_string()),
            },
            Article {
                category: "2. Market & Origin".to_string(),
                title: "Arabica and Robusta quotes appear here".to_string(),
                link: "https://dailycoffeenews.com/".to_string(),
                summary: "The market panel tracks KC=F and RC=F futures once a \
                          document or the quote API is reachable."
                    .to_string(),
                source: Some("drip".to_string()),
            },
            Article {
                category: "5. Tech & Gear".to_string(),
                title: "Configure sources in ~/.config/drip/config.toml".to_string(),
                link: "https://sprudge.com/".to_string(),
                summary: "Candidate document locations are tried in order; the \
                          first one that parses wins."
                    .to_string(),
                source: Some("drip".to_string()),
            },
        ],
        market_data: None,
    }
}
