use serde::{Deserialize, Serialize};

use crate::market::RawQuote;

/// One news item as it appears in the document's `articles` array.
///
/// Produced externally (by the digest exporter or an equivalent pipeline);
/// consumed read-only, one render cycle at a time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    #[serde(default)]
    pub category: String,
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// The market snapshot embedded in the document: one raw quote per
/// commodity, each independently optional (the exporter tolerates either
/// side failing).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MarketData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arabica: Option<RawQuote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub robusta: Option<RawQuote>,
}

/// The complete `news.json` document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewsDocument {
    /// ISO-8601 timestamp of the export that produced this document.
    pub updated_at: String,
    #[serde(default)]
    pub is_weekly: bool,
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_data: Option<MarketData>,
}
