use serde::{Deserialize, Serialize};

/// The `meta` node of a v8 chart result — the raw quote as the API (and the
/// exported document's `market_data`) carries it.
///
/// Both previous-close variants exist in the wild; `previousClose` is
/// preferred and `chartPreviousClose` is the fallback. All fields are
/// optional: the normalizer decides what is renderable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawQuote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(
        default,
        rename = "regularMarketPrice",
        skip_serializing_if = "Option::is_none"
    )]
    pub regular_market_price: Option<f64>,
    #[serde(
        default,
        rename = "previousClose",
        skip_serializing_if = "Option::is_none"
    )]
    pub previous_close: Option<f64>,
    #[serde(
        default,
        rename = "chartPreviousClose",
        skip_serializing_if = "Option::is_none"
    )]
    pub chart_previous_close: Option<f64>,
    #[serde(
        default,
        rename = "regularMarketTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub regular_market_time: Option<i64>,
}

#[derive(Deserialize)]
pub(crate) struct ChartEnvelope {
    pub(crate) chart: Option<ChartNode>,
}

#[derive(Deserialize)]
pub(crate) struct ChartNode {
    pub(crate) result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub(crate) error: Option<ChartError>,
}

#[derive(Deserialize)]
pub(crate) struct ChartError {
    pub(crate) code: String,
    pub(crate) description: String,
}

#[derive(Deserialize)]
pub(crate) struct ChartResult {
    #[serde(default)]
    pub(crate) meta: Option<RawQuote>,
}
