use chrono::Utc;
use reqwest::Method;
use thiserror::Error;
use url::Url;

use crate::cache::{CacheError, OfflineCache};

use super::wire::ChartEnvelope;
use super::RawQuote;

const CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Errors from a live quote fetch.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Network-level failure from the gateway (no fallback for quotes:
    /// finance requests are network-only by policy)
    #[error("Quote request failed: {0}")]
    Fetch(#[from] CacheError),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Body was not a valid chart response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The chart response carried no usable quote
    #[error("Quote data missing: {0}")]
    Data(String),
    /// The relay prefix produced an unparseable URL
    #[error("Invalid quote URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Build the chart request URL for one symbol.
///
/// Direct form: `{CHART_BASE}/{symbol}?interval=1d&_={now}` — the trailing
/// `_` parameter is a cache-buster. With a relay configured, the fully
/// encoded direct URL is appended to the relay prefix (CORS-relay pattern:
/// the relay re-issues the request server-side).
pub fn chart_url(symbol: &str, relay: Option<&str>) -> Result<Url, QuoteError> {
    let mut direct = Url::parse(&format!("{CHART_BASE}/{symbol}"))?;
    direct
        .query_pairs_mut()
        .append_pair("interval", "1d")
        .append_pair("_", &Utc::now().timestamp().to_string());

    match relay {
        None => Ok(direct),
        Some(prefix) => {
            let encoded: String =
                url::form_urlencoded::byte_serialize(direct.as_str().as_bytes()).collect();
            Ok(Url::parse(&format!("{prefix}{encoded}"))?)
        }
    }
}

/// Fetch the raw quote for one symbol through the offline gateway.
///
/// The gateway classifies the request as network-only, so this never
/// touches the cache: a quote is fresh or it is an error.
pub async fn fetch_quote(
    cache: &OfflineCache,
    symbol: &str,
    relay: Option<&str>,
) -> Result<RawQuote, QuoteError> {
    let url = chart_url(symbol, relay)?;

    let fetched = cache.fetch(Method::GET, &url).await?;
    if !fetched.is_success() {
        return Err(QuoteError::HttpStatus(fetched.status));
    }

    let envelope: ChartEnvelope = serde_json::from_slice(&fetched.body)?;
    let node = envelope
        .chart
        .ok_or_else(|| QuoteError::Data("missing chart node".to_string()))?;

    if let Some(err) = node.error {
        return Err(QuoteError::Data(format!("{}: {}", err.code, err.description)));
    }

    node.result
        .and_then(|mut results| {
            if results.is_empty() {
                None
            } else {
                results.remove(0).meta
            }
        })
        .ok_or_else(|| QuoteError::Data("empty chart result".to_string()))
}
