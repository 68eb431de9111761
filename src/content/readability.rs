use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use crate::cache::{CacheError, OfflineCache};
use crate::util::validate_url;

/// Official relay domain; the bearer key is only ever sent here.
const OFFICIAL_RELAY: &str = "https://r.jina.ai";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Invalid article URL")]
    InvalidUrl,
    #[error("Insecure relay URL: HTTPS required (except localhost for testing)")]
    InsecureRelay,
    #[error(transparent)]
    Gateway(#[from] CacheError),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
}

/// Markdown content for one article, with provenance.
#[derive(Debug, Clone)]
pub struct ArticleContent {
    pub markdown: String,
    /// True when the network was unreachable and this is the cached copy.
    pub from_cache: bool,
}

/// Resolve the relay bearer key: the DRIP_READER_KEY environment variable
/// takes precedence over the config file value.
pub fn resolve_reader_key(config_key: Option<&str>) -> Option<SecretString> {
    std::env::var("DRIP_READER_KEY")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| config_key.map(str::to_owned))
        .map(SecretString::from)
}

/// Fetch an article's markdown through the readability relay.
///
/// The relay URL is `{relay}/{article_url}`. The request goes through the
/// offline gateway: network-first, so a 200 response is cached under the
/// relay URL and served again when the network drops.
///
/// The bearer key is only attached when the relay is the official domain —
/// a custom relay (or a test server) never sees the credential.
pub async fn fetch_article(
    cache: &OfflineCache,
    article_url: &str,
    relay: &str,
    api_key: Option<&SecretString>,
) -> Result<ArticleContent, ContentError> {
    let article = validate_url(article_url).map_err(|_| ContentError::InvalidUrl)?;

    // HTTPS required for the relay so the key and the reading habit stay
    // off the wire; localhost is allowed for testing.
    if !relay.starts_with("https://") {
        let is_localhost =
            relay.starts_with("http://127.0.0.1") || relay.starts_with("http://localhost");
        if !is_localhost {
            tracing::error!(relay = %relay, "Rejecting non-HTTPS relay URL");
            return Err(ContentError::InsecureRelay);
        }
        tracing::warn!(relay = %relay, "Using non-HTTPS relay (localhost only)");
    }

    let relay_url = Url::parse(&format!(
        "{}/{}",
        relay.trim_end_matches('/'),
        article.as_str()
    ))
    .map_err(|_| ContentError::InvalidUrl)?;

    let bearer = api_key
        .filter(|_| relay.starts_with(OFFICIAL_RELAY))
        .map(|k| k.expose_secret().to_owned());

    let fetched = cache
        .fetch_with_auth(Method::GET, &relay_url, bearer.as_deref())
        .await?;

    if !fetched.is_success() {
        return Err(ContentError::HttpStatus(fetched.status));
    }

    let text = String::from_utf8(fetched.body).map_err(|_| ContentError::InvalidUtf8)?;

    Ok(ArticleContent {
        markdown: strip_preamble(&text).to_string(),
        from_cache: fetched.from_cache,
    })
}

/// Strip the relay's metadata preamble.
///
/// Responses open with header lines (`Title:`, `URL Source:`, optional
/// `Published Time:`) followed by a `Markdown Content:` marker. Everything
/// after the marker is the article; a response without the marker is
/// returned whole.
fn strip_preamble(text: &str) -> &str {
    const MARKER: &str = "Markdown Content:";
    match text.find(MARKER) {
        Some(pos) => text[pos + MARKER.len()..].trim_start_matches(['\r', '\n']),
        None => text,
    }
}
