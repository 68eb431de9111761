//! Offline cache gateway.
//!
//! Every HTTP request the dashboard makes is routed through
//! [`OfflineCache::fetch`], which applies a per-request [`CachePolicy`]:
//! JSON and finance-API requests are network-only, everything else is
//! network-first with a cache fallback. The cache itself is a SQLite table
//! keyed by `(version, url)`; bumping [`CACHE_VERSION`] orphans every
//! stored response until [`OfflineCache::activate`] sweeps them.
//!
//! The lifecycle mirrors a browser service worker: `install` pre-populates
//! the current version with a fixed asset list, `activate` deletes every
//! other version, `fetch` serves requests per policy.

mod policy;

pub use policy::{classify, CachePolicy};

use crate::storage::{CacheStats, CachedAsset, Database};
use futures::StreamExt;
use reqwest::Method;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Current cache-name version. Bump to invalidate every stored response
/// wholesale on the next `activate`.
pub const CACHE_VERSION: &str = "drip-assets-v1";

/// Per-request timeout for network fetches through the gateway.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum cached response body (5MB).
const MAX_BODY_SIZE: usize = 5 * 1024 * 1024;

/// Errors surfaced by the offline gateway.
///
/// HTTP error statuses are not errors here — like a browser `fetch`, the
/// gateway returns the response and lets the caller judge the status. Only
/// network-level failures (after the cache fallback also missed) and local
/// safety limits surface as `Err`.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// Response body exceeded the 5MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Cache store operation failed
    #[error("Cache store error: {0}")]
    Store(String),
}

/// A response served by the gateway, from the network or from cache.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    /// True when the network was unreachable and the cached copy was served.
    pub from_cache: bool,
}

impl Fetched {
    /// Whether the response carries a success status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn from_cached(asset: CachedAsset) -> Self {
        Self {
            status: 200,
            body: asset.body,
            content_type: asset.content_type,
            from_cache: true,
        }
    }
}

/// The offline gateway: a versioned response store behind an HTTP client.
#[derive(Clone)]
pub struct OfflineCache {
    db: Database,
    client: reqwest::Client,
    version: String,
}

impl OfflineCache {
    pub fn new(db: Database, client: reqwest::Client) -> Self {
        Self::with_version(db, client, CACHE_VERSION)
    }

    /// Construct with an explicit version name. Production code uses
    /// [`CACHE_VERSION`]; tests exercise version sweeps with their own names.
    pub fn with_version(db: Database, client: reqwest::Client, version: impl Into<String>) -> Self {
        Self {
            db,
            client,
            version: version.into(),
        }
    }

    /// The active cache-name version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Pre-populate the current version with a fixed asset list.
    ///
    /// Best-effort: each asset is fetched once and stored on HTTP 200;
    /// individual failures are logged and skipped so one bad asset cannot
    /// abort installation. Assets already present are not re-fetched.
    ///
    /// Returns the number of assets newly stored.
    pub async fn install(&self, assets: &[String]) -> usize {
        let mut stored = 0;

        for raw in assets {
            let url = match Url::parse(raw) {
                Ok(u) => u,
                Err(e) => {
                    tracing::warn!(asset = %raw, error = %e, "Skipping unparseable precache asset");
                    continue;
                }
            };

            match self.db.has_asset(&self.version, url.as_str()).await {
                Ok(true) => continue,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(asset = %raw, error = %e, "Cache lookup failed during install");
                    continue;
                }
            }

            match self.network_fetch(Method::GET, &url, None).await {
                Ok(fetched) if fetched.status == 200 => {
                    if let Err(e) = self
                        .db
                        .put_asset(
                            &self.version,
                            url.as_str(),
                            &fetched.body,
                            fetched.content_type.as_deref(),
                        )
                        .await
                    {
                        tracing::warn!(asset = %raw, error = %e, "Failed to store precache asset");
                    } else {
                        stored += 1;
                    }
                }
                Ok(fetched) => {
                    tracing::warn!(asset = %raw, status = fetched.status, "Precache asset not stored");
                }
                Err(e) => {
                    tracing::warn!(asset = %raw, error = %e, "Precache fetch failed");
                }
            }
        }

        tracing::info!(
            version = %self.version,
            requested = assets.len(),
            stored = stored,
            "Offline cache install complete"
        );
        stored
    }

    /// Sweep every cache version other than the current one.
    ///
    /// After activation, [`Database::cache_versions`] lists only the current
    /// version name (when any rows exist at all).
    pub async fn activate(&self) -> Result<u64, CacheError> {
        let swept = self
            .db
            .drop_other_versions(&self.version)
            .await
            .map_err(|e| CacheError::Store(e.to_string()))?;
        if swept > 0 {
            tracing::info!(version = %self.version, swept = swept, "Swept stale cache versions");
        }
        Ok(swept)
    }

    /// Serve one request per the cache policy.
    ///
    /// - `Bypass` / `NetworkOnly`: forwarded to the network; the store is
    ///   never read or written.
    /// - `NetworkFirst`: network first; an HTTP 200 response is copied into
    ///   the store under the exact request URL before being returned. On a
    ///   network-level failure the cached copy (if any) is served instead;
    ///   with no cached copy the original error propagates (fail open).
    pub async fn fetch(&self, method: Method, url: &Url) -> Result<Fetched, CacheError> {
        self.fetch_with_auth(method, url, None).await
    }

    /// [`fetch`](Self::fetch) with an optional bearer token attached to the
    /// network request. The token never influences the cache key: cached
    /// copies are keyed by URL alone, matching the original request-keyed
    /// store.
    pub async fn fetch_with_auth(
        &self,
        method: Method,
        url: &Url,
        bearer: Option<&str>,
    ) -> Result<Fetched, CacheError> {
        match classify(&method, url) {
            CachePolicy::Bypass | CachePolicy::NetworkOnly => {
                self.network_fetch(method, url, bearer).await
            }
            CachePolicy::NetworkFirst => match self.network_fetch(method, url, bearer).await {
                Ok(fetched) => {
                    if fetched.status == 200 {
                        // Best-effort: a failed write must not fail the request
                        if let Err(e) = self
                            .db
                            .put_asset(
                                &self.version,
                                url.as_str(),
                                &fetched.body,
                                fetched.content_type.as_deref(),
                            )
                            .await
                        {
                            tracing::warn!(url = %url, error = %e, "Failed to cache response");
                        }
                    }
                    Ok(fetched)
                }
                Err(err) => match self.db.get_asset(&self.version, url.as_str()).await {
                    Ok(Some(asset)) => {
                        tracing::debug!(url = %url, "Network unreachable, serving cached copy");
                        Ok(Fetched::from_cached(asset))
                    }
                    Ok(None) => Err(err),
                    Err(db_err) => {
                        tracing::warn!(url = %url, error = %db_err, "Cache fallback lookup failed");
                        Err(err)
                    }
                },
            },
        }
    }

    /// Aggregate statistics for the current version.
    pub async fn stats(&self) -> Result<CacheStats, CacheError> {
        self.db
            .cache_stats(&self.version)
            .await
            .map_err(|e| CacheError::Store(e.to_string()))
    }

    async fn network_fetch(
        &self,
        method: Method,
        url: &Url,
        bearer: Option<&str>,
    ) -> Result<Fetched, CacheError> {
        let mut request = self.client.request(method, url.clone());
        if let Some(token) = bearer {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = tokio::time::timeout(FETCH_TIMEOUT, request.send())
            .await
            .map_err(|_| CacheError::Timeout)?
            .map_err(CacheError::Network)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = read_limited_bytes(response, MAX_BODY_SIZE).await?;

        Ok(Fetched {
            status,
            body,
            content_type,
            from_cache: false,
        })
    }
}

/// Stream a response body into memory, enforcing a size cap.
pub(crate) async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, CacheError> {
    // Fast path: trust Content-Length when present
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(CacheError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(CacheError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(CacheError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
