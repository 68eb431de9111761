use reqwest::Method;
use url::Url;

/// Per-request caching policy, decided before the request leaves the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Non-GET requests: forwarded untouched, never cached.
    Bypass,
    /// Finance-API and `.json` requests: always fetched fresh, never cached.
    /// Market data and the news document must not go stale silently.
    NetworkOnly,
    /// Everything else (GET): try the network, cache a copy of a 200
    /// response, fall back to the cached copy when the network is gone.
    NetworkFirst,
}

/// Hosts treated as the finance API regardless of path.
const FINANCE_HOST_SUFFIX: &str = "finance.yahoo.com";

/// Classify a request into a [`CachePolicy`].
///
/// A request counts as a finance-API call when its host is under
/// `finance.yahoo.com`, or when the target of a relay-wrapped request
/// (carried in the query string) is. A request counts as a JSON fetch when
/// its path ends in `.json`.
pub fn classify(method: &Method, url: &Url) -> CachePolicy {
    if *method != Method::GET {
        return CachePolicy::Bypass;
    }

    let finance_host = url
        .host_str()
        .is_some_and(|h| h == FINANCE_HOST_SUFFIX || h.ends_with(&format!(".{FINANCE_HOST_SUFFIX}")));
    let relayed_finance = url
        .query()
        .is_some_and(|q| q.contains(FINANCE_HOST_SUFFIX));
    let json_path = url.path().to_ascii_lowercase().ends_with(".json");

    if finance_host || relayed_finance || json_path {
        CachePolicy::NetworkOnly
    } else {
        CachePolicy::NetworkFirst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_non_get_bypasses() {
        assert_eq!(
            classify(&Method::POST, &u("https://example.com/page")),
            CachePolicy::Bypass
        );
        assert_eq!(
            classify(&Method::HEAD, &u("https://example.com/data.json")),
            CachePolicy::Bypass
        );
    }

    #[test]
    fn test_finance_api_is_network_only() {
        assert_eq!(
            classify(
                &Method::GET,
                &u("https://query1.finance.yahoo.com/v8/finance/chart/KC=F?interval=1d")
            ),
            CachePolicy::NetworkOnly
        );
    }

    #[test]
    fn test_relayed_finance_api_is_network_only() {
        // CORS-relay pattern: target URL rides in the query string
        assert_eq!(
            classify(
                &Method::GET,
                &u("https://relay.example.com/?https://query1.finance.yahoo.com/v8/finance/chart/RC%3DF")
            ),
            CachePolicy::NetworkOnly
        );
    }

    #[test]
    fn test_json_path_is_network_only() {
        assert_eq!(
            classify(&Method::GET, &u("https://example.com/news.json")),
            CachePolicy::NetworkOnly
        );
        assert_eq!(
            classify(&Method::GET, &u("https://example.com/public/NEWS.JSON")),
            CachePolicy::NetworkOnly
        );
    }

    #[test]
    fn test_json_in_query_does_not_count() {
        // Only the path suffix marks a JSON fetch
        assert_eq!(
            classify(&Method::GET, &u("https://example.com/page?file=news.json")),
            CachePolicy::NetworkFirst
        );
    }

    #[test]
    fn test_other_get_is_network_first() {
        assert_eq!(
            classify(&Method::GET, &u("https://example.com/article/brew-guide")),
            CachePolicy::NetworkFirst
        );
        assert_eq!(
            classify(&Method::GET, &u("https://r.jina.ai/https://example.com/post")),
            CachePolicy::NetworkFirst
        );
    }

    #[test]
    fn test_lookalike_host_is_not_finance() {
        assert_eq!(
            classify(&Method::GET, &u("https://notfinance.yahoo.com.evil.example/")),
            CachePolicy::NetworkFirst
        );
    }
}
