use std::future::Future;
use std::path::PathBuf;

use url::Url;

use crate::util::validate_url;

/// Where a candidate document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// A file on the local filesystem, relative paths resolved against the
    /// working directory.
    Path(PathBuf),
    /// An http(s) URL.
    Remote(Url),
}

/// One candidate location for the news document.
#[derive(Debug, Clone)]
pub struct SourceDescriptor {
    /// The configured string, kept verbatim for logs and status messages.
    pub label: String,
    pub location: Location,
}

impl SourceDescriptor {
    /// Parse a configured source string into a descriptor.
    ///
    /// Strings with an http(s) scheme become [`Location::Remote`] (and must
    /// pass URL validation); everything else is treated as a filesystem
    /// path. Returns `None` for remote strings that fail validation — the
    /// caller logs and drops them rather than aborting the whole list.
    pub fn parse(raw: &str) -> Option<Self> {
        let location = if raw.starts_with("http://") || raw.starts_with("https://") {
            match validate_url(raw) {
                Ok(url) => Location::Remote(url),
                Err(e) => {
                    tracing::warn!(source = %raw, error = %e, "Dropping invalid source URL");
                    return None;
                }
            }
        } else {
            Location::Path(PathBuf::from(raw))
        };

        Some(Self {
            label: raw.to_string(),
            location,
        })
    }

    /// Parse a configured list, dropping invalid entries.
    pub fn parse_list(raw: &[String]) -> Vec<Self> {
        raw.iter().filter_map(|s| Self::parse(s)).collect()
    }
}

/// Try each descriptor in order, returning the first success.
///
/// The generic "first success" combinator: `attempt` is invoked per
/// descriptor until one returns `Ok`; the winner's index is returned with
/// the value. When every candidate fails, all errors are returned paired
/// with their descriptor labels so the caller can log each one.
pub async fn first_success<T, E, F, Fut>(
    descriptors: &[SourceDescriptor],
    mut attempt: F,
) -> Result<(usize, T), Vec<(String, E)>>
where
    F: FnMut(SourceDescriptor) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut failures = Vec::new();

    for (idx, descriptor) in descriptors.iter().enumerate() {
        let label = descriptor.label.clone();
        match attempt(descriptor.clone()).await {
            Ok(value) => return Ok((idx, value)),
            Err(e) => failures.push((label, e)),
        }
    }

    Err(failures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_descriptor() {
        let d = SourceDescriptor::parse("./news.json").unwrap();
        assert_eq!(d.label, "./news.json");
        assert_eq!(d.location, Location::Path(PathBuf::from("./news.json")));
    }

    #[test]
    fn test_parse_remote_descriptor() {
        let d = SourceDescriptor::parse("https://example.com/news.json").unwrap();
        assert!(matches!(d.location, Location::Remote(_)));
    }

    #[test]
    fn test_parse_rejects_bad_remote() {
        // http(s)-prefixed but unparseable → dropped, not treated as a path
        assert!(SourceDescriptor::parse("http://").is_none());
    }

    #[test]
    fn test_parse_list_drops_invalid() {
        let raw = vec![
            "./news.json".to_string(),
            "http://".to_string(),
            "https://example.com/news.json".to_string(),
        ];
        let parsed = SourceDescriptor::parse_list(&raw);
        assert_eq!(parsed.len(), 2);
    }

    #[tokio::test]
    async fn test_first_success_returns_first_ok() {
        let descriptors = SourceDescriptor::parse_list(&[
            "./a.json".to_string(),
            "./b.json".to_string(),
            "./c.json".to_string(),
        ]);

        let result = first_success(&descriptors, |d| async move {
            if d.label == "./b.json" {
                Ok::<_, String>(42)
            } else {
                Err("nope".to_string())
            }
        })
        .await;

        assert_eq!(result.unwrap(), (1, 42));
    }

    #[tokio::test]
    async fn test_first_success_stops_at_winner() {
        let descriptors =
            SourceDescriptor::parse_list(&["./a.json".to_string(), "./b.json".to_string()]);

        let mut attempts = 0;
        let result = first_success(&descriptors, |_| {
            attempts += 1;
            async move { Ok::<_, String>(()) }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(attempts, 1);
    }

    #[tokio::test]
    async fn test_first_success_collects_all_failures() {
        let descriptors =
            SourceDescriptor::parse_list(&["./a.json".to_string(), "./b.json".to_string()]);

        let result = first_success(&descriptors, |d| async move {
            Err::<(), _>(format!("failed {}", d.label))
        })
        .await;

        let failures = result.unwrap_err();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].0, "./a.json");
        assert_eq!(failures[1].1, "failed ./b.json");
    }

    #[tokio::test]
    async fn test_first_success_empty_list_fails() {
        let result = first_success(&[], |_| async move { Ok::<_, String>(()) }).await;
        assert!(result.unwrap_err().is_empty());
    }
}
