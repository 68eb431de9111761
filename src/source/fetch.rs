use std::time::Duration;

use chrono::Utc;
use futures::StreamExt;
use thiserror::Error;

use super::demo::demo_document;
use super::descriptor::{first_success, Location, SourceDescriptor};
use super::document::NewsDocument;

/// Request timeout for remote document fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum document size (2MB). A news export is a few hundred KB at most.
const MAX_DOCUMENT_SIZE: usize = 2 * 1024 * 1024;

/// Errors from a single candidate attempt.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Local file could not be read
    #[error("Read failed: {0}")]
    Io(#[from] std::io::Error),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the 10-second timeout
    #[error("Request timed out")]
    Timeout,
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Document exceeded the 2MB size limit
    #[error("Document too large")]
    TooLarge,
    /// Body was not a valid news document
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the resolved document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOrigin {
    /// A candidate succeeded; carries its configured label.
    Source(String),
    /// Every candidate failed; the built-in demo set is in use.
    Demo,
}

/// A resolved document plus its provenance.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub document: NewsDocument,
    pub origin: DocumentOrigin,
}

impl Resolved {
    pub fn is_demo(&self) -> bool {
        self.origin == DocumentOrigin::Demo
    }
}

/// Load and parse the document from one candidate location.
pub async fn load_document(
    client: &reqwest::Client,
    descriptor: &SourceDescriptor,
) -> Result<NewsDocument, SourceError> {
    let bytes = match &descriptor.location {
        Location::Path(path) => {
            let meta = tokio::fs::metadata(path).await?;
            if meta.len() as usize > MAX_DOCUMENT_SIZE {
                return Err(SourceError::TooLarge);
            }
            tokio::fs::read(path).await?
        }
        Location::Remote(url) => {
            // Cache-buster: a dummy query parameter so no intermediary
            // serves us yesterday's document.
            let mut url = url.clone();
            url.query_pairs_mut()
                .append_pair("_", &Utc::now().timestamp().to_string());

            let response = tokio::time::timeout(FETCH_TIMEOUT, client.get(url).send())
                .await
                .map_err(|_| SourceError::Timeout)?
                .map_err(SourceError::Network)?;

            if !response.status().is_success() {
                return Err(SourceError::HttpStatus(response.status().as_u16()));
            }

            read_limited_bytes(response, MAX_DOCUMENT_SIZE).await?
        }
    };

    Ok(serde_json::from_slice(&bytes)?)
}

/// Resolve the news document from the ordered candidate list.
///
/// Candidates are tried in order until one yields a parseable document. On
/// total failure every candidate's error is logged and the built-in demo
/// document is returned instead — the caller sees demo mode, never an
/// error.
pub async fn resolve(client: &reqwest::Client, descriptors: &[SourceDescriptor]) -> Resolved {
    let client = client.clone();
    match first_success(descriptors, |d| {
        let client = client.clone();
        async move { load_document(&client, &d).await }
    })
    .await
    {
        Ok((idx, document)) => {
            let label = descriptors[idx].label.clone();
            tracing::info!(
                source = %label,
                articles = document.articles.len(),
                "Loaded news document"
            );
            Resolved {
                document,
                origin: DocumentOrigin::Source(label),
            }
        }
        Err(failures) => {
            for (label, error) in &failures {
                tracing::warn!(source = %label, error = %error, "Candidate source failed");
            }
            tracing::warn!(
                candidates = failures.len(),
                "All candidate sources failed, using demo content"
            );
            Resolved {
                document: demo_document(),
                origin: DocumentOrigin::Demo,
            }
        }
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, SourceError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(SourceError::TooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(SourceError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(SourceError::TooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(raw: &str) -> SourceDescriptor {
        SourceDescriptor::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = std::env::temp_dir().join("drip_source_test_file");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("news.json");
        std::fs::write(
            &path,
            r#"{"updated_at": "2026-08-07T06:00:00+00:00", "articles": []}"#,
        )
        .unwrap();

        let client = reqwest::Client::new();
        let doc = load_document(&client, &descriptor(path.to_str().unwrap()))
            .await
            .unwrap();
        assert_eq!(doc.updated_at, "2026-08-07T06:00:00+00:00");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let client = reqwest::Client::new();
        let result = load_document(&client, &descriptor("/nonexistent/drip/news.json")).await;
        assert!(matches!(result, Err(SourceError::Io(_))));
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join("drip_source_test_malformed");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("news.json");
        std::fs::write(&path, "{not json").unwrap();

        let client = reqwest::Client::new();
        let result = load_document(&client, &descriptor(path.to_str().unwrap())).await;
        assert!(matches!(result, Err(SourceError::Parse(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_demo() {
        let client = reqwest::Client::new();
        let descriptors = SourceDescriptor::parse_list(&[
            "/nonexistent/a.json".to_string(),
            "/nonexistent/b.json".to_string(),
        ]);

        let resolved = resolve(&client, &descriptors).await;
        assert!(resolved.is_demo());
        assert_eq!(resolved.document.articles.len(), 3);
    }

    #[tokio::test]
    async fn test_resolve_prefers_earlier_candidate() {
        let dir = std::env::temp_dir().join("drip_source_test_order");
        std::fs::create_dir_all(&dir).unwrap();
        let first = dir.join("first.json");
        let second = dir.join("second.json");
        std::fs::write(&first, r#"{"updated_at": "first", "articles": []}"#).unwrap();
        std::fs::write(&second, r#"{"updated_at": "second", "articles": []}"#).unwrap();

        let client = reqwest::Client::new();
        let descriptors = SourceDescriptor::parse_list(&[
            first.to_str().unwrap().to_string(),
            second.to_str().unwrap().to_string(),
        ]);

        let resolved = resolve(&client, &descriptors).await;
        assert_eq!(resolved.document.updated_at, "first");
        assert_eq!(
            resolved.origin,
            DocumentOrigin::Source(first.to_str().unwrap().to_string())
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
