use anyhow::Result;
use chrono::Utc;

use super::schema::Database;
use super::types::{CacheStats, CachedAsset};

impl Database {
    // ========================================================================
    // Asset Cache Operations
    // ========================================================================

    /// Store a response body under `(version, url)`, replacing any previous
    /// copy for that exact request URL.
    pub async fn put_asset(
        &self,
        version: &str,
        url: &str,
        body: &[u8],
        content_type: Option<&str>,
    ) -> Result<()> {
        let size_bytes = body.len() as i64;

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO assets
                (version, url, body, content_type, fetched_at, size_bytes)
            VALUES (?, ?, ?, ?, ?, ?)
        "#,
        )
        .bind(version)
        .bind(url)
        .bind(body)
        .bind(content_type)
        .bind(Utc::now().timestamp())
        .bind(size_bytes)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Retrieve the cached copy for `(version, url)`, if any.
    pub async fn get_asset(&self, version: &str, url: &str) -> Result<Option<CachedAsset>> {
        let row: Option<(String, Vec<u8>, Option<String>, i64, i64)> = sqlx::query_as(
            r#"
            SELECT url, body, content_type, fetched_at, size_bytes
            FROM assets
            WHERE version = ? AND url = ?
        "#,
        )
        .bind(version)
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(
            |(url, body, content_type, fetched_at, size_bytes)| CachedAsset {
                url,
                body,
                content_type,
                fetched_at,
                size_bytes,
            },
        ))
    }

    /// Whether a cached copy exists for `(version, url)`.
    pub async fn has_asset(&self, version: &str, url: &str) -> Result<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM assets WHERE version = ? AND url = ?")
                .bind(version)
                .bind(url)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    /// List every distinct cache version currently present in the store.
    ///
    /// The offline-cache equivalent of the browser's `caches.keys()`.
    pub async fn cache_versions(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT version FROM assets ORDER BY version")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(v,)| v).collect())
    }

    /// Delete every row whose version differs from `current`.
    ///
    /// Returns the number of rows swept.
    pub async fn drop_other_versions(&self, current: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM assets WHERE version != ?")
            .bind(current)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Compute aggregate statistics for one cache version.
    pub async fn cache_stats(&self, version: &str) -> Result<CacheStats> {
        let row: (i64, Option<i64>, Option<i64>, Option<i64>) = sqlx::query_as(
            r#"
            SELECT COUNT(*), SUM(size_bytes), MIN(fetched_at), MAX(fetched_at)
            FROM assets
            WHERE version = ?
        "#,
        )
        .bind(version)
        .fetch_one(&self.pool)
        .await?;

        Ok(CacheStats {
            total_entries: row.0,
            total_size_bytes: row.1.unwrap_or(0),
            oldest_entry: row.2,
            newest_entry: row.3,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_put_and_get_asset() {
        let db = test_db().await;

        db.put_asset("v1", "https://example.com/a", b"hello", Some("text/plain"))
            .await
            .unwrap();

        let cached = db.get_asset("v1", "https://example.com/a").await.unwrap();
        assert!(cached.is_some());
        let cached = cached.unwrap();
        assert_eq!(cached.url, "https://example.com/a");
        assert_eq!(cached.body, b"hello");
        assert_eq!(cached.content_type.as_deref(), Some("text/plain"));
        assert_eq!(cached.size_bytes, 5);
    }

    #[tokio::test]
    async fn test_get_is_exact_on_url_and_version() {
        let db = test_db().await;
        db.put_asset("v1", "https://example.com/a", b"x", None)
            .await
            .unwrap();

        // Different query string is a different request key
        assert!(db
            .get_asset("v1", "https://example.com/a?x=1")
            .await
            .unwrap()
            .is_none());
        // Same URL under a different version is not visible
        assert!(db
            .get_asset("v2", "https://example.com/a")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_previous_copy() {
        let db = test_db().await;
        db.put_asset("v1", "https://example.com/a", b"old", None)
            .await
            .unwrap();
        db.put_asset("v1", "https://example.com/a", b"new", None)
            .await
            .unwrap();

        let cached = db
            .get_asset("v1", "https://example.com/a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cached.body, b"new");

        let stats = db.cache_stats("v1").await.unwrap();
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test]
    async fn test_drop_other_versions() {
        let db = test_db().await;
        db.put_asset("v1", "https://example.com/a", b"a", None)
            .await
            .unwrap();
        db.put_asset("v1", "https://example.com/b", b"b", None)
            .await
            .unwrap();
        db.put_asset("v2", "https://example.com/a", b"a2", None)
            .await
            .unwrap();

        let swept = db.drop_other_versions("v2").await.unwrap();
        assert_eq!(swept, 2);
        assert_eq!(db.cache_versions().await.unwrap(), vec!["v2".to_string()]);
        assert!(db
            .get_asset("v2", "https://example.com/a")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_cache_stats() {
        let db = test_db().await;

        let stats = db.cache_stats("v1").await.unwrap();
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.total_size_bytes, 0);
        assert!(stats.oldest_entry.is_none());

        db.put_asset("v1", "https://example.com/a", b"aaa", None)
            .await
            .unwrap();
        db.put_asset("v1", "https://example.com/b", b"bbbbb", None)
            .await
            .unwrap();

        let stats = db.cache_stats("v1").await.unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_size_bytes, 8);
        assert!(stats.newest_entry.is_some());
    }
}
