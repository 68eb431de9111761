use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another instance of the application has locked the database
    #[error("Another instance of drip appears to be running. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        let error_string = err.to_string().to_lowercase();

        // SQLITE_BUSY (5): database is locked
        // SQLITE_LOCKED (6): database table is locked
        // SQLITE_CANTOPEN (14): unable to open database file
        if error_string.contains("database is locked")
            || error_string.contains("database table is locked")
            || error_string.contains("sqlite_busy")
            || error_string.contains("sqlite_locked")
            || error_string.contains("unable to open database file")
        {
            return DatabaseError::InstanceLocked;
        }

        DatabaseError::Other(err)
    }
}

// ============================================================================
// Cache Rows
// ============================================================================

/// A cached response body, keyed by `(cache version, request URL)`.
///
/// The offline gateway stores one row per request URL; a version bump
/// orphans every row of the previous version until `activate` sweeps them.
#[derive(Debug, Clone)]
pub struct CachedAsset {
    pub url: String,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    /// Unix timestamp of the network fetch that produced this copy.
    pub fetched_at: i64,
    pub size_bytes: i64,
}

/// Aggregate statistics over the current cache version.
#[derive(Debug)]
pub struct CacheStats {
    pub total_entries: i64,
    pub total_size_bytes: i64,
    pub oldest_entry: Option<i64>,
    pub newest_entry: Option<i64>,
}
