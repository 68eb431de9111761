mod assets;
mod schema;
mod types;

pub use schema::Database;
pub use types::{CacheStats, CachedAsset, DatabaseError};
