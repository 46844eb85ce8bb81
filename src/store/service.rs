//! Cache store trait.

use async_trait::async_trait;

use crate::common::error::StoreResult;

/// Asynchronous key-value store partitioned into named tables.
///
/// Keys and values are plain strings; typing lives in [`super::Table`].
/// Every call is a suspension point and may interleave with other tasks.
/// Implementations report failures unchanged and never retry.
///
/// # Implementations
///
/// - [`super::MemoryStore`] - process-local maps, used in tests and for
///   the `memory` backend
/// - [`super::RedisStore`] - one Redis hash per table
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored value, or `Ok(None)` for a missing key.
    async fn get(&self, table: &str, key: &str) -> StoreResult<Option<String>>;

    /// Inserts or overwrites a value.
    async fn set(&self, table: &str, key: &str, value: &str) -> StoreResult<()>;

    /// Removes a key. Missing keys are not an error.
    async fn delete(&self, table: &str, key: &str) -> StoreResult<()>;

    /// Removes every entry in the table.
    async fn clear(&self, table: &str) -> StoreResult<()>;

    /// Snapshot of every `(key, value)` pair in the table.
    ///
    /// Order is backend-defined.
    async fn entries(&self, table: &str) -> StoreResult<Vec<(String, String)>>;

    /// Snapshot of every key in the table.
    async fn keys(&self, table: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .entries(table)
            .await?
            .into_iter()
            .map(|(key, _)| key)
            .collect())
    }
}
