//! Persistent key-value tables.
//!
//! Provides a [`CacheStore`] trait with two implementations:
//! - [`RedisStore`] - Redis hashes, survives restarts
//! - [`MemoryStore`] - process-local maps for tests and throwaway runs
//!
//! [`Table`] layers a typed, named view on top of either.

mod memory;
mod redis_store;
mod service;
mod table;

use std::sync::Arc;

use crate::common::error::StoreResult;
use crate::config::{StoreBackend, StoreConfig};

pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use service::CacheStore;
pub use table::Table;

/// Open the store selected by the configuration.
pub async fn open(config: &StoreConfig) -> StoreResult<Arc<dyn CacheStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Redis => {
            let url = config.redis_url.as_deref().unwrap_or_default();
            Ok(Arc::new(RedisStore::connect(url, &config.namespace).await?))
        }
    }
}
