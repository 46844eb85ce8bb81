//! Redis-backed cache store.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use tracing::{debug, info};

use super::service::CacheStore;
use crate::common::error::{StoreError, StoreResult};

/// Persistent store keeping each table in one Redis hash.
///
/// The hash for table `t` is named `<namespace>:<t>`, so clearing a table is
/// a single `DEL`. Errors are returned to the caller as-is.
pub struct RedisStore {
    conn: ConnectionManager,
    namespace: String,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, namespace: &str) -> StoreResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            StoreError::Connection(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            conn: manager,
            namespace: namespace.to_string(),
        })
    }

    fn hash_key(&self, table: &str) -> String {
        hash_key(&self.namespace, table)
    }
}

fn hash_key(namespace: &str, table: &str) -> String {
    format!("{}:{}", namespace, table)
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, table: &str, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.hget(self.hash_key(table), key).await?;
        debug!(
            "Redis HGET {}[{}] -> {}",
            table,
            key,
            if value.is_some() { "hit" } else { "miss" }
        );
        Ok(value)
    }

    async fn set(&self, table: &str, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.hset::<_, _, _, ()>(self.hash_key(table), key, value)
            .await?;
        Ok(())
    }

    async fn delete(&self, table: &str, key: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.hdel::<_, _, ()>(self.hash_key(table), key).await?;
        Ok(())
    }

    async fn clear(&self, table: &str) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.hash_key(table)).await?;
        info!("Cleared Redis table {}", self.hash_key(table));
        Ok(())
    }

    async fn entries(&self, table: &str) -> StoreResult<Vec<(String, String)>> {
        let mut conn = self.conn.clone();
        let all: HashMap<String, String> = conn.hgetall(self.hash_key(table)).await?;
        Ok(all.into_iter().collect())
    }

    async fn keys(&self, table: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn.clone();
        Ok(conn.hkeys(self.hash_key(table)).await?)
    }
}
