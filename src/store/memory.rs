//! In-memory cache store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::service::CacheStore;
use crate::common::error::StoreResult;

/// A process-local store.
///
/// Contents are lost on restart. Each table iterates in key order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        debug!("Using MemoryStore (short ids will not survive a restart)");
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, table: &str, key: &str) -> StoreResult<Option<String>> {
        let tables = self.tables.read().await;
        Ok(tables.get(table).and_then(|t| t.get(key)).cloned())
    }

    async fn set(&self, table: &str, key: &str, value: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, table: &str, key: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(t) = tables.get_mut(table) {
            t.remove(key);
        }
        Ok(())
    }

    async fn clear(&self, table: &str) -> StoreResult<()> {
        self.tables.write().await.remove(table);
        Ok(())
    }

    async fn entries(&self, table: &str) -> StoreResult<Vec<(String, String)>> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(table)
            .map(|t| t.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("t", "nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = MemoryStore::new();
        assert_ok!(store.set("t", "k", "1").await);
        assert_ok!(store.set("t", "k", "2").await);
        assert_eq!(store.get("t", "k").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_tables_are_isolated() {
        let store = MemoryStore::new();
        store.set("a", "k", "in-a").await.unwrap();
        store.set("b", "k", "in-b").await.unwrap();

        store.clear("a").await.unwrap();

        assert_eq!(store.get("a", "k").await.unwrap(), None);
        assert_eq!(store.get("b", "k").await.unwrap().as_deref(), Some("in-b"));
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let store = MemoryStore::new();
        assert_ok!(store.delete("t", "k").await);
        store.set("t", "k", "v").await.unwrap();
        assert_ok!(store.delete("t", "k").await);
        assert!(store.entries("t").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_keys_default_impl() {
        let store = MemoryStore::new();
        store.set("t", "b", "2").await.unwrap();
        store.set("t", "a", "1").await.unwrap();
        assert_eq!(store.keys("t").await.unwrap(), vec!["a", "b"]);
    }
}
