//! Typed view over one named table of a [`CacheStore`].

use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use super::service::CacheStore;
use crate::common::error::{StoreError, StoreResult};

/// A named table whose values are encoded with `Display` / `FromStr`.
///
/// Cheap to clone; clones share the underlying store.
pub struct Table<V> {
    store: Arc<dyn CacheStore>,
    name: String,
    _value: PhantomData<fn() -> V>,
}

impl<V> Clone for Table<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            name: self.name.clone(),
            _value: PhantomData,
        }
    }
}

impl<V> Table<V>
where
    V: Display + FromStr + PartialEq,
{
    pub fn new(store: Arc<dyn CacheStore>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
            _value: PhantomData,
        }
    }

    pub async fn get(&self, key: &str) -> StoreResult<Option<V>> {
        match self.store.get(&self.name, key).await? {
            Some(raw) => self.decode(raw).map(Some),
            None => Ok(None),
        }
    }

    pub async fn set(&self, key: &str, value: &V) -> StoreResult<()> {
        self.store.set(&self.name, key, &value.to_string()).await
    }

    pub async fn delete(&self, key: &str) -> StoreResult<()> {
        self.store.delete(&self.name, key).await
    }

    pub async fn clear(&self) -> StoreResult<()> {
        self.store.clear(&self.name).await
    }

    /// Number of entries. Walks every key.
    pub async fn size(&self) -> StoreResult<usize> {
        Ok(self.store.keys(&self.name).await?.len())
    }

    /// Linear scan for the first key holding `value`.
    ///
    /// Iteration order is whatever the backend yields. Entries that fail to
    /// decode are skipped.
    pub async fn find_by_value(&self, value: &V) -> StoreResult<Option<String>> {
        let entries = self.store.entries(&self.name).await?;
        Ok(entries.into_iter().find_map(|(key, raw)| {
            match raw.parse::<V>() {
                Ok(v) if &v == value => Some(key),
                _ => None,
            }
        }))
    }

    fn decode(&self, raw: String) -> StoreResult<V> {
        raw.parse().map_err(|_| StoreError::Decode {
            table: self.name.clone(),
            value: raw,
        })
    }
}
