//! Short match ids.
//!
//! Match ids from the API are UUIDs, too long to type in chat. The
//! [`Shortener`] hands out sequential numbers (`1`, `2`, ...) the first time
//! an id is seen and remembers the mapping in three tables:
//!
//! - forward: short id -> long id
//! - reverse: long id -> short id
//! - counter: the last short id handed out
//!
//! Entries are never rewritten or reclaimed; only [`Shortener::clear`]
//! removes them.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use fancy_regex::Regex;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::common::error::StoreResult;
use crate::store::{CacheStore, Table};

/// Numeric alias for a long id.
pub type ShortId = u64;

pub const FORWARD_TABLE: &str = "valorant-short-id";
pub const REVERSE_TABLE: &str = "valorant-long-id";
pub const COUNTER_TABLE: &str = "valorant-short-id-seq";
const COUNTER_KEY: &str = "last";

/// Canonical UUID text form (versions 1-8, RFC 4122 variant, plus nil/max).
static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:[0-9a-f]{8}-[0-9a-f]{4}-[1-8][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}|00000000-0000-0000-0000-000000000000|ffffffff-ffff-ffff-ffff-ffffffffffff)$",
    )
    .unwrap()
});

/// Whether `token` is already a long-form UUID.
pub fn is_uuid(token: &str) -> bool {
    UUID_PATTERN.is_match(token).unwrap_or(false)
}

/// Table sizes, for the admin `cache stats` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenerStats {
    pub forward_entries: usize,
    pub reverse_entries: usize,
    pub last_assigned: ShortId,
}

/// Result of cross-checking one long id against both tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub long_id: String,
    /// What the reverse index says.
    pub reverse: Option<ShortId>,
    /// First forward key holding this long id, found by scanning.
    pub forward_scan: Option<String>,
    /// What the forward table holds at the reverse index's short id.
    pub forward_at_reverse: Option<String>,
}

impl AuditReport {
    pub fn is_consistent(&self) -> bool {
        match self.reverse {
            None => self.forward_scan.is_none(),
            Some(short) => {
                self.forward_scan.as_deref() == Some(short.to_string().as_str())
                    && self.forward_at_reverse.as_deref() == Some(self.long_id.as_str())
            }
        }
    }
}

/// Bidirectional long id <-> short id mapping.
pub struct Shortener {
    forward: Table<String>,
    reverse: Table<ShortId>,
    counter: Table<ShortId>,
    /// Held across "read counter, reserve next, write entries".
    assign_lock: Mutex<()>,
}

impl Shortener {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            forward: Table::new(Arc::clone(&store), FORWARD_TABLE),
            reverse: Table::new(Arc::clone(&store), REVERSE_TABLE),
            counter: Table::new(store, COUNTER_TABLE),
            assign_lock: Mutex::new(()),
        }
    }

    /// Shorten every id in `long_ids`, in order.
    ///
    /// Empty entries are skipped and duplicates collapse to one entry. Ids
    /// seen for the first time get the next sequential short id.
    pub async fn shorten_many<S>(&self, long_ids: &[S]) -> StoreResult<HashMap<String, String>>
    where
        S: AsRef<str> + Sync,
    {
        let mut result = HashMap::new();

        for long_id in long_ids {
            let long_id = long_id.as_ref();
            if long_id.is_empty() || result.contains_key(long_id) {
                continue;
            }

            let short = self.shorten(long_id).await?;
            result.insert(long_id.to_string(), short.to_string());
        }

        Ok(result)
    }

    /// Short id for one long id, assigning a new one if needed.
    pub async fn shorten(&self, long_id: &str) -> StoreResult<ShortId> {
        if let Some(short) = self.reverse.get(long_id).await? {
            debug!("Short id hit: {} -> {}", long_id, short);
            return Ok(short);
        }

        let _guard = self.assign_lock.lock().await;

        // Another task may have assigned it while we waited for the lock.
        if let Some(short) = self.reverse.get(long_id).await? {
            debug!("Short id assigned concurrently: {} -> {}", long_id, short);
            return Ok(short);
        }

        let mut next = self.counter.get(COUNTER_KEY).await?.unwrap_or(0) + 1;
        // A failed assignment may have left a forward entry past the counter.
        while self.forward.get(&next.to_string()).await?.is_some() {
            next += 1;
        }
        let key = next.to_string();
        let value = long_id.to_string();

        let written = futures::try_join!(
            self.forward.set(&key, &value),
            self.reverse.set(long_id, &next),
            self.counter.set(COUNTER_KEY, &next),
        );
        if let Err(e) = written {
            self.roll_back(long_id, &key).await;
            return Err(e);
        }

        debug!("Short id assigned: {} -> {}", long_id, next);
        Ok(next)
    }

    /// Undo the mapping writes of a failed assignment, best effort.
    async fn roll_back(&self, long_id: &str, key: &str) {
        let (forward, reverse) =
            futures::join!(self.forward.delete(key), self.reverse.delete(long_id));
        for result in [forward, reverse] {
            if let Err(e) = result {
                warn!("Failed to roll back short id {} for {}: {}", key, long_id, e);
            }
        }
    }

    /// Map a user-supplied token back to a long id.
    ///
    /// UUIDs pass through untouched. Anything else is looked up in the
    /// forward table; a leading `#` is ignored so `#3` works like `3`.
    pub async fn resolve_short_id(&self, token: &str) -> StoreResult<Option<String>> {
        let token = token.trim();
        if is_uuid(token) {
            return Ok(Some(token.to_string()));
        }

        let key = token.strip_prefix('#').unwrap_or(token);
        if key.is_empty() {
            return Ok(None);
        }
        self.forward.get(key).await
    }

    pub async fn stats(&self) -> StoreResult<ShortenerStats> {
        let (forward_entries, reverse_entries, last_assigned) = futures::try_join!(
            self.forward.size(),
            self.reverse.size(),
            self.counter.get(COUNTER_KEY),
        )?;

        Ok(ShortenerStats {
            forward_entries,
            reverse_entries,
            last_assigned: last_assigned.unwrap_or(0),
        })
    }

    /// Drop every mapping and reset the counter.
    pub async fn clear(&self) -> StoreResult<()> {
        let _guard = self.assign_lock.lock().await;
        futures::try_join!(self.forward.clear(), self.reverse.clear(), self.counter.clear())?;
        info!("Short id tables cleared");
        Ok(())
    }

    /// Compare the reverse index for `long_id` against a full scan of the
    /// forward table.
    pub async fn audit(&self, long_id: &str) -> StoreResult<AuditReport> {
        let reverse = self.reverse.get(long_id).await?;
        let forward_scan = self.forward.find_by_value(&long_id.to_string()).await?;
        let forward_at_reverse = match reverse {
            Some(short) => self.forward.get(&short.to_string()).await?,
            None => None,
        };

        let report = AuditReport {
            long_id: long_id.to_string(),
            reverse,
            forward_scan,
            forward_at_reverse,
        };
        if !report.is_consistent() {
            warn!("Short id tables disagree: {:?}", report);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use crate::common::error::StoreError;

    const MATCH_UUID: &str = "a1b2c3d4-e5f6-4a7b-8c9d-0e1f2a3b4c5d";

    /// Memory store whose first counter write fails.
    struct FlakyCounterStore {
        inner: MemoryStore,
        failed: AtomicBool,
    }

    impl FlakyCounterStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                failed: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl CacheStore for FlakyCounterStore {
        async fn get(&self, table: &str, key: &str) -> StoreResult<Option<String>> {
            self.inner.get(table, key).await
        }

        async fn set(&self, table: &str, key: &str, value: &str) -> StoreResult<()> {
            if table == COUNTER_TABLE && !self.failed.swap(true, Ordering::SeqCst) {
                return Err(StoreError::Operation("counter write refused".to_string()));
            }
            self.inner.set(table, key, value).await
        }

        async fn delete(&self, table: &str, key: &str) -> StoreResult<()> {
            self.inner.delete(table, key).await
        }

        async fn clear(&self, table: &str) -> StoreResult<()> {
            self.inner.clear(table).await
        }

        async fn entries(&self, table: &str) -> StoreResult<Vec<(String, String)>> {
            self.inner.entries(table).await
        }
    }

    fn setup() -> (Arc<dyn CacheStore>, Shortener) {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
        let shortener = Shortener::new(Arc::clone(&store));
        (store, shortener)
    }

    #[test]
    fn test_is_uuid() {
        assert!(is_uuid(MATCH_UUID));
        assert!(is_uuid(&MATCH_UUID.to_uppercase()));
        assert!(is_uuid("00000000-0000-0000-0000-000000000000"));
        // Version nibble 0 is not a valid UUID version.
        assert!(!is_uuid("a1b2c3d4-e5f6-0a7b-8c9d-0e1f2a3b4c5d"));
        // Variant nibble must be 8, 9, a or b.
        assert!(!is_uuid("a1b2c3d4-e5f6-4a7b-cc9d-0e1f2a3b4c5d"));
        assert!(!is_uuid("12"));
        assert!(!is_uuid(&format!("{}x", MATCH_UUID)));
    }

    #[tokio::test]
    async fn test_sequential_assignment_in_input_order() {
        let (_, shortener) = setup();

        let result = shortener.shorten_many(&["m1", "m2", "m3"]).await.unwrap();

        assert_eq!(result["m1"], "1");
        assert_eq!(result["m2"], "2");
        assert_eq!(result["m3"], "3");
    }

    #[tokio::test]
    async fn test_empty_counter_scenario() {
        let (store, shortener) = setup();

        let result = shortener.shorten_many(&["m1", "m2"]).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result["m1"], "1");
        assert_eq!(result["m2"], "2");

        let forward = store.entries(FORWARD_TABLE).await.unwrap();
        assert_eq!(
            forward,
            vec![
                ("1".to_string(), "m1".to_string()),
                ("2".to_string(), "m2".to_string())
            ]
        );
        assert_eq!(
            store.get(COUNTER_TABLE, COUNTER_KEY).await.unwrap().as_deref(),
            Some("2")
        );
    }

    #[tokio::test]
    async fn test_existing_mapping_scenario() {
        let (store, shortener) = setup();
        store.set(COUNTER_TABLE, COUNTER_KEY, "5").await.unwrap();
        store.set(FORWARD_TABLE, "3", "old-match").await.unwrap();
        store.set(REVERSE_TABLE, "old-match", "3").await.unwrap();

        let result = shortener
            .shorten_many(&["old-match", "new-match"])
            .await
            .unwrap();

        assert_eq!(result["old-match"], "3");
        assert_eq!(result["new-match"], "6");
        assert_eq!(shortener.stats().await.unwrap().last_assigned, 6);
    }

    #[tokio::test]
    async fn test_idempotent_across_batches() {
        let (_, shortener) = setup();

        let first = shortener.shorten_many(&["a", "b"]).await.unwrap();
        let second = shortener.shorten_many(&["b", "c", "a"]).await.unwrap();

        assert_eq!(first["a"], second["a"]);
        assert_eq!(first["b"], second["b"]);
        assert_eq!(second["c"], "3");
    }

    #[tokio::test]
    async fn test_duplicates_and_empty_entries_collapse() {
        let (_, shortener) = setup();

        let result = shortener.shorten_many(&["A", "", "A", "B"]).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result["A"], "1");
        assert_eq!(result["B"], "2");
        assert_eq!(shortener.stats().await.unwrap().last_assigned, 2);
    }

    #[tokio::test]
    async fn test_resolve_is_left_inverse() {
        let (_, shortener) = setup();
        let ids = ["match-x", "match-y", MATCH_UUID];

        let result = shortener.shorten_many(&ids).await.unwrap();

        for id in ids {
            let resolved = shortener.resolve_short_id(&result[id]).await.unwrap();
            assert_eq!(resolved.as_deref(), Some(id));
        }
    }

    #[tokio::test]
    async fn test_resolve_accepts_hash_prefix() {
        let (_, shortener) = setup();
        shortener.shorten_many(&["m1"]).await.unwrap();

        assert_eq!(
            shortener.resolve_short_id("#1").await.unwrap().as_deref(),
            Some("m1")
        );
        assert_eq!(shortener.resolve_short_id("#").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_unseen_uuid_passes_through() {
        let (store, shortener) = setup();

        let resolved = shortener.resolve_short_id(MATCH_UUID).await.unwrap();

        assert_eq!(resolved.as_deref(), Some(MATCH_UUID));
        assert!(store.entries(FORWARD_TABLE).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_unknown_token_is_none() {
        let (_, shortener) = setup();
        shortener.shorten_many(&["m1"]).await.unwrap();

        assert_eq!(shortener.resolve_short_id("42").await.unwrap(), None);
        assert_eq!(shortener.resolve_short_id("nonsense").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_first_time_shortening_agrees() {
        let (_, shortener) = setup();
        let shortener = Arc::new(shortener);

        let mut tasks = Vec::new();
        for i in 0..16 {
            let shortener = Arc::clone(&shortener);
            tasks.push(tokio::spawn(async move {
                // Half the tasks race on the same id, the rest bring new ones.
                let id = if i % 2 == 0 { "shared".to_string() } else { format!("own-{}", i) };
                let short = shortener.shorten(&id).await.unwrap();
                (id, short)
            }));
        }

        let mut assigned: HashMap<String, ShortId> = HashMap::new();
        for task in tasks {
            let (id, short) = task.await.unwrap();
            if let Some(previous) = assigned.insert(id, short) {
                assert_eq!(previous, short);
            }
        }

        // 1 shared + 8 distinct ids, numbered 1..=9 without gaps or clashes.
        let mut shorts: Vec<ShortId> = assigned.values().copied().collect();
        shorts.sort_unstable();
        assert_eq!(shorts, (1..=9).collect::<Vec<_>>());

        let stats = shortener.stats().await.unwrap();
        assert_eq!(stats.last_assigned, 9);
        assert_eq!(stats.forward_entries, 9);
        assert_eq!(stats.reverse_entries, 9);
    }

    #[tokio::test]
    async fn test_clear_resets_numbering() {
        let (_, shortener) = setup();
        shortener.shorten_many(&["a", "b"]).await.unwrap();

        shortener.clear().await.unwrap();

        let stats = shortener.stats().await.unwrap();
        assert_eq!(
            stats,
            ShortenerStats {
                forward_entries: 0,
                reverse_entries: 0,
                last_assigned: 0
            }
        );
        assert_eq!(shortener.resolve_short_id("1").await.unwrap(), None);
        assert_eq!(shortener.shorten("c").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_audit_consistent() {
        let (_, shortener) = setup();
        shortener.shorten_many(&["a", "b"]).await.unwrap();

        let report = shortener.audit("b").await.unwrap();
        assert_eq!(report.reverse, Some(2));
        assert_eq!(report.forward_scan.as_deref(), Some("2"));
        assert!(report.is_consistent());

        let unknown = shortener.audit("zzz").await.unwrap();
        assert_eq!(unknown.reverse, None);
        assert!(unknown.is_consistent());
    }

    #[tokio::test]
    async fn test_audit_detects_clobbered_forward_entry() {
        let (store, shortener) = setup();
        shortener.shorten_many(&["a", "b"]).await.unwrap();
        // What an unserialised writer racing on short id 1 would leave behind.
        store.set(FORWARD_TABLE, "1", "b").await.unwrap();

        let report = shortener.audit("a").await.unwrap();
        assert_eq!(report.reverse, Some(1));
        assert_eq!(report.forward_scan, None);
        assert_eq!(report.forward_at_reverse.as_deref(), Some("b"));
        assert!(!report.is_consistent());
    }

    #[tokio::test]
    async fn test_failed_counter_write_keeps_mapping_one_to_one() {
        let store: Arc<dyn CacheStore> = Arc::new(FlakyCounterStore::new());
        let shortener = Shortener::new(Arc::clone(&store));

        assert!(shortener.shorten("A").await.is_err());
        assert!(store.entries(FORWARD_TABLE).await.unwrap().is_empty());
        assert!(store.entries(REVERSE_TABLE).await.unwrap().is_empty());

        let b = shortener.shorten("B").await.unwrap();
        let a = shortener.shorten("A").await.unwrap();
        assert_ne!(a, b);

        for (long_id, short) in [("A", a), ("B", b)] {
            assert_eq!(
                shortener.resolve_short_id(&short.to_string()).await.unwrap().as_deref(),
                Some(long_id)
            );
            assert!(shortener.audit(long_id).await.unwrap().is_consistent());
        }
    }

    #[tokio::test]
    async fn test_assignment_skips_taken_forward_slot() {
        let (store, shortener) = setup();
        // Left behind by an assignment whose counter write and rollback both failed.
        store.set(FORWARD_TABLE, "1", "stale").await.unwrap();

        assert_eq!(shortener.shorten("fresh").await.unwrap(), 2);
        assert_eq!(
            shortener.resolve_short_id("1").await.unwrap().as_deref(),
            Some("stale")
        );
        assert_eq!(
            shortener.resolve_short_id("2").await.unwrap().as_deref(),
            Some("fresh")
        );
        assert_eq!(shortener.stats().await.unwrap().last_assigned, 2);
    }
}
