// ── TTL caches ──
//
// Age-based caches for video lookups. Entries expire purely by age; there
// is no size bound or background sweeper, expired entries are dropped on
// the next read of their key.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;

use awc_api::{LiveStatus, Video};

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Key -> value cache with a single time-to-live.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: DashMap<String, CacheEntry<V>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: DashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, evicting it if it has aged out.
    pub fn get(&self, key: &str) -> Option<V> {
        self.entries
            .remove_if(key, |_, entry| entry.stored_at.elapsed() >= self.ttl);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of stored entries, including any not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Default lifetime of a live-status answer.
pub const DEFAULT_LIVE_TTL: Duration = Duration::from_secs(60);
/// Default lifetime of a video list.
pub const DEFAULT_LIST_TTL: Duration = Duration::from_secs(10 * 60);

/// Caches owned by one [`VideoService`](super::VideoService).
///
/// Live status changes often and gets a short TTL; video lists get a long
/// one.
#[derive(Debug)]
pub struct VideoCache {
    pub(crate) live: TtlCache<LiveStatus>,
    pub(crate) lists: TtlCache<Arc<Vec<Video>>>,
}

impl Default for VideoCache {
    fn default() -> Self {
        Self::new(DEFAULT_LIVE_TTL, DEFAULT_LIST_TTL)
    }
}

impl VideoCache {
    pub fn new(live_ttl: Duration, list_ttl: Duration) -> Self {
        Self {
            live: TtlCache::new(live_ttl),
            lists: TtlCache::new(list_ttl),
        }
    }

    /// Drop every cached answer.
    pub fn clear(&self) {
        self.live.clear();
        self.lists.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty() && self.lists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn entries_expire_by_age() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("live", 1_u32);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("live"), Some(1));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("live"), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn reinsert_restarts_the_clock() {
        let cache = TtlCache::new(Duration::from_secs(10));
        cache.insert("k", "a");
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.insert("k", "b");
        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(cache.get("k"), Some("b"));
    }

    #[tokio::test]
    async fn zero_ttl_never_hits() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("k", 1_u8);
        assert_eq!(cache.get("k"), None);
    }

    #[tokio::test]
    async fn clear_empties_both_caches() {
        let cache = VideoCache::default();
        cache.live.insert("live", LiveStatus::offline());
        cache.lists.insert("recent:5", Arc::new(Vec::new()));
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
