//! Generic TTL cache for API responses.
//!
//! Expiry is lazy: `get` evicts a stale entry when it sees one. A background
//! sweeper ([`TtlCache::spawn_sweeper`]) additionally drops stale entries on
//! a fixed interval so a long-lived process does not accumulate them.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Key/value cache with per-entry absolute expiry.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Deterministic key for `path` plus query parameters.
    ///
    /// Parameters are sorted by name and joined as `k=v&k=v`, so the same
    /// request with differently-ordered parameters maps to the same entry.
    pub fn generate_key<K, P>(path: &str, params: impl IntoIterator<Item = (K, P)>) -> String
    where
        K: Into<String>,
        P: Display,
    {
        let sorted: BTreeMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.into(), v.to_string()))
            .collect();

        if sorted.is_empty() {
            return path.to_string();
        }

        let query = sorted
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        format!("{path}?{query}")
    }

    /// The stored value if it has not expired. A stale entry is evicted.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                None => return None,
                Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // Re-check: a writer may have refreshed the entry in between.
        if entries.get(key).is_some_and(|e| now >= e.expires_at) {
            entries.remove(key);
        }
        entries
            .get(key)
            .filter(|e| now < e.expires_at)
            .map(|e| e.value.clone())
    }

    /// Store with the default TTL, replacing any existing entry.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), entry);
    }

    /// Remove one entry, or everything when `key` is `None`.
    pub fn clear(&self, key: Option<&str>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match key {
            Some(key) => {
                entries.remove(key);
            }
            None => entries.clear(),
        }
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn clear_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, e| now < e.expires_at);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Sweep expired entries every `interval` on the current tokio runtime.
    ///
    /// The task holds only a weak reference and exits once the cache is
    /// dropped. Must be called from within a runtime.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                let removed = cache.clear_expired();
                if removed > 0 {
                    debug!(removed, remaining = cache.len(), "Swept expired cache entries");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("/products/1", 42);
        assert_eq!(cache.get("/products/1"), Some(42));
        assert_eq!(cache.get("/products/2"), None);
    }

    #[test]
    fn test_expired_entry_is_evicted_on_get() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set_with_ttl("k", "v", Duration::from_millis(20));
        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("k", 1);
        cache.set("k", 2);
        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear_one_or_all() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);
        cache.clear(Some("a"));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        cache.clear(None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_expired_keeps_fresh_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set_with_ttl("stale", 1, Duration::ZERO);
        cache.set("fresh", 2);
        assert_eq!(cache.clear_expired(), 1);
        assert_eq!(cache.get("fresh"), Some(2));
    }

    #[test]
    fn test_key_is_order_independent() {
        let a = TtlCache::<()>::generate_key("/x", [("a", 1), ("b", 2)]);
        let b = TtlCache::<()>::generate_key("/x", [("b", 2), ("a", 1)]);
        assert_eq!(a, b);
        assert_eq!(a, "/x?a=1&b=2");
    }

    #[test]
    fn test_key_without_params_is_path() {
        let key = TtlCache::<()>::generate_key("/products/all", Vec::<(&str, u32)>::new());
        assert_eq!(key, "/products/all");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_stale_entries() {
        let cache = Arc::new(TtlCache::new(Duration::from_secs(60)));
        cache.set_with_ttl("stale", 1, Duration::ZERO);
        let handle = cache.spawn_sweeper(Duration::from_secs(600));

        tokio::time::sleep(Duration::from_secs(601)).await;
        tokio::task::yield_now().await;
        assert!(cache.is_empty());

        drop(cache);
        tokio::time::sleep(Duration::from_secs(601)).await;
        assert!(handle.await.is_ok());
    }
}
