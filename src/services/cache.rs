use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Small TTL + key-based in-memory cache, used for the filter-options
/// distincts and featured-company listings. Not Redis-backed: both caches
/// live in process memory and are invalidated explicitly by the handful of
/// mutations that affect their payload.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().unwrap();
        entries.get(key).and_then(|(stored_at, value)| {
            if stored_at.elapsed() < self.ttl {
                Some(value.clone())
            } else {
                None
            }
        })
    }

    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key, (Instant::now(), value));
    }

    /// Drops every entry. Called by mutations whose effect the cache might
    /// otherwise serve stale (adding/removing a featured company, a job or
    /// company create/update that changes the filter-options distincts).
    pub fn invalidate_all(&self) {
        let mut entries = self.entries.lock().unwrap();
        entries.clear();
    }

    pub fn invalidate(&self, key: &K) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_retrieves_within_ttl() {
        let cache: TtlCache<String, i32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
    }

    #[test]
    fn expires_after_ttl() {
        let cache: TtlCache<String, i32> = TtlCache::new(Duration::from_millis(1));
        cache.insert("a".to_string(), 1);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(&"a".to_string()), None);
    }

    #[test]
    fn invalidate_all_clears_every_key() {
        let cache: TtlCache<String, i32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        cache.invalidate_all();
        assert_eq!(cache.get(&"a".to_string()), None);
        assert_eq!(cache.get(&"b".to_string()), None);
    }

    #[test]
    fn invalidate_single_key_leaves_others() {
        let cache: TtlCache<String, i32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        cache.invalidate(&"a".to_string());
        assert_eq!(cache.get(&"a".to_string()), None);
        assert_eq!(cache.get(&"b".to_string()), Some(2));
    }
}
