//! Time-based cache for provider responses
//!
//! A single shared cache keyed by operation-qualified strings, with one
//! fixed TTL applied uniformly at insert. Entries are immutable snapshots;
//! `get` hands out clones and treats expired entries as absent. There is no
//! explicit invalidation, and a miss race between two requests may fetch
//! upstream twice.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

/// Clock abstraction so cache expiry is testable with a manual clock
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct Entry {
    value: serde_json::Value,
    expires_at: DateTime<Utc>,
}

/// Shared cache with a fixed time-to-live per entry
pub struct TtlCache {
    entries: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TtlCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Look up a fresh entry; expired entries read as misses. A poisoned
    /// lock is recovered: entries are full immutable snapshots, so the
    /// map stays consistent after a panic elsewhere.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(key)?;
        if entry.expires_at <= self.clock.now() {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Insert a snapshot, replacing any previous entry for the key
    pub fn insert(&self, key: &str, value: serde_json::Value) {
        let expires_at = self.clock.now() + self.ttl;
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), Entry { value, expires_at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poisoned_lock_does_not_wedge_the_cache() {
        let cache = Arc::new(TtlCache::new(
            Duration::hours(1),
            Arc::new(SystemClock),
        ));
        cache.insert("coords:Oslo", serde_json::json!(1));

        // Panic a thread while it holds the write lock
        let poisoner = Arc::clone(&cache);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.write().unwrap();
            panic!("simulated handler panic");
        })
        .join();
        assert!(cache.entries.is_poisoned());

        // Reads and writes still go through afterwards
        assert_eq!(cache.get("coords:Oslo"), Some(serde_json::json!(1)));
        cache.insert("coords:Oslo", serde_json::json!(2));
        assert_eq!(cache.get("coords:Oslo"), Some(serde_json::json!(2)));
    }
}
