use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::entities::rate_limit::RateLimitRecord;

/// Storage for per-identity rate-limit records.
///
/// The limiter serializes its read-compare-write sequence itself, so
/// implementations only need each call to be individually consistent.
pub trait CounterStore: Send + Sync {
    fn get(&self, key: &str) -> Option<RateLimitRecord>;

    fn set(&self, key: &str, record: RateLimitRecord);

    /// Removes every record whose window has elapsed. Returns how many were removed.
    fn sweep(&self, now: DateTime<Utc>, window: chrono::Duration) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store. Counters are lost on restart and are not shared
/// between instances.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    map: DashMap<String, RateLimitRecord>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for InMemoryCounterStore {
    fn get(&self, key: &str) -> Option<RateLimitRecord> {
        self.map.get(key).map(|entry| *entry.value())
    }

    fn set(&self, key: &str, record: RateLimitRecord) {
        self.map.insert(key.to_string(), record);
    }

    fn sweep(&self, now: DateTime<Utc>, window: chrono::Duration) -> usize {
        let before = self.map.len();
        self.map.retain(|_, record| !record.is_expired(now, window));
        before.saturating_sub(self.map.len())
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_removes_only_expired_records() {
        let store = InMemoryCounterStore::new();
        let now = Utc::now();
        let window = chrono::Duration::hours(1);

        store.set("old", RateLimitRecord::new(now - chrono::Duration::hours(2)));
        store.set("fresh", RateLimitRecord::new(now - chrono::Duration::minutes(5)));

        assert_eq!(store.sweep(now, window), 1);
        assert!(store.get("old").is_none());
        assert!(store.get("fresh").is_some());
        assert_eq!(store.len(), 1);
    }
}
