//! Bounded TTL cache for fetched exchange rates.
//!
//! Entries expire after a fixed TTL and the cache holds at most a fixed
//! number of keys, evicting the least recently inserted one first. Only
//! successful fetches are cached; failures are never remembered, so the
//! next lookup tries the network again.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;

/// Maximum number of cached rate keys.
pub const DEFAULT_CAPACITY: usize = 16;

/// How long a cached rate stays valid.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
struct CacheEntry {
    key: String,
    rate: Decimal,
    inserted_at: Instant,
}

/// Insertion-ordered rate cache with TTL expiry and a capacity bound.
#[derive(Debug, Clone)]
pub struct RateCache {
    capacity: usize,
    ttl: Duration,
    entries: VecDeque<CacheEntry>,
}

impl RateCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            entries: VecDeque::new(),
        }
    }

    pub fn get(&mut self, key: &str) -> Option<Decimal> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&mut self, key: impl Into<String>, rate: Decimal) {
        self.insert_at(key, rate, Instant::now());
    }

    /// Look up a key as of `now`. An expired entry is removed and reported
    /// as a miss.
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<Decimal> {
        let idx = self.entries.iter().position(|e| e.key == key)?;
        let entry = &self.entries[idx];
        if now.duration_since(entry.inserted_at) >= self.ttl {
            self.entries.remove(idx);
            return None;
        }
        Some(entry.rate)
    }

    /// Store a rate as of `now`, replacing any entry under the same key.
    /// When full, the least recently inserted entry is dropped.
    pub fn insert_at(&mut self, key: impl Into<String>, rate: Decimal, now: Instant) {
        let key = key.into();
        if let Some(idx) = self.entries.iter().position(|e| e.key == key) {
            self.entries.remove(idx);
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(CacheEntry {
            key,
            rate,
            inserted_at: now,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RateCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn hit_within_ttl() {
        let mut cache = RateCache::default();
        let t0 = Instant::now();
        cache.insert_at("usd", dec!(36.58), t0);

        let almost = t0 + DEFAULT_TTL - Duration::from_millis(1);
        assert_eq!(cache.get_at("usd", almost), Some(dec!(36.58)));
    }

    #[test]
    fn entry_expires_at_ttl_and_is_dropped() {
        let mut cache = RateCache::default();
        let t0 = Instant::now();
        cache.insert_at("usd", dec!(36.58), t0);

        assert_eq!(cache.get_at("usd", t0 + DEFAULT_TTL), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn unknown_key_misses() {
        let mut cache = RateCache::default();
        assert_eq!(cache.get_at("usd", Instant::now()), None);
    }

    #[test]
    fn capacity_evicts_least_recently_inserted() {
        let mut cache = RateCache::new(2, DEFAULT_TTL);
        let t0 = Instant::now();
        cache.insert_at("a", dec!(1), t0);
        cache.insert_at("b", dec!(2), t0);
        cache.insert_at("c", dec!(3), t0);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_at("a", t0), None);
        assert_eq!(cache.get_at("b", t0), Some(dec!(2)));
        assert_eq!(cache.get_at("c", t0), Some(dec!(3)));
    }

    #[test]
    fn reinsert_refreshes_value_and_insertion_order() {
        let mut cache = RateCache::new(2, DEFAULT_TTL);
        let t0 = Instant::now();
        cache.insert_at("a", dec!(1), t0);
        cache.insert_at("b", dec!(2), t0);
        cache.insert_at("a", dec!(1.5), t0 + Duration::from_secs(1));
        cache.insert_at("c", dec!(3), t0 + Duration::from_secs(2));

        // "b" was the least recently inserted once "a" got refreshed.
        assert_eq!(cache.get_at("b", t0 + Duration::from_secs(2)), None);
        assert_eq!(cache.get_at("a", t0 + Duration::from_secs(2)), Some(dec!(1.5)));
    }

    #[test]
    fn reads_do_not_extend_lifetime() {
        let mut cache = RateCache::default();
        let t0 = Instant::now();
        cache.insert_at("usd", dec!(36.58), t0);
        let mid = t0 + DEFAULT_TTL / 2;
        assert!(cache.get_at("usd", mid).is_some());
        assert_eq!(cache.get_at("usd", t0 + DEFAULT_TTL), None);
    }
}
