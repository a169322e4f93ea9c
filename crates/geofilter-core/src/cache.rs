// crates/geofilter-core/src/cache.rs

//! # TTL cache with an injectable clock
//!
//! An explicit store owned by the component that needs it. Expiry is checked
//! lazily on lookup; there is no background sweep. Negative results (a
//! lookup that produced nothing) are cached for the same TTL as hits.

use crate::common::Coordinate;
use crate::error::ErrorKind;
use crate::text::address_key;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Source of "now" for TTL decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-driven clock for deterministic expiry in tests and simulations.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A cached outcome: the value, or the reason there is none.
#[derive(Debug)]
pub enum Cached<T> {
    Hit(Arc<T>),
    Negative(ErrorKind),
}

impl<T> Clone for Cached<T> {
    fn clone(&self) -> Self {
        match self {
            Cached::Hit(v) => Cached::Hit(Arc::clone(v)),
            Cached::Negative(kind) => Cached::Negative(*kind),
        }
    }
}

#[derive(Debug)]
struct CacheEntry<T> {
    result: Cached<T>,
    stored_at: Instant,
}

/// Counters for observing cache behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
}

pub struct CacheStore<T> {
    entries: HashMap<String, CacheEntry<T>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    hits: u64,
    misses: u64,
    expired: u64,
}

impl<T> CacheStore<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            clock,
            hits: 0,
            misses: 0,
            expired: 0,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh entry for `key`. An expired entry is removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Cached<T>> {
        let now = self.clock.now();
        let fresh = match self.entries.get(key) {
            Some(entry) => now.saturating_duration_since(entry.stored_at) < self.ttl,
            None => {
                self.misses += 1;
                return None;
            }
        };

        if !fresh {
            self.entries.remove(key);
            self.expired += 1;
            self.misses += 1;
            return None;
        }

        self.hits += 1;
        self.entries.get(key).map(|entry| entry.result.clone())
    }

    /// Store a value and return the shared handle that was cached.
    pub fn insert(&mut self, key: String, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.store(key, Cached::Hit(Arc::clone(&value)));
        value
    }

    pub fn insert_negative(&mut self, key: String, kind: ErrorKind) {
        self.store(key, Cached::Negative(kind));
    }

    fn store(&mut self, key: String, result: Cached<T>) {
        let stored_at = self.clock.now();
        self.entries.insert(key, CacheEntry { result, stored_at });
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, including ones that expired but were not
    /// looked up since.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            expired: self.expired,
        }
    }
}

impl<T> std::fmt::Debug for CacheStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Forward-lookup key: trimmed, case-folded address.
pub fn forward_key(address: &str) -> String {
    address_key(address)
}

/// Reverse-lookup key: both values at six decimals.
///
/// ```rust
/// use geofilter_core::cache::reverse_key;
///
/// assert_eq!(reverse_key(32.0853, 34.7818), "32.085300,34.781800");
/// ```
pub fn reverse_key(lat: f64, lng: f64) -> String {
    Coordinate::new(lat, lng).to_string()
}
