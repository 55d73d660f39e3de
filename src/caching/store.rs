//! # TTL Response Cache
//!
//! In-memory key/value store with a fixed per-entry time-to-live and lazy
//! expiry. An expired entry behaves exactly as an absent one; it is removed
//! opportunistically when a read observes it, never by a background sweep.
//!
//! Concurrency contract: `get` and `set` on the same key interleave safely
//! with last-write-wins semantics. The cache performs no single-flight
//! de-duplication: two concurrent misses for the same key may both reach the
//! upstream and overwrite each other, which is consistent with TTL-cache
//! semantics and accepted by design.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

/// A single cached payload with its expiry deadline
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: Value, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of stored entries (expired entries may still be counted until
    /// a read purges them)
    pub entries: usize,

    /// Number of hits
    pub hits: u64,

    /// Number of misses
    pub misses: u64,
}

/// TTL-bounded response cache
///
/// Constructed empty at startup and dependency-injected into handlers; one
/// instance per process. All entries share the TTL fixed at construction.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResponseCache {
    /// Create an empty cache where every entry lives for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get the stored value for `key` if present and not expired
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                drop(entry);
                // Lazy expiry: purge on observation
                self.entries.remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key, "cache entry expired");
                return None;
            }

            let value = entry.value.clone();
            self.hits.fetch_add(1, Ordering::Relaxed);
            Some(value)
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            None
        }
    }

    /// Store `value` under `key`, overwriting any prior entry and resetting
    /// its TTL
    pub fn set(&self, key: &str, value: Value) {
        self.entries
            .insert(key.to_string(), CacheEntry::new(value, self.ttl));
    }

    /// Whether `get` would currently return a value for `key`
    ///
    /// Does not count towards hit/miss statistics.
    pub fn has(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
