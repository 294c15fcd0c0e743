//! Process-wide cache-aside lookup layer.
//!
//! Every component that reads from a backing store (theme registry, menu store,
//! post-type store) goes through [`LookupCache::get_or_compute`]: a cached,
//! unexpired value is returned as-is; otherwise the compute closure runs, its
//! value is stored with the given TTL, and returned. A failing compute caches
//! nothing and the error propagates.
//!
//! Mutations evict with [`LookupCache::evict`] using the same [`CacheKey`] the
//! reader used, so the next read recomputes.
//!
//! # Concurrency
//!
//! The map is a [`DashMap`] shared through an [`Arc`]; cloning a `LookupCache`
//! hands out another handle to the same storage. No lock is held while
//! `compute` runs, so concurrent callers missing on the same key may each
//! recompute it. That redundant work is accepted for read-mostly workloads and
//! lets compute closures use the cache themselves without deadlocking.
//!
//! # Examples
//!
//! ```rust
//! use stagehand_cli::cache::{CacheKey, LookupCache};
//! use std::time::Duration;
//!
//! let cache = LookupCache::new();
//! let names: Result<Vec<String>, std::convert::Infallible> =
//!     cache.get_or_compute(&CacheKey::InstalledThemes, Duration::from_secs(60), || {
//!         Ok(vec!["aurora".to_string()])
//!     });
//! assert_eq!(names.unwrap(), vec!["aurora".to_string()]);
//!
//! cache.evict(&CacheKey::InstalledThemes);
//! ```

pub mod keys;

pub use keys::{CacheKey, POST_TYPE_PREFIX};

use dashmap::DashMap;
use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// One stored value with its expiry.
#[derive(Clone)]
struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Hit/miss counters for a cache handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Calculate hit rate as a percentage
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Shared TTL cache keyed by [`CacheKey`].
#[derive(Clone, Default)]
pub struct LookupCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
}

impl std::fmt::Debug for LookupCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupCache")
            .field("entries", &self.entries.len())
            .field("stats", &self.stats())
            .finish()
    }
}

impl LookupCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// A stored value of a different type than `T` is treated as a miss and
    /// overwritten.
    ///
    /// # Errors
    ///
    /// Returns whatever `compute` returns; nothing is cached in that case.
    pub fn get_or_compute<T, E, F>(&self, key: &CacheKey, ttl: Duration, compute: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.get::<T>(key) {
            return Ok(value);
        }

        let value = compute()?;
        self.insert(key, value.clone(), ttl);
        Ok(value)
    }

    /// Read a fresh value without computing. Expired entries are dropped.
    #[must_use]
    pub fn get<T>(&self, key: &CacheKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let storage_key = key.as_key();
        let now = Instant::now();

        // Clone out of the shard guard before doing anything else with the map.
        let entry = self.entries.get(&storage_key).map(|entry| entry.value().clone());

        match entry {
            Some(entry) if entry.is_fresh(now) => {
                if let Some(value) = entry.value.downcast_ref::<T>() {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    tracing::trace!(key = %storage_key, "cache hit");
                    return Some(value.clone());
                }
                tracing::debug!(
                    key = %storage_key,
                    "cache entry has unexpected type, treating as miss"
                );
            }
            Some(_) => {
                tracing::trace!(key = %storage_key, "cache entry expired");
                self.entries.remove_if(&storage_key, |_, entry| !entry.is_fresh(now));
            }
            None => {}
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(key = %storage_key, "cache miss");
        None
    }

    /// Store a value for `ttl`, replacing any previous entry.
    pub fn insert<T>(&self, key: &CacheKey, value: T, ttl: Duration)
    where
        T: Send + Sync + 'static,
    {
        let expires_at = Instant::now() + ttl;
        self.entries.insert(
            key.as_key(),
            CacheEntry {
                value: Arc::new(value),
                expires_at,
            },
        );
    }

    /// Remove the entry for `key`. Returns whether an entry existed.
    pub fn evict(&self, key: &CacheKey) -> bool {
        let removed = self.entries.remove(&key.as_key()).is_some();
        tracing::debug!(key = %key, removed, "cache evict");
        removed
    }

    /// Remove every entry whose key starts with `prefix`. Returns how many were removed.
    pub fn evict_prefix(&self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before.saturating_sub(self.entries.len());
        tracing::debug!(prefix, removed, "cache evict by prefix");
        removed
    }

    /// Drop all expired entries.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now));
        before.saturating_sub(self.entries.len())
    }

    /// Remove everything and reset statistics.
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Whether a fresh entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        let now = Instant::now();
        self.entries.get(&key.as_key()).is_some_and(|entry| entry.is_fresh(now))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
