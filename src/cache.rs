//! In-memory stats cache keyed by normalized handle.
//!
//! Entries expire lazily: the TTL is checked on read and stale entries are
//! dropped then. With a capacity set, inserting into a full cache evicts
//! expired entries first and then the least recently used one. A zero TTL
//! disables caching.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::FetchedStats;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub capacity: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 60,
            capacity: Some(10_000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CachedStats {
    pub fetched: FetchedStats,
    pub fetched_at: Instant,
}

struct CacheEntry {
    fetched: FetchedStats,
    fetched_at: Instant,
    last_access: Instant,
}

pub struct StatsCache {
    ttl: Duration,
    capacity: Option<usize>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl StatsCache {
    pub fn new(ttl: Duration, capacity: Option<usize>) -> Self {
        Self {
            ttl,
            capacity: capacity.filter(|value| *value > 0),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(Duration::from_secs(config.ttl_secs), config.capacity)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get(&self, key: &str) -> Option<CachedStats> {
        if self.ttl.is_zero() {
            return None;
        }
        let mut guard = self.entries.lock().await;
        let expired = match guard.get_mut(key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => {
                entry.last_access = Instant::now();
                return Some(CachedStats {
                    fetched: entry.fetched.clone(),
                    fetched_at: entry.fetched_at,
                });
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            guard.remove(key);
        }
        None
    }

    /// Stores stats with the current instant as their fetch time.
    pub async fn put(&self, key: String, fetched: FetchedStats) {
        if self.ttl.is_zero() {
            return;
        }
        let now = Instant::now();
        let mut guard = self.entries.lock().await;

        if let Some(capacity) = self.capacity {
            if !guard.contains_key(&key) && guard.len() >= capacity {
                let ttl = self.ttl;
                guard.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
                while guard.len() >= capacity {
                    let oldest = guard
                        .iter()
                        .min_by_key(|(_, entry)| entry.last_access)
                        .map(|(key, _)| key.clone());
                    match oldest {
                        Some(oldest) => {
                            guard.remove(&oldest);
                        }
                        None => break,
                    }
                }
            }
        }

        guard.insert(
            key,
            CacheEntry {
                fetched,
                fetched_at: now,
                last_access: now,
            },
        );
    }

    /// Number of stored entries, including ones that have expired but were not read yet.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
