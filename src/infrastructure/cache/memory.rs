//! # In-Memory Cache Store
//!
//! Process-local [`CacheStore`] backend over a concurrent map.
//!
//! Entries carry their expiry instant; reads treat expired entries as
//! absent and evict them lazily.

use crate::infrastructure::cache::store::{CacheStore, CacheValue};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct StoredEntry {
    value: CacheValue,
    expires_at: Instant,
}

impl StoredEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-process cache backend.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: DashMap<String, StoredEntry>,
}

impl InMemoryCacheStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries (expired entries excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| !e.value().is_expired()).count()
    }

    /// True when no live entries remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Option<CacheValue> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_expired() => true,
            Some(entry) => return Some(entry.value.clone()),
            None => return None,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    async fn set(&self, key: String, value: CacheValue, ttl: Duration) {
        self.entries.insert(
            key,
            StoredEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    async fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    async fn remove_prefix(&self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before - self.entries.len()
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.key().starts_with(prefix) && !e.value().is_expired())
            .map(|e| e.key().clone())
            .collect()
    }
}
