//! # Cache Store Port
//!
//! Backend-agnostic keyed store with TTL semantics, plus the typed
//! values the aggregator caches. The default backend is in-process
//! ([`super::memory::InMemoryCacheStore`]); the trait keeps the door
//! open for an external KV.

use crate::domain::entities::aggregate::{FiltersApplied, ProviderFailure};
use crate::domain::entities::quote::Quote;
use crate::domain::entities::request::RequestSummary;
use crate::domain::value_objects::Timestamp;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// An aggregate stripped of its volatile fields for storage.
///
/// `elapsed_ms`, `cache_hit`, and the top-level `timestamp` are
/// recomputed when the entry is served; per-quote timestamps keep the
/// moment each quote was actually normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedAggregate {
    /// Echo of the request that produced this aggregate.
    pub request: RequestSummary,
    /// Filters in force when `quotes` was produced.
    pub filters_applied: FiltersApplied,
    /// One quote per queried provider, registry order.
    pub all_providers: Vec<Quote>,
    /// Filtered, sorted successful quotes.
    pub quotes: Vec<Quote>,
    /// Failure detail per failed provider.
    pub errors: BTreeMap<String, ProviderFailure>,
    /// When the entry was stored.
    pub stored_at: Timestamp,
}

/// Corridor-support verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorridorSupport {
    /// True when at least one provider serves the corridor.
    pub supported: bool,
}

/// Cached provider metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMeta {
    /// Stable provider id.
    pub provider_id: String,
    /// Enable flag at stamp time.
    pub enabled: bool,
}

/// Tagged value union across the three namespaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CacheValue {
    /// `v1:fee:*` entry.
    Quote(Box<CachedAggregate>),
    /// `corridor:*` entry.
    Corridor(CorridorSupport),
    /// `provider:*` entry.
    Provider(ProviderMeta),
}

/// Backend-agnostic keyed store with per-entry TTLs.
///
/// Expired entries must behave as absent on read; eager eviction is a
/// backend concern.
#[async_trait]
pub trait CacheStore: Send + Sync + fmt::Debug {
    /// Fetches a live entry.
    async fn get(&self, key: &str) -> Option<CacheValue>;

    /// Stores an entry, replacing any previous value under the key.
    async fn set(&self, key: String, value: CacheValue, ttl: Duration);

    /// Removes one entry; true when something was removed.
    async fn remove(&self, key: &str) -> bool;

    /// Removes every entry whose key starts with `prefix`; returns the
    /// number removed.
    async fn remove_prefix(&self, prefix: &str) -> usize;

    /// Lists live keys under a prefix (used by secondary-index style
    /// invalidation scans).
    async fn keys_with_prefix(&self, prefix: &str) -> Vec<String>;
}
