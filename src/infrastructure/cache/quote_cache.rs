//! # Quote Cache
//!
//! TTL-governed cache façade over a [`CacheStore`] backend.
//!
//! Owns the namespace key formats, the jittered TTL policy, the three
//! explicit invalidation operations, and the event hooks fired when a
//! provider is disabled or the catalog is reloaded.

use crate::domain::value_objects::CountryCode;
use crate::infrastructure::cache::key;
use crate::infrastructure::cache::store::{
    CacheStore, CacheValue, CachedAggregate, CorridorSupport, ProviderMeta,
};
use crate::infrastructure::providers::registry::RegistryEvents;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// TTL policy for the three namespaces.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for aggregate quote entries.
    pub quote_ttl: Duration,
    /// TTL for corridor-support entries.
    pub corridor_ttl: Duration,
    /// TTL for provider metadata entries.
    pub provider_ttl: Duration,
    /// Upper bound of the uniform jitter added to every insert.
    pub jitter_max: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            quote_ttl: Duration::from_secs(1800),
            corridor_ttl: Duration::from_secs(43_200),
            provider_ttl: Duration::from_secs(86_400),
            jitter_max: Duration::from_secs(300),
        }
    }
}

/// Cache façade the coordinator talks to.
#[derive(Debug)]
pub struct QuoteCache {
    store: Arc<dyn CacheStore>,
    config: CacheConfig,
}

impl QuoteCache {
    /// Creates a cache over the given backend.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self { store, config }
    }

    /// `base + uniform(0, jitter_max)`, the stampede-spreading TTL.
    fn jittered(&self, base: Duration) -> Duration {
        let jitter_max = self.config.jitter_max.as_secs();
        if jitter_max == 0 {
            return base;
        }
        let jitter = rand::thread_rng().gen_range(0..=jitter_max);
        base + Duration::from_secs(jitter)
    }

    /// Fetches a live aggregate entry.
    pub async fn get_quote(&self, quote_key: &str) -> Option<CachedAggregate> {
        match self.store.get(quote_key).await {
            Some(CacheValue::Quote(aggregate)) => Some(*aggregate),
            _ => None,
        }
    }

    /// Stores an aggregate entry under the jittered quote TTL.
    pub async fn put_quote(&self, quote_key: String, aggregate: CachedAggregate) {
        let ttl = self.jittered(self.config.quote_ttl);
        self.store
            .set(quote_key, CacheValue::Quote(Box::new(aggregate)), ttl)
            .await;
    }

    /// Fetches a corridor-support verdict.
    pub async fn get_corridor(
        &self,
        source_country: CountryCode,
        dest_country: CountryCode,
    ) -> Option<bool> {
        match self
            .store
            .get(&key::corridor_key(source_country, dest_country))
            .await
        {
            Some(CacheValue::Corridor(support)) => Some(support.supported),
            _ => None,
        }
    }

    /// Stores a corridor-support verdict.
    pub async fn put_corridor(
        &self,
        source_country: CountryCode,
        dest_country: CountryCode,
        supported: bool,
    ) {
        let ttl = self.jittered(self.config.corridor_ttl);
        self.store
            .set(
                key::corridor_key(source_country, dest_country),
                CacheValue::Corridor(CorridorSupport { supported }),
                ttl,
            )
            .await;
    }

    /// Fetches provider metadata.
    pub async fn get_provider_meta(&self, provider_id: &str) -> Option<ProviderMeta> {
        match self.store.get(&key::provider_key(provider_id)).await {
            Some(CacheValue::Provider(meta)) => Some(meta),
            _ => None,
        }
    }

    /// Stores provider metadata.
    pub async fn put_provider_meta(&self, meta: ProviderMeta) {
        let ttl = self.jittered(self.config.provider_ttl);
        let cache_key = key::provider_key(&meta.provider_id);
        self.store.set(cache_key, CacheValue::Provider(meta), ttl).await;
    }

    /// Drops every aggregate quote entry.
    pub async fn invalidate_all_quotes(&self) -> usize {
        let removed = self.store.remove_prefix(key::QUOTE_PREFIX).await;
        info!(removed, "invalidated all quote cache entries");
        removed
    }

    /// Drops the corridor entry and all quote entries under the
    /// corridor prefix.
    pub async fn invalidate_corridor(
        &self,
        source_country: CountryCode,
        dest_country: CountryCode,
    ) -> usize {
        self.store
            .remove(&key::corridor_key(source_country, dest_country))
            .await;
        let removed = self
            .store
            .remove_prefix(&key::quote_corridor_prefix(source_country, dest_country))
            .await;
        info!(
            %source_country,
            %dest_country,
            removed,
            "invalidated corridor cache entries"
        );
        removed
    }

    /// Drops the provider entry plus every quote entry carrying that
    /// provider's data (prefix scan; no secondary index).
    pub async fn invalidate_provider(&self, provider_id: &str) -> usize {
        self.store.remove(&key::provider_key(provider_id)).await;

        let mut removed = 0;
        for quote_key in self.store.keys_with_prefix(key::QUOTE_PREFIX).await {
            let contains_provider = match self.store.get(&quote_key).await {
                Some(CacheValue::Quote(aggregate)) => aggregate
                    .all_providers
                    .iter()
                    .any(|q| q.provider_id == provider_id),
                _ => false,
            };
            if contains_provider && self.store.remove(&quote_key).await {
                removed += 1;
            }
        }
        info!(provider_id, removed, "invalidated provider cache entries");
        removed
    }

    /// Catalog-reload hook: country/currency semantics may have
    /// changed, so corridor verdicts and quote aggregates are stale.
    pub async fn catalog_reloaded(&self) {
        self.store.remove_prefix(key::QUOTE_PREFIX).await;
        self.store.remove_prefix(key::CORRIDOR_PREFIX).await;
        info!("catalog reloaded, quote and corridor caches flushed");
    }
}

/// Registry event sink that invalidates on provider disable.
///
/// The registry fires events from sync code; invalidation is async, so
/// the hook spawns onto the current runtime when one is available.
#[derive(Debug, Clone)]
pub struct CacheInvalidationHook {
    cache: Arc<QuoteCache>,
}

impl CacheInvalidationHook {
    /// Wraps a cache for registration via
    /// [`ProviderRegistry::set_events`](crate::infrastructure::providers::registry::ProviderRegistry::set_events).
    #[must_use]
    pub fn new(cache: Arc<QuoteCache>) -> Self {
        Self { cache }
    }
}

impl RegistryEvents for CacheInvalidationHook {
    fn provider_disabled(&self, provider_id: &str) {
        let cache = Arc::clone(&self.cache);
        let provider_id = provider_id.to_string();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                cache.invalidate_provider(&provider_id).await;
            });
        }
    }
}
