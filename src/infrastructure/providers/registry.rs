//! # Provider Registry & Factory
//!
//! Ordered list of adapter constructors with per-provider enable flags.
//!
//! Registration happens once at process start; after that the registry
//! is read-mostly, with an exclusive lock only around the enable-flag
//! mutations. `active_ids` is the single source of fan-out ordering:
//! `all_providers` in every aggregate preserves this order.

use crate::infrastructure::providers::context::AdapterContext;
use crate::infrastructure::providers::traits::ProviderAdapter;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Constructor for one adapter, bound at registration time.
pub type AdapterConstructor =
    Arc<dyn Fn(&AdapterContext) -> Arc<dyn ProviderAdapter> + Send + Sync>;

/// Errors from registry lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No adapter registered under this id.
    #[error("unknown provider: {id}")]
    UnknownProvider {
        /// The requested id.
        id: String,
    },
}

/// Sink for registry lifecycle events the cache listens to.
pub trait RegistryEvents: Send + Sync {
    /// Fired when a provider is disabled.
    fn provider_disabled(&self, provider_id: &str);
}

struct RegistryEntry {
    id: &'static str,
    display_name: &'static str,
    constructor: AdapterConstructor,
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Ordered adapter registry with enable/disable flags.
pub struct ProviderRegistry {
    context: AdapterContext,
    entries: Vec<RegistryEntry>,
    enabled: RwLock<HashMap<&'static str, bool>>,
    events: RwLock<Option<Arc<dyn RegistryEvents>>>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl ProviderRegistry {
    /// Creates an empty registry over the given adapter context.
    #[must_use]
    pub fn new(context: AdapterContext) -> Self {
        Self {
            context,
            entries: Vec::new(),
            enabled: RwLock::new(HashMap::new()),
            events: RwLock::new(None),
        }
    }

    /// Registers an adapter constructor. Order of registration is the
    /// fan-out order.
    pub fn register(
        &mut self,
        id: &'static str,
        display_name: &'static str,
        constructor: AdapterConstructor,
    ) {
        self.entries.push(RegistryEntry {
            id,
            display_name,
            constructor,
        });
        if let Ok(mut enabled) = self.enabled.write() {
            enabled.insert(id, true);
        }
    }

    /// Attaches the event sink fired on enable-flag mutations.
    pub fn set_events(&self, events: Arc<dyn RegistryEvents>) {
        if let Ok(mut slot) = self.events.write() {
            *slot = Some(events);
        }
    }

    /// All registered ids, registration order.
    #[must_use]
    pub fn list_ids(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.id).collect()
    }

    /// All `(id, display_name)` pairs, registration order.
    #[must_use]
    pub fn display_names(&self) -> Vec<(&'static str, &'static str)> {
        self.entries
            .iter()
            .map(|e| (e.id, e.display_name))
            .collect()
    }

    /// Display name for one id.
    #[must_use]
    pub fn display_name(&self, id: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.display_name)
    }

    /// Instantiates the adapter registered under `id`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownProvider`] when no such id exists.
    pub fn build(&self, id: &str) -> Result<Arc<dyn ProviderAdapter>, RegistryError> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| (e.constructor)(&self.context))
            .ok_or_else(|| RegistryError::UnknownProvider { id: id.to_string() })
    }

    /// Returns true unless the provider has been disabled.
    #[must_use]
    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled
            .read()
            .map(|flags| flags.get(id).copied().unwrap_or(false))
            .unwrap_or(false)
    }

    /// Flips a provider's enable flag. Disabling fires the event sink
    /// so dependent caches can invalidate.
    pub fn set_enabled(&self, id: &str, enabled: bool) {
        let Some(entry_id) = self.entries.iter().find(|e| e.id == id).map(|e| e.id) else {
            return;
        };
        if let Ok(mut flags) = self.enabled.write() {
            flags.insert(entry_id, enabled);
        }
        if !enabled {
            if let Ok(events) = self.events.read() {
                if let Some(sink) = events.as_ref() {
                    sink.provider_disabled(id);
                }
            }
        }
    }

    /// Active ids for a fan-out: start from all registered ids in
    /// order; when `include` is non-empty keep only its members;
    /// subtract `exclude`; subtract disabled providers.
    #[must_use]
    pub fn active_ids(
        &self,
        include: Option<&BTreeSet<String>>,
        exclude: &BTreeSet<String>,
    ) -> Vec<&'static str> {
        self.entries
            .iter()
            .map(|e| e.id)
            .filter(|id| match include {
                Some(set) if !set.is_empty() => set.contains(*id),
                _ => true,
            })
            .filter(|id| !exclude.contains(*id))
            .filter(|id| self.is_enabled(id))
            .collect()
    }

    /// Builds every active adapter, preserving order.
    #[must_use]
    pub fn build_active(
        &self,
        include: Option<&BTreeSet<String>>,
        exclude: &BTreeSet<String>,
    ) -> Vec<Arc<dyn ProviderAdapter>> {
        self.active_ids(include, exclude)
            .into_iter()
            .filter_map(|id| self.build(id).ok())
            .collect()
    }

    /// The shared adapter context.
    #[must_use]
    pub fn context(&self) -> &AdapterContext {
        &self.context
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::catalog::Catalog;
    use crate::domain::entities::request::QuoteRequest;
    use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
    use crate::infrastructure::providers::traits::{Deadline, RawQuote};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct NullAdapter {
        id: &'static str,
    }

    #[async_trait]
    impl ProviderAdapter for NullAdapter {
        fn id(&self) -> &'static str {
            self.id
        }

        fn display_name(&self) -> &'static str {
            "Null"
        }

        async fn fetch_quote(
            &self,
            _request: &QuoteRequest,
            _deadline: Deadline,
        ) -> ProviderResult<RawQuote> {
            Err(ProviderError::internal("not implemented"))
        }
    }

    fn registry_with(ids: &[&'static str]) -> ProviderRegistry {
        let context = AdapterContext::new(Arc::new(Catalog::new())).unwrap();
        let mut registry = ProviderRegistry::new(context);
        for id in ids {
            let captured = *id;
            let adapter: Arc<dyn ProviderAdapter> = Arc::new(NullAdapter { id: captured });
            registry.register(captured, "Null", Arc::new(move |_ctx| Arc::clone(&adapter)));
        }
        registry
    }

    #[test]
    fn list_ids_preserves_registration_order() {
        let registry = registry_with(&["wise", "xe", "remitbee"]);
        assert_eq!(registry.list_ids(), vec!["wise", "xe", "remitbee"]);
    }

    #[test]
    fn build_unknown_provider_fails() {
        let registry = registry_with(&["wise"]);
        assert!(matches!(
            registry.build("nope"),
            Err(RegistryError::UnknownProvider { .. })
        ));
        assert!(registry.build("wise").is_ok());
    }

    #[test]
    fn active_ids_intersects_include() {
        let registry = registry_with(&["wise", "xe", "remitbee"]);
        let include: BTreeSet<String> = ["xe".to_string(), "wise".to_string()].into();
        let active = registry.active_ids(Some(&include), &BTreeSet::new());
        assert_eq!(active, vec!["wise", "xe"]);
    }

    #[test]
    fn active_ids_subtracts_exclude_and_disabled() {
        let registry = registry_with(&["wise", "xe", "remitbee"]);
        registry.set_enabled("remitbee", false);
        let exclude: BTreeSet<String> = ["xe".to_string()].into();
        let active = registry.active_ids(None, &exclude);
        assert_eq!(active, vec!["wise"]);
    }

    #[test]
    fn empty_include_means_all() {
        let registry = registry_with(&["wise", "xe"]);
        let empty = BTreeSet::new();
        let active = registry.active_ids(Some(&empty), &BTreeSet::new());
        assert_eq!(active, vec!["wise", "xe"]);
    }

    #[test]
    fn disable_fires_event_sink() {
        struct CountingSink(AtomicUsize);
        impl RegistryEvents for CountingSink {
            fn provider_disabled(&self, _provider_id: &str) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let registry = registry_with(&["wise"]);
        let sink = Arc::new(CountingSink(AtomicUsize::new(0)));
        registry.set_events(sink.clone());

        registry.set_enabled("wise", false);
        assert_eq!(sink.0.load(Ordering::SeqCst), 1);

        // Re-enabling does not fire the sink.
        registry.set_enabled("wise", true);
        assert_eq!(sink.0.load(Ordering::SeqCst), 1);

        // Unknown ids are ignored.
        registry.set_enabled("ghost", false);
        assert_eq!(sink.0.load(Ordering::SeqCst), 1);
    }
}
