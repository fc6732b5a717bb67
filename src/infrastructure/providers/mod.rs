//! # Provider Execution Infrastructure
//!
//! The uniform adapter contract, typed errors, shared HTTP plumbing,
//! payload conversion helpers, the registry/factory, and the concrete
//! provider adapters.

pub mod adapters;
pub mod context;
pub mod convert;
pub mod error;
pub mod http;
pub mod registry;
pub mod traits;

pub use context::AdapterContext;
pub use error::{ProviderError, ProviderResult};
pub use http::HttpClient;
pub use registry::{ProviderRegistry, RegistryError, RegistryEvents};
pub use traits::{Deadline, ProviderAdapter, RawQuote};

use std::sync::Arc;

/// Builds the registry with every shipped adapter, in the fan-out
/// order quotes are reported in.
#[must_use]
pub fn default_registry(context: AdapterContext) -> ProviderRegistry {
    use adapters::{
        DahabshiilAdapter, IntermexAdapter, KoronaPayAdapter, PaysendAdapter, RemitbeeAdapter,
        SingXAdapter, TransferGoAdapter, WesternUnionAdapter, WiseAdapter, XeAdapter,
    };

    fn constructor<A, F>(build: F) -> registry::AdapterConstructor
    where
        A: ProviderAdapter + 'static,
        F: Fn(&AdapterContext) -> A + Send + Sync + 'static,
    {
        Arc::new(move |ctx: &AdapterContext| -> Arc<dyn ProviderAdapter> { Arc::new(build(ctx)) })
    }

    let mut registry = ProviderRegistry::new(context);
    registry.register("xe", "XE", constructor(|ctx| XeAdapter::new(ctx.clone())));
    registry.register("wise", "Wise", constructor(|ctx| WiseAdapter::new(ctx.clone())));
    registry.register(
        "transfergo",
        "TransferGo",
        constructor(|ctx| TransferGoAdapter::new(ctx.clone())),
    );
    registry.register(
        "westernunion",
        "Western Union",
        constructor(|ctx| WesternUnionAdapter::new(ctx.clone())),
    );
    registry.register("singx", "SingX", constructor(|ctx| SingXAdapter::new(ctx.clone())));
    registry.register(
        "paysend",
        "Paysend",
        constructor(|ctx| PaysendAdapter::new(ctx.clone())),
    );
    registry.register(
        "remitbee",
        "Remitbee",
        constructor(|ctx| RemitbeeAdapter::new(ctx.clone())),
    );
    registry.register(
        "koronapay",
        "KoronaPay",
        constructor(|ctx| KoronaPayAdapter::new(ctx.clone())),
    );
    registry.register(
        "dahabshiil",
        "Dahabshiil",
        constructor(|ctx| DahabshiilAdapter::new(ctx.clone())),
    );
    registry.register(
        "intermex",
        "Intermex",
        constructor(|ctx| IntermexAdapter::new(ctx.clone())),
    );
    registry
}
