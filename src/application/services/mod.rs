//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`Aggregator`]: end-to-end quote aggregation
//! - [`FanOutExecutor`]: bounded-parallel adapter dispatch
//! - [`Normalizer`]: raw-result to canonical-quote conversion
//! - [`pipeline`]: filter and stable-sort stages

pub mod coordinator;
pub mod executor;
pub mod normalizer;
pub mod pipeline;

pub use coordinator::{Aggregator, AggregatorConfig};
pub use executor::{
    cancel_pair, CancelHandle, CancelToken, ExecutorConfig, FanOutExecutor, ProviderOutcome,
};
pub use normalizer::Normalizer;
pub use pipeline::filter_and_sort;
