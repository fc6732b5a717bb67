//! # remitscan
//!
//! Remittance quote aggregator: fan out one corridor request to many
//! money-transfer providers in parallel, normalize every answer into a
//! canonical quote, cache the comparison, and return it sorted and
//! filtered.
//!
//! # Architecture
//!
//! - [`domain`]: value objects, the ISO catalog, and the records
//!   flowing through the pipeline
//! - [`application`]: the fan-out executor, normalizer, filter/sort
//!   pipeline, and the coordinator that composes them
//! - [`infrastructure`]: provider adapters with their HTTP plumbing,
//!   and the TTL cache with single-flight
//! - [`api`]: the axum REST surface
//!
//! # Example
//!
//! ```ignore
//! use remitscan::application::services::Aggregator;
//! use remitscan::domain::entities::request::QuoteRequest;
//!
//! let result = aggregator.get_all_quotes(request).await;
//! for quote in &result.quotes {
//!     println!("{}: {} @ {}", quote.provider_id, quote.destination_amount, quote.fee);
//! }
//! ```

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::services::{Aggregator, AggregatorConfig};
pub use config::AppConfig;
pub use domain::catalog::Catalog;
pub use domain::entities::{AggregateResult, Quote, QuoteOptions, QuoteRequest};
