//! # Domain Entities
//!
//! Core records flowing through the aggregation pipeline.
//!
//! - [`QuoteRequest`]: the caller's corridor request plus options
//! - [`Quote`]: canonical per-provider quote, read-only after
//!   normalization
//! - [`AggregateResult`]: the coordinator's response

pub mod aggregate;
pub mod quote;
pub mod request;

pub use aggregate::{AggregateResult, FiltersApplied, ProviderFailure};
pub use quote::Quote;
pub use request::{
    QuoteOptions, QuotePredicate, QuoteRequest, RequestSummary, RequestValidationError,
};
