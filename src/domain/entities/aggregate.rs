//! # Aggregate Result Entity
//!
//! The coordinator's response object: every queried provider's quote in
//! registry order, the filtered and sorted comparison list, and a
//! per-provider error map.

use crate::domain::entities::quote::Quote;
use crate::domain::entities::request::RequestSummary;
use crate::domain::value_objects::{ErrorKind, SortBy, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Failure detail for one provider inside an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    /// Canonical failure classification.
    pub error_kind: ErrorKind,
    /// Human-readable detail.
    pub error_message: String,
}

/// Which filters were in force when `quotes` was produced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FiltersApplied {
    /// Sort criterion used.
    pub sort_by: SortBy,
    /// Fee ceiling, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee: Option<Decimal>,
    /// Delivery-time ceiling in minutes, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_delivery_time_minutes: Option<u32>,
    /// True when a caller predicate was applied.
    pub custom_predicate: bool,
}

/// The end-to-end aggregation response.
///
/// `all_providers` holds exactly one quote per queried provider, in
/// registry order, failures included. `quotes` is the filtered, sorted
/// subsequence of successful quotes. An empty `quotes` list is still a
/// successful aggregate; only request validation failures flip
/// `success` to false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// False only for InvalidParameter rejections.
    pub success: bool,
    /// Echo of the validated request.
    pub request: RequestSummary,
    /// Wall-clock duration of the call in milliseconds.
    pub elapsed_ms: u64,
    /// True when served from the quote cache.
    pub cache_hit: bool,
    /// When this response was assembled, UTC.
    pub timestamp: Timestamp,
    /// Filters in force for `quotes`.
    pub filters_applied: FiltersApplied,
    /// One quote per queried provider, registry order.
    pub all_providers: Vec<Quote>,
    /// Successful quotes passing all filters, sorted.
    pub quotes: Vec<Quote>,
    /// Failure detail per failed provider.
    pub errors: BTreeMap<String, ProviderFailure>,
}

impl AggregateResult {
    /// Builds the InvalidParameter short-circuit response: no fan-out
    /// happened, a single synthetic error entry explains why.
    #[must_use]
    pub fn invalid_parameter(
        request: RequestSummary,
        message: impl Into<String>,
        elapsed_ms: u64,
    ) -> Self {
        let mut errors = BTreeMap::new();
        errors.insert(
            "request".to_string(),
            ProviderFailure {
                error_kind: ErrorKind::InvalidParameter,
                error_message: message.into(),
            },
        );
        Self {
            success: false,
            request,
            elapsed_ms,
            cache_hit: false,
            timestamp: Timestamp::now(),
            filters_applied: FiltersApplied::default(),
            all_providers: Vec::new(),
            quotes: Vec::new(),
            errors,
        }
    }

    /// Returns the best quote under the applied sort, if any.
    #[must_use]
    pub fn best_quote(&self) -> Option<&Quote> {
        self.quotes.first()
    }

    /// Number of providers that returned a successful quote.
    #[must_use]
    pub fn successful_providers(&self) -> usize {
        self.all_providers.iter().filter(|q| q.success).count()
    }
}
