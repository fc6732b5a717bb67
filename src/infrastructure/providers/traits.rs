//! # Provider Adapter Trait
//!
//! Port definition for money-transfer provider integrations.
//!
//! Every provider integration implements [`ProviderAdapter`]. The fan-out
//! executor talks to adapters only through this trait; adapters talk to
//! the outside world only through their [`AdapterContext`].
//!
//! # Contract
//!
//! - Never panic past the boundary; every failure is a typed
//!   [`ProviderError`](super::error::ProviderError).
//! - Honor the [`Deadline`]; return `Timeout` when it cannot be met.
//! - Retry at most once, and only on transient kinds, within the
//!   remaining budget.

use crate::domain::entities::request::QuoteRequest;
use crate::domain::value_objects::{CountryCode, CurrencyCode, DeliveryMethod, PaymentMethod};
use crate::infrastructure::providers::error::ProviderResult;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Absolute cutoff for one provider call.
///
/// Created by the executor from the per-provider timeout; adapters use
/// [`remaining`](Self::remaining) to bound inner HTTP timeouts and
/// backoff sleeps.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// A deadline `timeout` from now.
    #[must_use]
    pub fn within(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    /// A deadline at an explicit instant.
    #[must_use]
    pub fn at(instant: Instant) -> Self {
        Self { at: instant }
    }

    /// Time left before the cutoff; zero once passed.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    /// True once the cutoff has passed.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// The cutoff instant, for `tokio::time::timeout_at`.
    #[must_use]
    pub fn instant(&self) -> Instant {
        self.at
    }

    /// True when at least `needed` is left on the budget.
    #[must_use]
    pub fn allows(&self, needed: Duration) -> bool {
        self.remaining() >= needed
    }
}

/// Pre-normalization quote as an adapter reports it.
///
/// Monetary values are exact decimals; the adapter has already done the
/// provider-native scale conversion (cents, micro-units, string
/// parsing). The normalizer owns rounding, rate cross-checks, and
/// timestamping.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    /// Amount the sender pays.
    pub send_amount: Decimal,
    /// Currency of `send_amount` and `fee`.
    pub source_currency: CurrencyCode,
    /// Amount the recipient receives.
    pub destination_amount: Decimal,
    /// Currency of `destination_amount`.
    pub destination_currency: CurrencyCode,
    /// Provider-reported rate, when the payload carried one.
    pub exchange_rate: Option<Decimal>,
    /// Fee in source currency. `None` means the provider omitted the
    /// field; only an explicit zero maps to `Some(0)`.
    pub fee: Option<Decimal>,
    /// Funding method of the selected combination.
    pub payment_method: PaymentMethod,
    /// Payout method of the selected combination.
    pub delivery_method: DeliveryMethod,
    /// Estimated delivery in minutes, when the provider reported one.
    pub delivery_time_minutes: Option<u32>,
    /// Original payload, attached only when the caller asked for it.
    pub raw: Option<serde_json::Value>,
}

/// Trait implemented by every provider integration.
///
/// All methods besides `fetch_quote` are cheap metadata lookups. The
/// executor clones adapters behind `Arc`, so implementations must not
/// hold per-request mutable state.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + fmt::Debug {
    /// Stable lowercase identifier, e.g. `"wise"`.
    fn id(&self) -> &'static str;

    /// Human-readable name, e.g. `"Wise"`.
    fn display_name(&self) -> &'static str;

    /// Corridors this provider serves, when the set is known up front.
    ///
    /// `None` means the adapter detects unsupported corridors inline
    /// and returns `UnsupportedCorridor` from `fetch_quote`.
    fn supported_corridors(&self) -> Option<Vec<(CountryCode, CountryCode)>> {
        None
    }

    /// Fetches one quote for the request, completing before `deadline`.
    ///
    /// May perform several underlying HTTP calls (session bootstrap,
    /// preflight, pricing) provided all finish within the budget.
    ///
    /// # Errors
    ///
    /// Any [`ProviderError`](super::error::ProviderError); the executor
    /// converts errors into failed quotes, never aborting the aggregate.
    async fn fetch_quote(
        &self,
        request: &QuoteRequest,
        deadline: Deadline,
    ) -> ProviderResult<RawQuote>;
}
