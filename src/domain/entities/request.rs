//! # Quote Request Entity
//!
//! The caller's corridor request plus per-call options.
//!
//! # Examples
//!
//! ```
//! use remitscan::domain::entities::request::QuoteRequest;
//! use remitscan::domain::value_objects::{CountryCode, CurrencyCode, SortBy};
//! use rust_decimal::Decimal;
//!
//! let request = QuoteRequest::new(
//!     CountryCode::parse("US").unwrap(),
//!     CountryCode::parse("MX").unwrap(),
//!     CurrencyCode::parse("USD").unwrap(),
//!     Decimal::new(100000, 2),
//! )
//! .with_sort_by(SortBy::LowestFee);
//!
//! assert_eq!(request.options.sort_by, SortBy::LowestFee);
//! ```

use crate::domain::catalog::Catalog;
use crate::domain::entities::quote::Quote;
use crate::domain::value_objects::{
    CountryCode, CurrencyCode, DeliveryMethod, PaymentMethod, SortBy,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Caller-supplied keep/drop predicate applied to successful quotes.
pub type QuotePredicate = Arc<dyn Fn(&Quote) -> bool + Send + Sync>;

/// Per-call option block.
#[derive(Clone, Default)]
pub struct QuoteOptions {
    /// Bypass cache reads; writes still happen.
    pub force_refresh: bool,
    /// Sort criterion for the filtered list.
    pub sort_by: SortBy,
    /// Keep only quotes with `fee <= max_fee`.
    pub max_fee: Option<Decimal>,
    /// Keep only quotes with a known delivery time at or under this.
    pub max_delivery_time_minutes: Option<u32>,
    /// When non-empty, restrict fan-out to these provider ids.
    pub include_providers: Option<BTreeSet<String>>,
    /// Provider ids excluded from fan-out.
    pub exclude_providers: BTreeSet<String>,
    /// Opaque caller predicate; quotes it rejects are dropped.
    pub custom_predicate: Option<QuotePredicate>,
    /// Per-adapter deadline override in milliseconds.
    pub per_provider_timeout_ms: Option<u64>,
    /// Worker pool size override.
    pub max_workers: Option<usize>,
    /// Attach the original provider payload to each quote.
    pub include_raw: bool,
}

impl fmt::Debug for QuoteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuoteOptions")
            .field("force_refresh", &self.force_refresh)
            .field("sort_by", &self.sort_by)
            .field("max_fee", &self.max_fee)
            .field("max_delivery_time_minutes", &self.max_delivery_time_minutes)
            .field("include_providers", &self.include_providers)
            .field("exclude_providers", &self.exclude_providers)
            .field("custom_predicate", &self.custom_predicate.is_some())
            .field("per_provider_timeout_ms", &self.per_provider_timeout_ms)
            .field("max_workers", &self.max_workers)
            .field("include_raw", &self.include_raw)
            .finish()
    }
}

/// A corridor quote request.
///
/// `dest_currency` may be omitted; the coordinator resolves it to the
/// destination country's default via the catalog.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    /// Sender country, ISO-3166-1 alpha-2.
    pub source_country: CountryCode,
    /// Recipient country, ISO-3166-1 alpha-2.
    pub dest_country: CountryCode,
    /// Currency the sender pays in.
    pub source_currency: CurrencyCode,
    /// Currency the recipient receives; `None` means use the
    /// destination country default.
    pub dest_currency: Option<CurrencyCode>,
    /// Amount to send, in `source_currency`.
    pub amount: Decimal,
    /// Requested funding method.
    pub payment_method: Option<PaymentMethod>,
    /// Requested payout method.
    pub delivery_method: Option<DeliveryMethod>,
    /// Per-call options.
    pub options: QuoteOptions,
}

impl QuoteRequest {
    /// Creates a request with default options.
    #[must_use]
    pub fn new(
        source_country: CountryCode,
        dest_country: CountryCode,
        source_currency: CurrencyCode,
        amount: Decimal,
    ) -> Self {
        Self {
            source_country,
            dest_country,
            source_currency,
            dest_currency: None,
            amount,
            payment_method: None,
            delivery_method: None,
            options: QuoteOptions::default(),
        }
    }

    /// Sets an explicit destination currency.
    #[must_use]
    pub fn with_dest_currency(mut self, currency: CurrencyCode) -> Self {
        self.dest_currency = Some(currency);
        self
    }

    /// Sets the sort criterion.
    #[must_use]
    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.options.sort_by = sort_by;
        self
    }

    /// Replaces the option block.
    #[must_use]
    pub fn with_options(mut self, options: QuoteOptions) -> Self {
        self.options = options;
        self
    }

    /// Destination currency after catalog fallback.
    #[must_use]
    pub fn resolved_dest_currency(&self, catalog: &Catalog) -> Option<CurrencyCode> {
        self.dest_currency
            .or_else(|| catalog.default_currency(self.dest_country))
    }

    /// Validates the request against the catalog and the amount cap.
    ///
    /// # Errors
    ///
    /// Returns [`RequestValidationError`] describing the first violated
    /// rule; the coordinator maps this to `InvalidParameter`.
    pub fn validate(
        &self,
        catalog: &Catalog,
        max_amount: Decimal,
    ) -> Result<(), RequestValidationError> {
        if !catalog.is_valid_iso_country(self.source_country) {
            return Err(RequestValidationError::UnknownCountry {
                code: self.source_country,
            });
        }
        if !catalog.is_valid_iso_country(self.dest_country) {
            return Err(RequestValidationError::UnknownCountry {
                code: self.dest_country,
            });
        }
        if !catalog.is_valid_iso_currency(self.source_currency) {
            return Err(RequestValidationError::UnknownCurrency {
                code: self.source_currency,
            });
        }
        if let Some(dest_ccy) = self.dest_currency {
            if !catalog.is_valid_iso_currency(dest_ccy) {
                return Err(RequestValidationError::UnknownCurrency { code: dest_ccy });
            }
        } else if catalog.default_currency(self.dest_country).is_none() {
            return Err(RequestValidationError::NoDefaultCurrency {
                country: self.dest_country,
            });
        }
        if self.amount <= Decimal::ZERO {
            return Err(RequestValidationError::NonPositiveAmount {
                amount: self.amount,
            });
        }
        if self.amount > max_amount {
            return Err(RequestValidationError::AmountAboveCap {
                amount: self.amount,
                cap: max_amount,
            });
        }
        Ok(())
    }

    /// Serializable echo of the request for API responses.
    #[must_use]
    pub fn summary(&self, resolved_dest_currency: Option<CurrencyCode>) -> RequestSummary {
        RequestSummary {
            source_country: self.source_country,
            dest_country: self.dest_country,
            source_currency: self.source_currency,
            dest_currency: resolved_dest_currency.or(self.dest_currency),
            amount: self.amount,
            payment_method: self.payment_method,
            delivery_method: self.delivery_method,
        }
    }
}

/// Serializable echo of a request, returned inside the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSummary {
    /// Sender country.
    pub source_country: CountryCode,
    /// Recipient country.
    pub dest_country: CountryCode,
    /// Currency the sender pays in.
    pub source_currency: CurrencyCode,
    /// Resolved destination currency when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dest_currency: Option<CurrencyCode>,
    /// Amount to send.
    pub amount: Decimal,
    /// Requested funding method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    /// Requested payout method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_method: Option<DeliveryMethod>,
}

/// Validation failures for a quote request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    /// Country not in the ISO table.
    #[error("unknown country: {code}")]
    UnknownCountry {
        /// The rejected code.
        code: CountryCode,
    },
    /// Currency not in the ISO table.
    #[error("unknown currency: {code}")]
    UnknownCurrency {
        /// The rejected code.
        code: CurrencyCode,
    },
    /// No destination currency given and the country has no default.
    #[error("no default currency for country: {country}")]
    NoDefaultCurrency {
        /// The destination country.
        country: CountryCode,
    },
    /// Amount must be strictly positive.
    #[error("amount must be positive, got {amount}")]
    NonPositiveAmount {
        /// The rejected amount.
        amount: Decimal,
    },
    /// Amount exceeds the configured cap.
    #[error("amount {amount} exceeds cap {cap}")]
    AmountAboveCap {
        /// The rejected amount.
        amount: Decimal,
        /// The configured maximum.
        cap: Decimal,
    },
}
