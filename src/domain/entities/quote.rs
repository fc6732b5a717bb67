//! # Quote Entity
//!
//! The canonical per-provider quote record.
//!
//! A [`Quote`] is produced by the normalizer from an adapter's raw result
//! (or synthesized for a failed provider) and is read-only afterwards.
//!
//! # Invariants
//!
//! - `success == false` implies `exchange_rate == None` and
//!   `destination_amount == 0`
//! - `success == true` implies `destination_amount >= 0`, `fee >= 0`,
//!   and `exchange_rate > 0`
//! - `send_amount` and `fee` are both denominated in `source_currency`

use crate::domain::value_objects::{
    CurrencyCode, DeliveryMethod, ErrorKind, PaymentMethod, Timestamp,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical quote from one provider for one corridor request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Stable provider identifier.
    pub provider_id: String,
    /// Human-readable provider name.
    pub provider_name: String,
    /// False iff the provider failed or the corridor is unsupported.
    pub success: bool,
    /// Failure classification; `None` on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Human-readable failure detail; `None` on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Amount the sender pays, equal to the request amount on success.
    pub send_amount: Decimal,
    /// Currency of `send_amount` and `fee`.
    pub source_currency: CurrencyCode,
    /// Amount the recipient receives; zero on failure.
    pub destination_amount: Decimal,
    /// Currency of `destination_amount`.
    pub destination_currency: CurrencyCode,
    /// Destination units per source unit; `None` on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<Decimal>,
    /// Fee in `source_currency`, non-negative.
    pub fee: Decimal,
    /// Funding method of the quoted combination.
    pub payment_method: PaymentMethod,
    /// Payout method of the quoted combination.
    pub delivery_method: DeliveryMethod,
    /// Estimated delivery in minutes; 0 means instant, `None` means
    /// supported but unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_time_minutes: Option<u32>,
    /// When the quote was normalized, UTC.
    pub timestamp: Timestamp,
    /// Original provider payload, present only when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl Quote {
    /// Builds a failed quote for a provider, preserving the corridor
    /// echo so every queried provider appears in `all_providers`.
    #[must_use]
    pub fn failed(
        provider_id: impl Into<String>,
        provider_name: impl Into<String>,
        send_amount: Decimal,
        source_currency: CurrencyCode,
        destination_currency: CurrencyCode,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            provider_name: provider_name.into(),
            success: false,
            error_kind: Some(kind),
            error_message: Some(message.into()),
            send_amount,
            source_currency,
            destination_amount: Decimal::ZERO,
            destination_currency,
            exchange_rate: None,
            fee: Decimal::ZERO,
            payment_method: PaymentMethod::Unknown,
            delivery_method: DeliveryMethod::Unknown,
            delivery_time_minutes: None,
            timestamp: Timestamp::now(),
            raw: None,
        }
    }

    /// Returns the rate to use for destination-currency conversions:
    /// the provider's rate, or the ratio of amounts when absent.
    #[must_use]
    pub fn effective_rate(&self) -> Option<Decimal> {
        if let Some(rate) = self.exchange_rate {
            return Some(rate);
        }
        if self.send_amount.is_zero() {
            return None;
        }
        self.destination_amount.checked_div(self.send_amount)
    }

    /// Checks the record invariants relating success, rate, and
    /// amounts. Used by tests and the normalizer's self-checks.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        if self.success {
            self.error_kind.is_none()
                && self.destination_amount >= Decimal::ZERO
                && self.fee >= Decimal::ZERO
                && self.exchange_rate.is_some_and(|r| r > Decimal::ZERO)
        } else {
            self.exchange_rate.is_none() && self.destination_amount.is_zero()
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(
                f,
                "Quote({}: {} {} -> {} {} fee {})",
                self.provider_id,
                self.send_amount,
                self.source_currency,
                self.destination_amount,
                self.destination_currency,
                self.fee
            )
        } else {
            match self.error_kind {
                Some(kind) => write!(f, "Quote({}: failed {})", self.provider_id, kind),
                None => write!(f, "Quote({}: failed)", self.provider_id),
            }
        }
    }
}
