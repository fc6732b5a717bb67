//! # Payload Conversion Helpers
//!
//! Shared parsing and selection rules for provider adapters:
//! locale-neutral decimal parsing, the delivery-time free-text table,
//! tiered-rate band selection, and primary payment-delivery combination
//! selection.

use crate::domain::value_objects::{DeliveryMethod, PaymentMethod};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

/// Parses a monetary value from a provider payload string.
///
/// Commas are treated as thousand separators and stripped; the decimal
/// point is `.`. Currency symbols and surrounding whitespace are
/// rejected, not guessed at.
///
/// # Errors
///
/// `ProviderError::Parsing` when the cleaned string is not a decimal.
pub fn parse_decimal(input: &str) -> ProviderResult<Decimal> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned)
        .map_err(|_| ProviderError::parsing(format!("not a decimal value: {input:?}")))
}

/// Like [`parse_decimal`] but maps empty/absent markers to `None`.
///
/// # Errors
///
/// `ProviderError::Parsing` when a non-empty string is not a decimal.
pub fn parse_optional_decimal(input: Option<&str>) -> ProviderResult<Option<Decimal>> {
    match input {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_decimal(s).map(Some),
    }
}

/// Closed free-text table for delivery-time estimates, in minutes.
///
/// Adapter-specific phrasings are mapped to these entries before lookup.
const DELIVERY_TIME_TABLE: &[(&str, u32)] = &[
    ("instant", 10),
    ("minutes", 10),
    ("within 24 hours", 1440),
    ("1 business day", 1440),
    ("2 business days", 2880),
    ("3 business days", 4320),
    ("5 business days", 7200),
];

/// Translates free-text delivery estimates via the closed table.
///
/// Matching is case-insensitive containment, longest phrase first, so
/// "usually within 24 hours" resolves before the bare "minutes" entry
/// could misfire.
#[must_use]
pub fn delivery_time_from_text(text: &str) -> Option<u32> {
    let lowered = text.to_lowercase();
    let mut entries: Vec<&(&str, u32)> = DELIVERY_TIME_TABLE.iter().collect();
    entries.sort_by_key(|(phrase, _)| std::cmp::Reverse(phrase.len()));
    entries
        .iter()
        .find(|(phrase, _)| lowered.contains(phrase))
        .map(|(_, minutes)| *minutes)
}

/// One amount band of a tiered rate table.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTier {
    /// Inclusive lower bound of the band.
    pub min: Decimal,
    /// Inclusive upper bound of the band.
    pub max: Decimal,
    /// Exchange rate inside the band.
    pub rate: Decimal,
}

/// Selects the tier whose `[min, max]` band contains `amount`.
///
/// When bands overlap, the tier with the lower `min` wins.
#[must_use]
pub fn select_tier(tiers: &[RateTier], amount: Decimal) -> Option<&RateTier> {
    tiers
        .iter()
        .filter(|t| t.min <= amount && amount <= t.max)
        .min_by(|a, b| a.min.cmp(&b.min))
}

/// One payment-delivery combination offered by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateOption {
    /// Funding method of this combination.
    pub payment_method: PaymentMethod,
    /// Payout method of this combination.
    pub delivery_method: DeliveryMethod,
    /// Fee for this combination, when reported.
    pub fee: Option<Decimal>,
    /// Receive amount for this combination.
    pub destination_amount: Decimal,
    /// Rate for this combination, when reported.
    pub exchange_rate: Option<Decimal>,
    /// Delivery estimate for this combination.
    pub delivery_time_minutes: Option<u32>,
    /// True when the provider marked this combination as its default.
    pub is_default: bool,
}

/// Selects the primary combination from a provider's offer list.
///
/// The provider-marked default wins when present; otherwise the
/// lowest-fee option, tie-broken by fastest delivery (unknown last),
/// then by lexicographically least `(payment_method, delivery_method)`.
#[must_use]
pub fn select_primary(options: Vec<CandidateOption>) -> Option<CandidateOption> {
    if let Some(default) = options.iter().find(|o| o.is_default) {
        return Some(default.clone());
    }
    options.into_iter().min_by(compare_candidates)
}

fn compare_candidates(a: &CandidateOption, b: &CandidateOption) -> Ordering {
    // Missing fee sorts after any reported fee.
    let fee_order = match (a.fee, b.fee) {
        (Some(fa), Some(fb)) => fa.cmp(&fb),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    fee_order
        .then_with(|| match (a.delivery_time_minutes, b.delivery_time_minutes) {
            (Some(ta), Some(tb)) => ta.cmp(&tb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.payment_method.as_str().cmp(b.payment_method.as_str()))
        .then_with(|| a.delivery_method.as_str().cmp(b.delivery_method.as_str()))
}
