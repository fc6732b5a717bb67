//! # Cache Key Design
//!
//! Structured, versioned key formats for the three cache namespaces.
//!
//! Quote keys carry the amount in integer micro-units so requests that
//! differ only in trailing zeros (`1000` vs `1000.00`) map to the same
//! entry.

use crate::domain::value_objects::{CountryCode, CurrencyCode};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Namespace prefix for aggregate quote entries.
pub const QUOTE_PREFIX: &str = "v1:fee:";
/// Namespace prefix for corridor-support entries.
pub const CORRIDOR_PREFIX: &str = "corridor:";
/// Namespace prefix for provider metadata entries.
pub const PROVIDER_PREFIX: &str = "provider:";

/// Scale factor for amount micro-units.
const MICRO: i64 = 1_000_000;

/// Converts an amount to integer micro-units (×10⁶).
///
/// Fractions beyond six decimal places are truncated; amounts too large
/// for an `i128` fall back to zero (the request cap rejects them long
/// before this point).
#[must_use]
pub fn amount_micro_units(amount: Decimal) -> i128 {
    (amount * Decimal::from(MICRO))
        .trunc()
        .to_i128()
        .unwrap_or(0)
}

/// Key for an aggregate quote entry:
/// `v1:fee:{src}:{dst}:{src_ccy}:{dst_ccy}:{amount_micro}`.
#[must_use]
pub fn quote_key(
    source_country: CountryCode,
    dest_country: CountryCode,
    source_currency: CurrencyCode,
    dest_currency: CurrencyCode,
    amount: Decimal,
) -> String {
    format!(
        "{QUOTE_PREFIX}{source_country}:{dest_country}:{source_currency}:{dest_currency}:{}",
        amount_micro_units(amount)
    )
}

/// Prefix matching every quote entry for one corridor.
#[must_use]
pub fn quote_corridor_prefix(source_country: CountryCode, dest_country: CountryCode) -> String {
    format!("{QUOTE_PREFIX}{source_country}:{dest_country}:")
}

/// Key for a corridor-support entry: `corridor:{src}:{dst}`.
#[must_use]
pub fn corridor_key(source_country: CountryCode, dest_country: CountryCode) -> String {
    format!("{CORRIDOR_PREFIX}{source_country}:{dest_country}")
}

/// Key for a provider metadata entry: `provider:{id}`.
#[must_use]
pub fn provider_key(provider_id: &str) -> String {
    format!("{PROVIDER_PREFIX}{provider_id}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn country(code: &str) -> CountryCode {
        CountryCode::parse(code).unwrap()
    }

    fn currency(code: &str) -> CurrencyCode {
        CurrencyCode::parse(code).unwrap()
    }

    #[test]
    fn quote_key_format() {
        let key = quote_key(
            country("US"),
            country("MX"),
            currency("USD"),
            currency("MXN"),
            dec!(1000),
        );
        assert_eq!(key, "v1:fee:US:MX:USD:MXN:1000000000");
    }

    #[test]
    fn trailing_zeros_share_a_key() {
        let a = quote_key(
            country("US"),
            country("MX"),
            currency("USD"),
            currency("MXN"),
            dec!(1000),
        );
        let b = quote_key(
            country("US"),
            country("MX"),
            currency("USD"),
            currency("MXN"),
            dec!(1000.00),
        );
        assert_eq!(a, b);
    }

    #[test]
    fn fractional_amounts_differ() {
        let a = quote_key(
            country("US"),
            country("MX"),
            currency("USD"),
            currency("MXN"),
            dec!(1000.5),
        );
        let b = quote_key(
            country("US"),
            country("MX"),
            currency("USD"),
            currency("MXN"),
            dec!(1000.50),
        );
        assert_eq!(a, b);
        assert!(a.ends_with(":1000500000"));
    }

    #[test]
    fn micro_units_truncate_past_six_decimals() {
        assert_eq!(amount_micro_units(dec!(0.1234567)), 123_456);
        assert_eq!(amount_micro_units(dec!(1)), 1_000_000);
    }

    #[test]
    fn corridor_and_provider_keys() {
        assert_eq!(corridor_key(country("GB"), country("IN")), "corridor:GB:IN");
        assert_eq!(provider_key("wise"), "provider:wise");
        assert!(quote_corridor_prefix(country("GB"), country("IN")).starts_with("v1:fee:GB:IN:"));
    }
}
