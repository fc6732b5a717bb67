//! # Normalizer
//!
//! Converts raw adapter results into canonical [`Quote`] records.
//!
//! Owns the rounding conventions (six decimals for rates, currency
//! scale for amounts), the rate consistency cross-check, and the UTC
//! timestamping. Providers whose figures do not hold together are
//! downgraded to failed quotes rather than surfaced as-is.

use crate::domain::catalog::Catalog;
use crate::domain::entities::quote::Quote;
use crate::domain::entities::request::QuoteRequest;
use crate::domain::value_objects::{CurrencyCode, ErrorKind, Timestamp};
use crate::infrastructure::providers::error::ProviderError;
use crate::infrastructure::providers::traits::RawQuote;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::warn;

/// Decimal places kept on exchange rates.
const RATE_SCALE: u32 = 6;

/// Maximum relative disagreement between a provider-reported rate and
/// the recomputed `destination_amount / send_amount` before the quote
/// is downgraded to `InconsistentResponse`.
const RATE_TOLERANCE: Decimal = Decimal::from_parts(5, 0, 0, false, 3); // 0.005

/// Raw-result to canonical-quote converter.
#[derive(Debug, Clone)]
pub struct Normalizer {
    catalog: Arc<Catalog>,
}

impl Normalizer {
    /// Creates a normalizer over the catalog's currency scales.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Converts one adapter outcome into a canonical quote.
    ///
    /// `dest_currency` is the request's resolved destination currency,
    /// used for the corridor echo on failed quotes.
    #[must_use]
    pub fn normalize(
        &self,
        provider_id: &str,
        display_name: &str,
        request: &QuoteRequest,
        dest_currency: CurrencyCode,
        outcome: Result<RawQuote, ProviderError>,
    ) -> Quote {
        match outcome {
            Ok(raw) => self.normalize_success(provider_id, display_name, request, raw),
            Err(error) => Quote::failed(
                provider_id,
                display_name,
                request.amount,
                request.source_currency,
                dest_currency,
                error.kind(),
                error.to_string(),
            ),
        }
    }

    fn normalize_success(
        &self,
        provider_id: &str,
        display_name: &str,
        request: &QuoteRequest,
        raw: RawQuote,
    ) -> Quote {
        let fail = |kind, message: String| {
            Quote::failed(
                provider_id,
                display_name,
                request.amount,
                raw.source_currency,
                raw.destination_currency,
                kind,
                message,
            )
        };

        // Fee semantics: only an explicit provider zero is a zero fee.
        // An omitted fee makes the quote unusable for comparison.
        let Some(fee) = raw.fee else {
            return fail(
                ErrorKind::Parsing,
                "provider omitted the fee field".to_string(),
            );
        };
        if fee < Decimal::ZERO {
            return fail(
                ErrorKind::InconsistentResponse,
                format!("negative fee: {fee}"),
            );
        }
        if raw.send_amount <= Decimal::ZERO || raw.destination_amount <= Decimal::ZERO {
            return fail(
                ErrorKind::InconsistentResponse,
                format!(
                    "non-positive amounts: send {} receive {}",
                    raw.send_amount, raw.destination_amount
                ),
            );
        }

        let computed_rate = raw.destination_amount / raw.send_amount;
        let rate = match raw.exchange_rate {
            Some(reported) if reported > Decimal::ZERO => {
                let deviation = ((reported - computed_rate) / computed_rate).abs();
                if deviation > RATE_TOLERANCE {
                    warn!(
                        provider_id,
                        %reported,
                        %computed_rate,
                        "provider rate disagrees with amounts"
                    );
                    return fail(
                        ErrorKind::InconsistentResponse,
                        format!(
                            "reported rate {reported} disagrees with amounts (implied {computed_rate})"
                        ),
                    );
                }
                reported
            }
            Some(reported) => {
                return fail(
                    ErrorKind::InconsistentResponse,
                    format!("non-positive exchange rate: {reported}"),
                );
            }
            None => computed_rate,
        };

        let source_scale = self.catalog.currency_decimals(raw.source_currency);
        let dest_scale = self.catalog.currency_decimals(raw.destination_currency);

        Quote {
            provider_id: provider_id.to_string(),
            provider_name: display_name.to_string(),
            success: true,
            error_kind: None,
            error_message: None,
            send_amount: round_amount(raw.send_amount, source_scale),
            source_currency: raw.source_currency,
            destination_amount: round_amount(raw.destination_amount, dest_scale),
            destination_currency: raw.destination_currency,
            exchange_rate: Some(round_rate(rate)),
            fee: round_amount(fee, source_scale),
            payment_method: raw.payment_method,
            delivery_method: raw.delivery_method,
            delivery_time_minutes: raw.delivery_time_minutes,
            timestamp: Timestamp::now(),
            raw: raw.raw,
        }
    }
}

fn round_rate(rate: Decimal) -> Decimal {
    rate.round_dp_with_strategy(RATE_SCALE, RoundingStrategy::MidpointNearestEven)
}

fn round_amount(amount: Decimal, scale: u32) -> Decimal {
    amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{
        CountryCode, DeliveryMethod, ErrorKind, PaymentMethod,
    };
    use rust_decimal_macros::dec;

    fn currency(code: &str) -> CurrencyCode {
        CurrencyCode::parse(code).unwrap()
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(Arc::new(Catalog::new()))
    }

    fn request() -> QuoteRequest {
        QuoteRequest::new(
            CountryCode::parse("US").unwrap(),
            CountryCode::parse("MX").unwrap(),
            currency("USD"),
            dec!(1000),
        )
    }

    fn raw(dest_amount: Decimal, rate: Option<Decimal>, fee: Option<Decimal>) -> RawQuote {
        RawQuote {
            send_amount: dec!(1000),
            source_currency: currency("USD"),
            destination_amount: dest_amount,
            destination_currency: currency("MXN"),
            exchange_rate: rate,
            fee,
            payment_method: PaymentMethod::BankAccount,
            delivery_method: DeliveryMethod::BankDeposit,
            delivery_time_minutes: Some(1440),
            raw: None,
        }
    }

    #[test]
    fn success_path_rounds_and_stamps() {
        let quote = normalizer().normalize(
            "wise",
            "Wise",
            &request(),
            currency("MXN"),
            Ok(raw(dec!(17940.123456), Some(dec!(17.940123456)), Some(dec!(8.425)))),
        );
        assert!(quote.success);
        assert!(quote.invariants_hold());
        assert_eq!(quote.exchange_rate.unwrap(), dec!(17.940123));
        assert_eq!(quote.destination_amount, dec!(17940.12));
        assert_eq!(quote.fee, dec!(8.42));
    }

    #[test]
    fn rate_recomputed_when_omitted() {
        let quote = normalizer().normalize(
            "wise",
            "Wise",
            &request(),
            currency("MXN"),
            Ok(raw(dec!(17940), None, Some(dec!(0)))),
        );
        assert!(quote.success);
        assert_eq!(quote.exchange_rate.unwrap(), dec!(17.94));
    }

    #[test]
    fn disagreeing_rate_downgrades() {
        // Implied rate 17.94, reported 18.5, well past 0.5%.
        let quote = normalizer().normalize(
            "wise",
            "Wise",
            &request(),
            currency("MXN"),
            Ok(raw(dec!(17940), Some(dec!(18.5)), Some(dec!(1)))),
        );
        assert!(!quote.success);
        assert_eq!(quote.error_kind, Some(ErrorKind::InconsistentResponse));
        assert!(quote.invariants_hold());
    }

    #[test]
    fn rate_within_tolerance_is_kept() {
        // Implied 17.94; reported 17.95 is about 0.056% off, inside 0.5%.
        let quote = normalizer().normalize(
            "wise",
            "Wise",
            &request(),
            currency("MXN"),
            Ok(raw(dec!(17940), Some(dec!(17.95)), Some(dec!(1)))),
        );
        assert!(quote.success);
        assert_eq!(quote.exchange_rate.unwrap(), dec!(17.95));
    }

    #[test]
    fn omitted_fee_downgrades_to_parsing() {
        let quote = normalizer().normalize(
            "wise",
            "Wise",
            &request(),
            currency("MXN"),
            Ok(raw(dec!(17940), Some(dec!(17.94)), None)),
        );
        assert!(!quote.success);
        assert_eq!(quote.error_kind, Some(ErrorKind::Parsing));
    }

    #[test]
    fn explicit_zero_fee_is_kept() {
        let quote = normalizer().normalize(
            "wise",
            "Wise",
            &request(),
            currency("MXN"),
            Ok(raw(dec!(17940), Some(dec!(17.94)), Some(dec!(0)))),
        );
        assert!(quote.success);
        assert_eq!(quote.fee, Decimal::ZERO);
    }

    #[test]
    fn zero_decimal_currency_rounds_whole_units() {
        let mut raw_quote = raw(dec!(150000.7), None, Some(dec!(3.999)));
        raw_quote.destination_currency = currency("JPY");
        let quote = normalizer().normalize(
            "wise",
            "Wise",
            &request(),
            currency("JPY"),
            Ok(raw_quote),
        );
        assert!(quote.success);
        assert_eq!(quote.destination_amount, dec!(150001));
        // Fee stays in source-currency scale.
        assert_eq!(quote.fee, dec!(4.00));
    }

    #[test]
    fn provider_error_becomes_failed_quote() {
        let quote = normalizer().normalize(
            "xe",
            "XE",
            &request(),
            currency("MXN"),
            Err(ProviderError::timeout("deadline exceeded", Some(500))),
        );
        assert!(!quote.success);
        assert_eq!(quote.error_kind, Some(ErrorKind::Timeout));
        assert_eq!(quote.send_amount, dec!(1000));
        assert_eq!(quote.destination_currency, currency("MXN"));
    }

    #[test]
    fn non_positive_amounts_downgrade() {
        let quote = normalizer().normalize(
            "wise",
            "Wise",
            &request(),
            currency("MXN"),
            Ok(raw(dec!(0), None, Some(dec!(1)))),
        );
        assert!(!quote.success);
        assert_eq!(quote.error_kind, Some(ErrorKind::InconsistentResponse));
    }
}
