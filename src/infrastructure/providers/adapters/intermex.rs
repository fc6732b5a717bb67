//! # Intermex Adapter
//!
//! Integration with the Intermex pricing API (US/Canada → Latin
//! America corridors).

use crate::domain::entities::request::QuoteRequest;
use crate::domain::value_objects::{CountryCode, CurrencyCode, DeliveryMethod, PaymentMethod};
use crate::infrastructure::providers::context::AdapterContext;
use crate::infrastructure::providers::convert::{select_primary, CandidateOption};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http::retry_once;
use crate::infrastructure::providers::traits::{Deadline, ProviderAdapter, RawQuote};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

const PRICING_URL: &str = "https://api.imxi.com/pricing/api/v2/quote";

/// Sending side, alpha-2.
const SEND_COUNTRIES: &[&str] = &["US", "CA"];

/// Receiving side, alpha-2.
const RECEIVE_COUNTRIES: &[&str] = &["MX", "GT", "CO", "PE", "AR", "BR", "CL"];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricingResponse {
    #[serde(default)]
    deliveries: Vec<DeliveryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryEntry {
    delivery_type: String,
    payment_type: String,
    #[serde(default)]
    preferred: bool,
    total_fee: Decimal,
    exchange_rate: Decimal,
    wire_amount: Decimal,
    #[serde(default)]
    minutes_to_deliver: Option<u32>,
}

/// Intermex pricing adapter.
#[derive(Debug)]
pub struct IntermexAdapter {
    ctx: AdapterContext,
}

impl IntermexAdapter {
    /// Creates the adapter.
    #[must_use]
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

fn map_payment(token: &str) -> PaymentMethod {
    match token.to_ascii_uppercase().as_str() {
        "BANK" | "ACH" => PaymentMethod::BankAccount,
        "DEBIT" => PaymentMethod::DebitCard,
        "CREDIT" => PaymentMethod::CreditCard,
        "CASH" => PaymentMethod::Cash,
        _ => PaymentMethod::Unknown,
    }
}

fn map_delivery(token: &str) -> DeliveryMethod {
    match token.to_ascii_uppercase().as_str() {
        "DEPOSIT" | "BANK_DEPOSIT" => DeliveryMethod::BankDeposit,
        "PICKUP" | "CASH_PICKUP" => DeliveryMethod::CashPickup,
        "HOME_DELIVERY" => DeliveryMethod::HomeDelivery,
        _ => DeliveryMethod::Unknown,
    }
}

fn build_raw(
    response: &PricingResponse,
    request: &QuoteRequest,
    dest_currency: CurrencyCode,
    raw_payload: Option<serde_json::Value>,
) -> ProviderResult<RawQuote> {
    let candidates: Vec<CandidateOption> = response
        .deliveries
        .iter()
        .map(|entry| CandidateOption {
            payment_method: map_payment(&entry.payment_type),
            delivery_method: map_delivery(&entry.delivery_type),
            fee: Some(entry.total_fee),
            destination_amount: entry.wire_amount,
            exchange_rate: Some(entry.exchange_rate),
            delivery_time_minutes: entry.minutes_to_deliver,
            is_default: entry.preferred,
        })
        .collect();

    let Some(chosen) = select_primary(candidates) else {
        return Err(ProviderError::unsupported_corridor(
            request.source_country,
            request.dest_country,
        ));
    };

    Ok(RawQuote {
        send_amount: request.amount,
        source_currency: request.source_currency,
        destination_amount: chosen.destination_amount,
        destination_currency: dest_currency,
        exchange_rate: chosen.exchange_rate,
        fee: chosen.fee,
        payment_method: chosen.payment_method,
        delivery_method: chosen.delivery_method,
        delivery_time_minutes: chosen.delivery_time_minutes,
        raw: raw_payload,
    })
}

#[async_trait]
impl ProviderAdapter for IntermexAdapter {
    fn id(&self) -> &'static str {
        "intermex"
    }

    fn display_name(&self) -> &'static str {
        "Intermex"
    }

    fn supported_corridors(&self) -> Option<Vec<(CountryCode, CountryCode)>> {
        let mut corridors = Vec::new();
        for send in SEND_COUNTRIES {
            for receive in RECEIVE_COUNTRIES {
                if let (Ok(s), Ok(r)) = (CountryCode::parse(send), CountryCode::parse(receive)) {
                    corridors.push((s, r));
                }
            }
        }
        Some(corridors)
    }

    async fn fetch_quote(
        &self,
        request: &QuoteRequest,
        deadline: Deadline,
    ) -> ProviderResult<RawQuote> {
        if !SEND_COUNTRIES.contains(&request.source_country.as_str())
            || !RECEIVE_COUNTRIES.contains(&request.dest_country.as_str())
        {
            return Err(ProviderError::unsupported_corridor(
                request.source_country,
                request.dest_country,
            ));
        }

        let dest_currency = self.ctx.resolve_dest_currency(request)?;
        let params = [
            ("sendCountry", request.source_country.to_string()),
            ("sendCurrency", request.source_currency.to_string()),
            ("receiveCountry", request.dest_country.to_string()),
            ("receiveCurrency", dest_currency.to_string()),
            ("sendAmount", request.amount.to_string()),
        ];

        let body: serde_json::Value = retry_once(deadline, || {
            self.ctx
                .http
                .get_json_with_params(PRICING_URL, &params, deadline)
        })
        .await?;

        let response: PricingResponse = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::parsing(format!("unexpected pricing shape: {e}")))?;
        let raw_payload = request.options.include_raw.then_some(body);
        build_raw(&response, request, dest_currency, raw_payload)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> QuoteRequest {
        QuoteRequest::new(
            CountryCode::parse("US").unwrap(),
            CountryCode::parse("GT").unwrap(),
            CurrencyCode::parse("USD").unwrap(),
            dec!(500),
        )
    }

    fn fixture() -> PricingResponse {
        serde_json::from_str(
            r#"{
                "deliveries": [
                    {
                        "deliveryType": "PICKUP",
                        "paymentType": "DEBIT",
                        "preferred": false,
                        "totalFee": 9.99,
                        "exchangeRate": 7.65,
                        "wireAmount": 3825.00,
                        "minutesToDeliver": 15
                    },
                    {
                        "deliveryType": "DEPOSIT",
                        "paymentType": "BANK",
                        "preferred": true,
                        "totalFee": 4.99,
                        "exchangeRate": 7.70,
                        "wireAmount": 3850.00,
                        "minutesToDeliver": 1440
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn preferred_delivery_wins() {
        let raw = build_raw(
            &fixture(),
            &request(),
            CurrencyCode::parse("GTQ").unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(raw.fee, Some(dec!(4.99)));
        assert_eq!(raw.exchange_rate, Some(dec!(7.70)));
        assert_eq!(raw.delivery_method, DeliveryMethod::BankDeposit);
        assert_eq!(raw.payment_method, PaymentMethod::BankAccount);
    }

    #[test]
    fn empty_deliveries_is_unsupported() {
        let response: PricingResponse = serde_json::from_str(r#"{"deliveries": []}"#).unwrap();
        assert!(matches!(
            build_raw(&response, &request(), CurrencyCode::parse("GTQ").unwrap(), None),
            Err(ProviderError::UnsupportedCorridor { .. })
        ));
    }

    #[tokio::test]
    async fn out_of_footprint_corridor_fails_before_network() {
        let ctx = AdapterContext::new(std::sync::Arc::new(
            crate::domain::catalog::Catalog::new(),
        ))
        .unwrap();
        let adapter = IntermexAdapter::new(ctx);
        let request = QuoteRequest::new(
            CountryCode::parse("GB").unwrap(),
            CountryCode::parse("IN").unwrap(),
            CurrencyCode::parse("GBP").unwrap(),
            dec!(500),
        );
        let result = adapter
            .fetch_quote(
                &request,
                Deadline::within(std::time::Duration::from_secs(1)),
            )
            .await;
        assert!(matches!(
            result,
            Err(ProviderError::UnsupportedCorridor { .. })
        ));
    }

    #[test]
    fn method_token_mapping() {
        assert_eq!(map_payment("BANK"), PaymentMethod::BankAccount);
        assert_eq!(map_payment("debit"), PaymentMethod::DebitCard);
        assert_eq!(map_delivery("HOME_DELIVERY"), DeliveryMethod::HomeDelivery);
        assert_eq!(map_delivery("PIGEON"), DeliveryMethod::Unknown);
    }
}
