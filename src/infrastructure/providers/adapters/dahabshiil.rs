//! # Dahabshiil Adapter
//!
//! Integration with the Dahabshiil transfer-charges API (East Africa
//! and Gulf corridors).
//!
//! The API formats every figure as a display string with thousand
//! separators ("1,155,000.00"), so all numerics go through the
//! locale-neutral parser.

use crate::domain::entities::request::QuoteRequest;
use crate::domain::value_objects::{CurrencyCode, DeliveryMethod, PaymentMethod};
use crate::infrastructure::providers::context::AdapterContext;
use crate::infrastructure::providers::convert::parse_decimal;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http::retry_once;
use crate::infrastructure::providers::traits::{Deadline, ProviderAdapter, RawQuote};
use async_trait::async_trait;
use serde::Deserialize;

const CHARGES_URL: &str = "https://apigw.dahabshiil.com/remit/transfer/charges";

/// Destinations Dahabshiil pays out in, alpha-2.
const RECEIVE_COUNTRIES: &[&str] = &["SO", "ET", "KE", "UG", "TZ", "SD", "EG", "IN", "PK", "PH"];

#[derive(Debug, Clone, Deserialize)]
struct ChargesResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<ChargesData>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChargesData {
    rate: String,
    commission: String,
    receive_amount: String,
    #[serde(default)]
    payout_type: Option<String>,
}

/// Dahabshiil charges adapter.
#[derive(Debug)]
pub struct DahabshiilAdapter {
    ctx: AdapterContext,
}

impl DahabshiilAdapter {
    /// Creates the adapter.
    #[must_use]
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

fn map_payout(token: Option<&str>) -> DeliveryMethod {
    match token.map(str::to_ascii_lowercase).as_deref() {
        Some("bank") | Some("account_deposit") => DeliveryMethod::BankDeposit,
        Some("cash") | Some("cash_collection") => DeliveryMethod::CashPickup,
        Some("wallet") | Some("mobile_money") => DeliveryMethod::MobileWallet,
        _ => DeliveryMethod::CashPickup,
    }
}

fn build_raw(
    response: &ChargesResponse,
    request: &QuoteRequest,
    dest_currency: CurrencyCode,
    raw_payload: Option<serde_json::Value>,
) -> ProviderResult<RawQuote> {
    if !response.status.eq_ignore_ascii_case("success") {
        let message = response
            .message
            .clone()
            .unwrap_or_else(|| format!("status {}", response.status));
        if message.to_lowercase().contains("corridor") {
            return Err(ProviderError::unsupported_corridor(
                request.source_country,
                request.dest_country,
            ));
        }
        return Err(ProviderError::api(message, None));
    }
    let Some(data) = &response.data else {
        return Err(ProviderError::parsing("charges response missing data"));
    };

    Ok(RawQuote {
        send_amount: request.amount,
        source_currency: request.source_currency,
        destination_amount: parse_decimal(&data.receive_amount)?,
        destination_currency: dest_currency,
        exchange_rate: Some(parse_decimal(&data.rate)?),
        fee: Some(parse_decimal(&data.commission)?),
        payment_method: PaymentMethod::BankAccount,
        delivery_method: map_payout(data.payout_type.as_deref()),
        // Cash payouts across the network are same-day.
        delivery_time_minutes: Some(480),
        raw: raw_payload,
    })
}

#[async_trait]
impl ProviderAdapter for DahabshiilAdapter {
    fn id(&self) -> &'static str {
        "dahabshiil"
    }

    fn display_name(&self) -> &'static str {
        "Dahabshiil"
    }

    async fn fetch_quote(
        &self,
        request: &QuoteRequest,
        deadline: Deadline,
    ) -> ProviderResult<RawQuote> {
        if !RECEIVE_COUNTRIES.contains(&request.dest_country.as_str()) {
            return Err(ProviderError::unsupported_corridor(
                request.source_country,
                request.dest_country,
            ));
        }

        let dest_currency = self.ctx.resolve_dest_currency(request)?;
        let params = [
            ("source_country", request.source_country.to_string()),
            ("source_currency", request.source_currency.to_string()),
            ("destination_country", request.dest_country.to_string()),
            ("destination_currency", dest_currency.to_string()),
            ("amount", request.amount.to_string()),
            ("type", "send".to_string()),
        ];

        let body: serde_json::Value = retry_once(deadline, || {
            self.ctx
                .http
                .get_json_with_params(CHARGES_URL, &params, deadline)
        })
        .await?;

        let response: ChargesResponse = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::parsing(format!("unexpected charges shape: {e}")))?;
        let raw_payload = request.options.include_raw.then_some(body);
        build_raw(&response, request, dest_currency, raw_payload)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::CountryCode;
    use rust_decimal_macros::dec;

    fn request() -> QuoteRequest {
        QuoteRequest::new(
            CountryCode::parse("GB").unwrap(),
            CountryCode::parse("KE").unwrap(),
            CurrencyCode::parse("GBP").unwrap(),
            dec!(250),
        )
    }

    #[test]
    fn parses_separator_formatted_figures() {
        let response: ChargesResponse = serde_json::from_str(
            r#"{
                "status": "SUCCESS",
                "data": {
                    "rate": "161.50",
                    "commission": "7.50",
                    "receive_amount": "40,375.00",
                    "payout_type": "mobile_money"
                }
            }"#,
        )
        .unwrap();
        let raw = build_raw(
            &response,
            &request(),
            CurrencyCode::parse("KES").unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(raw.destination_amount, dec!(40375.00));
        assert_eq!(raw.exchange_rate, Some(dec!(161.50)));
        assert_eq!(raw.fee, Some(dec!(7.50)));
        assert_eq!(raw.delivery_method, DeliveryMethod::MobileWallet);
    }

    #[test]
    fn corridor_failure_message() {
        let response: ChargesResponse = serde_json::from_str(
            r#"{"status": "FAILED", "message": "Corridor not available"}"#,
        )
        .unwrap();
        assert!(matches!(
            build_raw(&response, &request(), CurrencyCode::parse("KES").unwrap(), None),
            Err(ProviderError::UnsupportedCorridor { .. })
        ));
    }

    #[test]
    fn other_failures_are_api_errors() {
        let response: ChargesResponse = serde_json::from_str(
            r#"{"status": "FAILED", "message": "Service temporarily closed"}"#,
        )
        .unwrap();
        assert!(matches!(
            build_raw(&response, &request(), CurrencyCode::parse("KES").unwrap(), None),
            Err(ProviderError::Api { .. })
        ));
    }

    #[tokio::test]
    async fn out_of_footprint_destination_fails_before_network() {
        let ctx = AdapterContext::new(std::sync::Arc::new(
            crate::domain::catalog::Catalog::new(),
        ))
        .unwrap();
        let adapter = DahabshiilAdapter::new(ctx);
        let request = QuoteRequest::new(
            CountryCode::parse("GB").unwrap(),
            CountryCode::parse("MX").unwrap(),
            CurrencyCode::parse("GBP").unwrap(),
            dec!(250),
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
    fn garbled_rate_is_parsing_error() {
        let response: ChargesResponse = serde_json::from_str(
            r#"{
                "status": "SUCCESS",
                "data": {
                    "rate": "approx 160",
                    "commission": "7.50",
                    "receive_amount": "40,375.00"
                }
            }"#,
        )
        .unwrap();
        assert!(matches!(
            build_raw(&response, &request(), CurrencyCode::parse("KES").unwrap(), None),
            Err(ProviderError::Parsing { .. })
        ));
    }
}
