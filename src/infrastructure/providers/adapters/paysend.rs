//! # Paysend Adapter
//!
//! Integration with Paysend's public calculator endpoint.
//!
//! Paysend charges a flat fee per corridor and pays out to cards; the
//! calculator returns a single offer rather than an option grid.

use crate::domain::entities::request::QuoteRequest;
use crate::domain::value_objects::{CurrencyCode, DeliveryMethod, PaymentMethod};
use crate::infrastructure::providers::context::AdapterContext;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http::retry_once;
use crate::infrastructure::providers::traits::{Deadline, ProviderAdapter, RawQuote};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

const CALCULATOR_URL: &str = "https://paysend.com/api/v1/transfer/calculate";

#[derive(Debug, Clone, Deserialize)]
struct CalculatorResponse {
    success: bool,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    exchange_rate: Option<Decimal>,
    #[serde(default)]
    fee: Option<Decimal>,
    #[serde(default)]
    receive_amount: Option<Decimal>,
    #[serde(default)]
    delivery_time_minutes: Option<u32>,
}

/// Paysend calculator adapter.
#[derive(Debug)]
pub struct PaysendAdapter {
    ctx: AdapterContext,
}

impl PaysendAdapter {
    /// Creates the adapter.
    #[must_use]
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

fn build_raw(
    response: &CalculatorResponse,
    request: &QuoteRequest,
    dest_currency: CurrencyCode,
    raw_payload: Option<serde_json::Value>,
) -> ProviderResult<RawQuote> {
    if !response.success {
        let message = response
            .error_message
            .clone()
            .unwrap_or_else(|| "calculator returned an error".to_string());
        // Paysend phrases unsupported corridors as a calculator error.
        if message.to_lowercase().contains("not supported")
            || message.to_lowercase().contains("unavailable")
        {
            return Err(ProviderError::unsupported_corridor(
                request.source_country,
                request.dest_country,
            ));
        }
        return Err(ProviderError::api(message, None));
    }

    let Some(receive_amount) = response.receive_amount else {
        return Err(ProviderError::parsing("calculator omitted receive_amount"));
    };

    Ok(RawQuote {
        send_amount: request.amount,
        source_currency: request.source_currency,
        destination_amount: receive_amount,
        destination_currency: dest_currency,
        exchange_rate: response.exchange_rate,
        fee: response.fee,
        payment_method: PaymentMethod::Card,
        delivery_method: DeliveryMethod::DebitCardDeposit,
        delivery_time_minutes: response.delivery_time_minutes.or(Some(10)),
        raw: raw_payload,
    })
}

#[async_trait]
impl ProviderAdapter for PaysendAdapter {
    fn id(&self) -> &'static str {
        "paysend"
    }

    fn display_name(&self) -> &'static str {
        "Paysend"
    }

    async fn fetch_quote(
        &self,
        request: &QuoteRequest,
        deadline: Deadline,
    ) -> ProviderResult<RawQuote> {
        let dest_currency = self.ctx.resolve_dest_currency(request)?;
        let params = [
            ("from_currency", request.source_currency.to_string()),
            ("to_currency", dest_currency.to_string()),
            ("from_country", request.source_country.to_string()),
            ("to_country", request.dest_country.to_string()),
            ("amount", request.amount.to_string()),
        ];

        let body: serde_json::Value = retry_once(deadline, || {
            self.ctx
                .http
                .get_json_with_params(CALCULATOR_URL, &params, deadline)
        })
        .await?;

        let response: CalculatorResponse = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::parsing(format!("unexpected calculator shape: {e}")))?;
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
            CountryCode::parse("PH").unwrap(),
            CurrencyCode::parse("GBP").unwrap(),
            dec!(200),
        )
    }

    #[test]
    fn successful_calculation() {
        let response: CalculatorResponse = serde_json::from_str(
            r#"{
                "success": true,
                "exchange_rate": 71.25,
                "fee": 1.50,
                "receive_amount": 14250.00,
                "delivery_time_minutes": 15
            }"#,
        )
        .unwrap();
        let raw = build_raw(
            &response,
            &request(),
            CurrencyCode::parse("PHP").unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(raw.destination_amount, dec!(14250.00));
        assert_eq!(raw.fee, Some(dec!(1.50)));
        assert_eq!(raw.delivery_method, DeliveryMethod::DebitCardDeposit);
        assert_eq!(raw.delivery_time_minutes, Some(15));
    }

    #[test]
    fn unsupported_corridor_message() {
        let response: CalculatorResponse = serde_json::from_str(
            r#"{"success": false, "error_message": "Corridor not supported"}"#,
        )
        .unwrap();
        assert!(matches!(
            build_raw(&response, &request(), CurrencyCode::parse("PHP").unwrap(), None),
            Err(ProviderError::UnsupportedCorridor { .. })
        ));
    }

    #[test]
    fn other_calculator_errors_are_api_errors() {
        let response: CalculatorResponse = serde_json::from_str(
            r#"{"success": false, "error_message": "Amount below minimum"}"#,
        )
        .unwrap();
        assert!(matches!(
            build_raw(&response, &request(), CurrencyCode::parse("PHP").unwrap(), None),
            Err(ProviderError::Api { .. })
        ));
    }

    #[test]
    fn missing_receive_amount_is_parsing_error() {
        let response: CalculatorResponse =
            serde_json::from_str(r#"{"success": true, "exchange_rate": 71.25}"#).unwrap();
        assert!(matches!(
            build_raw(&response, &request(), CurrencyCode::parse("PHP").unwrap(), None),
            Err(ProviderError::Parsing { .. })
        ));
    }

    #[test]
    fn card_delivery_defaults_to_fast() {
        let response: CalculatorResponse = serde_json::from_str(
            r#"{"success": true, "exchange_rate": 71.25, "fee": 1.50, "receive_amount": 14250.00}"#,
        )
        .unwrap();
        let raw = build_raw(
            &response,
            &request(),
            CurrencyCode::parse("PHP").unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(raw.delivery_time_minutes, Some(10));
    }
}
