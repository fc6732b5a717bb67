//! # TransferGo Adapter
//!
//! Integration with the TransferGo booking quotes API.
//!
//! The response lists delivery options with nested `{value, currency}`
//! money objects and free-text delivery estimates ("1-2 business
//! days", "within 30 minutes"); the estimate parser below handles
//! TransferGo's phrasings before falling back to the shared table.

use crate::domain::entities::request::QuoteRequest;
use crate::domain::value_objects::{CurrencyCode, DeliveryMethod, PaymentMethod};
use crate::infrastructure::providers::context::AdapterContext;
use crate::infrastructure::providers::convert::{
    delivery_time_from_text, select_primary, CandidateOption,
};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http::retry_once;
use crate::infrastructure::providers::traits::{Deadline, ProviderAdapter, RawQuote};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

const QUOTES_URL: &str = "https://my.transfergo.com/api/booking/quotes";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuotesResponse {
    #[serde(default)]
    delivery_options: Vec<DeliveryOptionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeliveryOptionEntry {
    code: String,
    #[serde(default)]
    is_default: bool,
    fee: MoneyValue,
    rate: Decimal,
    receiving_amount: MoneyValue,
    delivery_time: Option<String>,
    pay_in_method: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct MoneyValue {
    value: Decimal,
}

/// TransferGo quoting adapter.
#[derive(Debug)]
pub struct TransferGoAdapter {
    ctx: AdapterContext,
}

impl TransferGoAdapter {
    /// Creates the adapter.
    #[must_use]
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

/// TransferGo's estimates: "within 30 minutes", "1-2 business days",
/// "same day", "tomorrow". Ranges average out; the shared table covers
/// the rest.
fn parse_delivery_time(text: &str) -> Option<u32> {
    let lowered = text.to_lowercase();

    if let Some(prefix) = lowered.split(" minute").next() {
        if lowered.contains("minute") {
            if let Some(value) = prefix.split_whitespace().last().and_then(|n| n.parse::<u32>().ok())
            {
                return Some(value);
            }
        }
    }
    if lowered.contains("hour") {
        if let Some(prefix) = lowered.split(" hour").next() {
            if let Some(value) = prefix.split_whitespace().last().and_then(|n| n.parse::<u32>().ok())
            {
                return Some(value * 60);
            }
        }
    }
    if lowered.contains("day") && lowered.contains('-') {
        let range = lowered.split("day").next().unwrap_or_default();
        let mut parts = range.trim().split('-');
        if let (Some(min), Some(max)) = (parts.next(), parts.next()) {
            if let (Ok(min), Ok(max)) = (
                min.trim().parse::<u32>(),
                max.trim().split_whitespace().next().unwrap_or("").parse::<u32>(),
            ) {
                return Some((min + max) * 1440 / 2);
            }
        }
    }
    if lowered.contains("same day") || lowered.contains("today") {
        return Some(480);
    }
    delivery_time_from_text(&lowered)
}

fn map_pay_in(token: Option<&str>) -> PaymentMethod {
    match token.map(str::to_ascii_uppercase).as_deref() {
        Some("BANK_TRANSFER") => PaymentMethod::BankAccount,
        Some("CARD") => PaymentMethod::Card,
        Some("DEBIT_CARD") => PaymentMethod::DebitCard,
        Some("CREDIT_CARD") => PaymentMethod::CreditCard,
        _ => PaymentMethod::Unknown,
    }
}

fn map_option_code(code: &str) -> DeliveryMethod {
    match code.to_ascii_uppercase().as_str() {
        "NOW" | "STANDARD" | "BANK_TRANSFER" => DeliveryMethod::BankDeposit,
        "CASH" => DeliveryMethod::CashPickup,
        "WALLET" => DeliveryMethod::MobileWallet,
        _ => DeliveryMethod::Unknown,
    }
}

fn build_raw(
    response: &QuotesResponse,
    request: &QuoteRequest,
    dest_currency: CurrencyCode,
    raw_payload: Option<serde_json::Value>,
) -> ProviderResult<RawQuote> {
    let candidates: Vec<CandidateOption> = response
        .delivery_options
        .iter()
        .map(|option| CandidateOption {
            payment_method: map_pay_in(option.pay_in_method.as_deref()),
            delivery_method: map_option_code(&option.code),
            fee: Some(option.fee.value),
            destination_amount: option.receiving_amount.value,
            exchange_rate: Some(option.rate),
            delivery_time_minutes: option.delivery_time.as_deref().and_then(parse_delivery_time),
            is_default: option.is_default,
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
impl ProviderAdapter for TransferGoAdapter {
    fn id(&self) -> &'static str {
        "transfergo"
    }

    fn display_name(&self) -> &'static str {
        "TransferGo"
    }

    async fn fetch_quote(
        &self,
        request: &QuoteRequest,
        deadline: Deadline,
    ) -> ProviderResult<RawQuote> {
        let dest_currency = self.ctx.resolve_dest_currency(request)?;
        let params = [
            ("fromCurrencyCode", request.source_currency.to_string()),
            ("toCurrencyCode", dest_currency.to_string()),
            ("fromCountryCode", request.source_country.to_string()),
            ("toCountryCode", request.dest_country.to_string()),
            ("amount", request.amount.to_string()),
            ("calculationBase", "sendAmount".to_string()),
        ];

        let body: serde_json::Value = retry_once(deadline, || {
            self.ctx.http.get_json_with_params(QUOTES_URL, &params, deadline)
        })
        .await?;

        let response: QuotesResponse = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::parsing(format!("unexpected quotes shape: {e}")))?;
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
            CountryCode::parse("DE").unwrap(),
            CountryCode::parse("UA").unwrap(),
            CurrencyCode::parse("EUR").unwrap(),
            dec!(1000),
        )
    }

    fn fixture() -> QuotesResponse {
        serde_json::from_str(
            r#"{
                "deliveryOptions": [
                    {
                        "code": "NOW",
                        "isDefault": false,
                        "fee": {"value": 2.99, "currency": "EUR"},
                        "rate": 40.10,
                        "receivingAmount": {"value": 39980.09, "currency": "UAH"},
                        "deliveryTime": "within 30 minutes",
                        "payInMethod": "CARD"
                    },
                    {
                        "code": "STANDARD",
                        "isDefault": true,
                        "fee": {"value": 0.99, "currency": "EUR"},
                        "rate": 40.25,
                        "receivingAmount": {"value": 40210.15, "currency": "UAH"},
                        "deliveryTime": "1-2 business days",
                        "payInMethod": "BANK_TRANSFER"
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn default_option_wins() {
        let raw = build_raw(
            &fixture(),
            &request(),
            CurrencyCode::parse("UAH").unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(raw.fee, Some(dec!(0.99)));
        assert_eq!(raw.exchange_rate, Some(dec!(40.25)));
        assert_eq!(raw.payment_method, PaymentMethod::BankAccount);
        assert_eq!(raw.delivery_method, DeliveryMethod::BankDeposit);
        // 1-2 business days averages to 2160 minutes.
        assert_eq!(raw.delivery_time_minutes, Some(2160));
    }

    #[test]
    fn no_options_means_unsupported() {
        let response: QuotesResponse =
            serde_json::from_str(r#"{"deliveryOptions": []}"#).unwrap();
        assert!(matches!(
            build_raw(&response, &request(), CurrencyCode::parse("UAH").unwrap(), None),
            Err(ProviderError::UnsupportedCorridor { .. })
        ));
    }

    #[test]
    fn delivery_phrases() {
        assert_eq!(parse_delivery_time("within 30 minutes"), Some(30));
        assert_eq!(parse_delivery_time("2 hours"), Some(120));
        assert_eq!(parse_delivery_time("1-2 business days"), Some(2160));
        assert_eq!(parse_delivery_time("same day"), Some(480));
        assert_eq!(parse_delivery_time("instant"), Some(10));
        assert_eq!(parse_delivery_time("whenever"), None);
    }

    #[test]
    fn option_code_mapping() {
        assert_eq!(map_option_code("NOW"), DeliveryMethod::BankDeposit);
        assert_eq!(map_option_code("cash"), DeliveryMethod::CashPickup);
        assert_eq!(map_option_code("WALLET"), DeliveryMethod::MobileWallet);
        assert_eq!(map_option_code("DRONE"), DeliveryMethod::Unknown);
    }
}
