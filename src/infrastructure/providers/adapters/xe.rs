//! # XE Adapter
//!
//! Integration with the XE Money Transfer quoting API.
//!
//! XE returns one `individualQuotes` entry per transfer option and
//! marks its own default; that mark wins the primary-combination
//! selection. Rates and fees arrive as strings and go through the
//! locale-neutral decimal parser.

use crate::domain::entities::request::QuoteRequest;
use crate::domain::value_objects::{CurrencyCode, DeliveryMethod, PaymentMethod};
use crate::infrastructure::providers::context::AdapterContext;
use crate::infrastructure::providers::convert::{
    delivery_time_from_text, parse_decimal, select_primary, CandidateOption,
};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http::retry_once;
use crate::infrastructure::providers::traits::{Deadline, ProviderAdapter, RawQuote};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const QUOTES_URL: &str = "https://launchpad-api.xe.com/v2/quotes";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuotePayload {
    sell_ccy: String,
    buy_ccy: String,
    user_country: String,
    amount: Decimal,
    fixed_ccy: String,
    country_to: String,
}

#[derive(Debug, Clone, Deserialize)]
struct QuoteEnvelope {
    quote: Option<QuoteBody>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteBody {
    quote_status: Option<String>,
    #[serde(default)]
    individual_quotes: Vec<IndividualQuote>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndividualQuote {
    #[serde(default)]
    is_default: bool,
    #[serde(default)]
    is_enabled: bool,
    settlement_method: String,
    delivery_method: String,
    rate: String,
    transfer_fee: String,
    buy_amount: String,
    lead_time_text: Option<String>,
}

/// XE quoting adapter.
#[derive(Debug)]
pub struct XeAdapter {
    ctx: AdapterContext,
}

impl XeAdapter {
    /// Creates the adapter.
    #[must_use]
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

fn map_settlement(token: &str) -> PaymentMethod {
    match token.to_ascii_uppercase().as_str() {
        "BANK_TRANSFER" | "DIRECT_DEBIT" => PaymentMethod::BankAccount,
        "DEBIT_CARD" => PaymentMethod::DebitCard,
        "CREDIT_CARD" => PaymentMethod::CreditCard,
        "CARD" => PaymentMethod::Card,
        "OPEN_BANKING" => PaymentMethod::OpenBanking,
        _ => PaymentMethod::Unknown,
    }
}

fn map_delivery(token: &str) -> DeliveryMethod {
    match token.to_ascii_uppercase().as_str() {
        "BANK_ACCOUNT" | "BANK_DEPOSIT" => DeliveryMethod::BankDeposit,
        "CASH_PAYOUT" | "CASH_PICKUP" => DeliveryMethod::CashPickup,
        "MOBILE_WALLET" => DeliveryMethod::MobileWallet,
        _ => DeliveryMethod::Unknown,
    }
}

fn candidate_from(entry: &IndividualQuote) -> ProviderResult<CandidateOption> {
    Ok(CandidateOption {
        payment_method: map_settlement(&entry.settlement_method),
        delivery_method: map_delivery(&entry.delivery_method),
        fee: Some(parse_decimal(&entry.transfer_fee)?),
        destination_amount: parse_decimal(&entry.buy_amount)?,
        exchange_rate: Some(parse_decimal(&entry.rate)?),
        delivery_time_minutes: entry
            .lead_time_text
            .as_deref()
            .and_then(delivery_time_from_text),
        is_default: entry.is_default,
    })
}

fn build_raw(
    envelope: &QuoteEnvelope,
    request: &QuoteRequest,
    dest_currency: CurrencyCode,
    raw_payload: Option<serde_json::Value>,
) -> ProviderResult<RawQuote> {
    let Some(body) = &envelope.quote else {
        return Err(ProviderError::parsing("response missing quote object"));
    };
    // XE answers unsupported corridors with a non-Quoted status
    // instead of an HTTP error.
    match body.quote_status.as_deref() {
        Some("Quoted") | None => {}
        Some("NotQuoted" | "CurrencyPairNotSupported") => {
            return Err(ProviderError::unsupported_corridor(
                request.source_country,
                request.dest_country,
            ));
        }
        Some(other) => {
            return Err(ProviderError::api(format!("quote status {other}"), None));
        }
    }

    let candidates: Vec<CandidateOption> = body
        .individual_quotes
        .iter()
        .filter(|q| q.is_enabled)
        .map(candidate_from)
        .collect::<ProviderResult<_>>()?;

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
impl ProviderAdapter for XeAdapter {
    fn id(&self) -> &'static str {
        "xe"
    }

    fn display_name(&self) -> &'static str {
        "XE"
    }

    async fn fetch_quote(
        &self,
        request: &QuoteRequest,
        deadline: Deadline,
    ) -> ProviderResult<RawQuote> {
        let dest_currency = self.ctx.resolve_dest_currency(request)?;
        let payload = QuotePayload {
            sell_ccy: request.source_currency.to_string(),
            buy_ccy: dest_currency.to_string(),
            user_country: request.source_country.to_string(),
            amount: request.amount,
            fixed_ccy: request.source_currency.to_string(),
            country_to: request.dest_country.to_string(),
        };

        let body: serde_json::Value = retry_once(deadline, || {
            self.ctx.http.post_json(QUOTES_URL, &payload, deadline)
        })
        .await?;

        let envelope: QuoteEnvelope = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::parsing(format!("unexpected quote shape: {e}")))?;
        let raw_payload = request.options.include_raw.then_some(body);
        build_raw(&envelope, request, dest_currency, raw_payload)
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
            CountryCode::parse("IN").unwrap(),
            CurrencyCode::parse("GBP").unwrap(),
            dec!(500),
        )
    }

    fn fixture() -> QuoteEnvelope {
        serde_json::from_str(
            r#"{
                "quote": {
                    "quoteStatus": "Quoted",
                    "individualQuotes": [
                        {
                            "isDefault": false,
                            "isEnabled": true,
                            "settlementMethod": "DEBIT_CARD",
                            "deliveryMethod": "BANK_ACCOUNT",
                            "rate": "104.10",
                            "transferFee": "2.00",
                            "buyAmount": "51,842.05",
                            "leadTimeText": "1 business day"
                        },
                        {
                            "isDefault": true,
                            "isEnabled": true,
                            "settlementMethod": "BANK_TRANSFER",
                            "deliveryMethod": "BANK_ACCOUNT",
                            "rate": "103.99",
                            "transferFee": "0.00",
                            "buyAmount": "51,995.00",
                            "leadTimeText": "2 business days"
                        },
                        {
                            "isDefault": false,
                            "isEnabled": false,
                            "settlementMethod": "CREDIT_CARD",
                            "deliveryMethod": "BANK_ACCOUNT",
                            "rate": "104.20",
                            "transferFee": "5.00",
                            "buyAmount": "51,579.00",
                            "leadTimeText": "instant"
                        }
                    ]
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn provider_default_wins_selection() {
        let raw = build_raw(
            &fixture(),
            &request(),
            CurrencyCode::parse("INR").unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(raw.fee, Some(dec!(0.00)));
        assert_eq!(raw.exchange_rate, Some(dec!(103.99)));
        // Thousand separators stripped during parsing.
        assert_eq!(raw.destination_amount, dec!(51995.00));
        assert_eq!(raw.payment_method, PaymentMethod::BankAccount);
        assert_eq!(raw.delivery_time_minutes, Some(2880));
    }

    #[test]
    fn non_quoted_status_is_unsupported() {
        let envelope: QuoteEnvelope = serde_json::from_str(
            r#"{"quote": {"quoteStatus": "CurrencyPairNotSupported", "individualQuotes": []}}"#,
        )
        .unwrap();
        assert!(matches!(
            build_raw(&envelope, &request(), CurrencyCode::parse("INR").unwrap(), None),
            Err(ProviderError::UnsupportedCorridor { .. })
        ));
    }

    #[test]
    fn other_failure_status_is_api_error() {
        let envelope: QuoteEnvelope = serde_json::from_str(
            r#"{"quote": {"quoteStatus": "AmountTooSmall", "individualQuotes": []}}"#,
        )
        .unwrap();
        assert!(matches!(
            build_raw(&envelope, &request(), CurrencyCode::parse("INR").unwrap(), None),
            Err(ProviderError::Api { .. })
        ));
    }

    #[test]
    fn missing_quote_object_is_parsing_error() {
        let envelope: QuoteEnvelope = serde_json::from_str(r#"{"quote": null}"#).unwrap();
        assert!(matches!(
            build_raw(&envelope, &request(), CurrencyCode::parse("INR").unwrap(), None),
            Err(ProviderError::Parsing { .. })
        ));
    }

    #[test]
    fn garbled_amount_is_parsing_error() {
        let envelope: QuoteEnvelope = serde_json::from_str(
            r#"{
                "quote": {
                    "quoteStatus": "Quoted",
                    "individualQuotes": [{
                        "isDefault": true,
                        "isEnabled": true,
                        "settlementMethod": "BANK_TRANSFER",
                        "deliveryMethod": "BANK_ACCOUNT",
                        "rate": "around 104",
                        "transferFee": "0.00",
                        "buyAmount": "51995.00",
                        "leadTimeText": null
                    }]
                }
            }"#,
        )
        .unwrap();
        assert!(matches!(
            build_raw(&envelope, &request(), CurrencyCode::parse("INR").unwrap(), None),
            Err(ProviderError::Parsing { .. })
        ));
    }
}
