//! # Wise Adapter
//!
//! Integration with the Wise (formerly TransferWise) quoting API.
//!
//! Uses the unauthenticated `/v3/quotes/` endpoint when no API key is
//! configured; `WISE_API_KEY` switches on authenticated access. The
//! response carries one entry per payment-option combination; the
//! primary combination is chosen by the shared lowest-fee rule since
//! Wise marks no default.

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
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://api.transferwise.com";
const QUOTES_ENDPOINT: &str = "/v3/quotes/";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuotePayload {
    source_currency: String,
    target_currency: String,
    source_amount: Decimal,
    source_country: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    rate: Option<Decimal>,
    #[serde(default)]
    payment_options: Vec<PaymentOptionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentOptionEntry {
    #[serde(default)]
    disabled: bool,
    pay_in: String,
    pay_out: String,
    fee: FeeBlock,
    target_amount: Decimal,
    formatted_estimated_delivery: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct FeeBlock {
    total: Decimal,
}

/// Wise quoting adapter.
#[derive(Debug)]
pub struct WiseAdapter {
    ctx: AdapterContext,
    api_key: Option<String>,
}

impl WiseAdapter {
    /// Creates the adapter, picking up `WISE_API_KEY` when present.
    #[must_use]
    pub fn new(ctx: AdapterContext) -> Self {
        let api_key = ctx.credential("WISE_API_KEY");
        Self { ctx, api_key }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(key) = &self.api_key {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {key}")) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }
}

fn map_pay_in(token: &str) -> PaymentMethod {
    match token.to_ascii_uppercase().as_str() {
        "BANK_TRANSFER" => PaymentMethod::BankAccount,
        "DEBIT" => PaymentMethod::DebitCard,
        "CREDIT" => PaymentMethod::CreditCard,
        "CARD" => PaymentMethod::Card,
        "BALANCE" => PaymentMethod::Balance,
        "PISP" => PaymentMethod::OpenBanking,
        _ => PaymentMethod::Unknown,
    }
}

fn map_pay_out(token: &str) -> DeliveryMethod {
    match token.to_ascii_uppercase().as_str() {
        "BANK_TRANSFER" | "SWIFT" => DeliveryMethod::BankDeposit,
        "CASH_PICKUP" => DeliveryMethod::CashPickup,
        _ => DeliveryMethod::Unknown,
    }
}

/// Wise phrases its estimates as "in seconds", "by tomorrow", "by
/// Monday"; fold the common ones into the shared table's vocabulary.
fn delivery_minutes(text: &str) -> Option<u32> {
    let lowered = text.to_lowercase();
    if lowered.contains("second") || lowered.contains("instant") {
        return Some(10);
    }
    if lowered.contains("hours") {
        return Some(1440);
    }
    if lowered.contains("tomorrow") {
        return Some(1440);
    }
    delivery_time_from_text(&lowered)
}

fn build_raw(
    response: &QuoteResponse,
    request: &QuoteRequest,
    dest_currency: CurrencyCode,
    raw_payload: Option<serde_json::Value>,
) -> ProviderResult<RawQuote> {
    let candidates: Vec<CandidateOption> = response
        .payment_options
        .iter()
        .filter(|option| !option.disabled)
        .map(|option| CandidateOption {
            payment_method: map_pay_in(&option.pay_in),
            delivery_method: map_pay_out(&option.pay_out),
            fee: Some(option.fee.total),
            destination_amount: option.target_amount,
            exchange_rate: response.rate,
            delivery_time_minutes: option
                .formatted_estimated_delivery
                .as_deref()
                .and_then(delivery_minutes),
            is_default: false,
        })
        .collect();

    // An empty or fully-disabled option list is how Wise answers a
    // corridor it does not serve.
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
impl ProviderAdapter for WiseAdapter {
    fn id(&self) -> &'static str {
        "wise"
    }

    fn display_name(&self) -> &'static str {
        "Wise"
    }

    async fn fetch_quote(
        &self,
        request: &QuoteRequest,
        deadline: Deadline,
    ) -> ProviderResult<RawQuote> {
        let dest_currency = self.ctx.resolve_dest_currency(request)?;
        let payload = QuotePayload {
            source_currency: request.source_currency.to_string(),
            target_currency: dest_currency.to_string(),
            source_amount: request.amount,
            source_country: request.source_country.to_string(),
        };
        let url = format!("{BASE_URL}{QUOTES_ENDPOINT}");

        let body: serde_json::Value = retry_once(deadline, || {
            self.ctx
                .http
                .post_json_with_headers(&url, &payload, self.headers(), deadline)
        })
        .await?;

        let response: QuoteResponse = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::parsing(format!("unexpected quote shape: {e}")))?;
        let raw_payload = request.options.include_raw.then_some(body);
        build_raw(&response, request, dest_currency, raw_payload)
    }
}
