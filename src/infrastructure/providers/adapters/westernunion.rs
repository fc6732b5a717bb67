//! # Western Union Adapter
//!
//! Integration with the Western Union price-catalog API.
//!
//! The catalog answers with one service entry per funding-payout
//! combination; Western Union marks its recommended service, which
//! wins the primary selection.

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
use serde::{Deserialize, Serialize};

const CATALOG_URL: &str = "https://www.westernunion.com/router/api/price-catalog";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogPayload {
    sender_country: String,
    sender_currency: String,
    receiver_country: String,
    receiver_currency: String,
    send_amount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogResponse {
    #[serde(default)]
    services: Vec<ServiceEntry>,
    #[serde(default)]
    error_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServiceEntry {
    pay_in: String,
    pay_out: String,
    #[serde(default)]
    recommended: bool,
    charges: Decimal,
    exchange_rate: Decimal,
    receive_amount: Decimal,
    speed: Option<String>,
}

/// Western Union price-catalog adapter.
#[derive(Debug)]
pub struct WesternUnionAdapter {
    ctx: AdapterContext,
}

impl WesternUnionAdapter {
    /// Creates the adapter.
    #[must_use]
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

fn map_pay_in(token: &str) -> PaymentMethod {
    match token.to_ascii_uppercase().as_str() {
        "BANK" | "BANK_ACCOUNT" | "ACH" => PaymentMethod::BankAccount,
        "DEBIT_CARD" => PaymentMethod::DebitCard,
        "CREDIT_CARD" => PaymentMethod::CreditCard,
        "CASH" => PaymentMethod::Cash,
        _ => PaymentMethod::Unknown,
    }
}

fn map_pay_out(token: &str) -> DeliveryMethod {
    match token.to_ascii_uppercase().as_str() {
        "BANK" | "BANK_ACCOUNT" => DeliveryMethod::BankDeposit,
        "CASH" | "AGENT_LOCATION" => DeliveryMethod::CashPickup,
        "WALLET" | "MOBILE_WALLET" => DeliveryMethod::MobileWallet,
        _ => DeliveryMethod::Unknown,
    }
}

/// WU speed strings: "MINUTES", "SAME DAY", "NEXT DAY", "2-5 DAYS".
fn speed_minutes(text: &str) -> Option<u32> {
    let lowered = text.to_lowercase();
    match lowered.as_str() {
        "minutes" => Some(10),
        "same day" => Some(480),
        "next day" => Some(1440),
        _ => {
            if lowered.contains("2-5") {
                return Some(5040);
            }
            delivery_time_from_text(&lowered)
        }
    }
}

fn build_raw(
    response: &CatalogResponse,
    request: &QuoteRequest,
    dest_currency: CurrencyCode,
    raw_payload: Option<serde_json::Value>,
) -> ProviderResult<RawQuote> {
    if let Some(code) = &response.error_code {
        if code == "CORRIDOR_NOT_SUPPORTED" {
            return Err(ProviderError::unsupported_corridor(
                request.source_country,
                request.dest_country,
            ));
        }
        return Err(ProviderError::api(format!("catalog error {code}"), None));
    }

    let candidates: Vec<CandidateOption> = response
        .services
        .iter()
        .map(|service| CandidateOption {
            payment_method: map_pay_in(&service.pay_in),
            delivery_method: map_pay_out(&service.pay_out),
            fee: Some(service.charges),
            destination_amount: service.receive_amount,
            exchange_rate: Some(service.exchange_rate),
            delivery_time_minutes: service.speed.as_deref().and_then(speed_minutes),
            is_default: service.recommended,
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
impl ProviderAdapter for WesternUnionAdapter {
    fn id(&self) -> &'static str {
        "westernunion"
    }

    fn display_name(&self) -> &'static str {
        "Western Union"
    }

    async fn fetch_quote(
        &self,
        request: &QuoteRequest,
        deadline: Deadline,
    ) -> ProviderResult<RawQuote> {
        let dest_currency = self.ctx.resolve_dest_currency(request)?;
        let payload = CatalogPayload {
            sender_country: request.source_country.to_string(),
            sender_currency: request.source_currency.to_string(),
            receiver_country: request.dest_country.to_string(),
            receiver_currency: dest_currency.to_string(),
            send_amount: request.amount,
        };

        let body: serde_json::Value = retry_once(deadline, || {
            self.ctx.http.post_json(CATALOG_URL, &payload, deadline)
        })
        .await?;

        let response: CatalogResponse = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::parsing(format!("unexpected catalog shape: {e}")))?;
        let raw_payload = request.options.include_raw.then_some(body);
        build_raw(&response, request, dest_currency, raw_payload)
    }
}
