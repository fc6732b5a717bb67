//! # SingX Adapter
//!
//! Integration with the SingX quoting API.
//!
//! SingX serves a small, published corridor set out of Singapore,
//! Australia, and Hong Kong, declared up front so the executor can
//! skip the network for everything else.

use crate::domain::entities::request::QuoteRequest;
use crate::domain::value_objects::{CountryCode, CurrencyCode, DeliveryMethod, PaymentMethod};
use crate::infrastructure::providers::context::AdapterContext;
use crate::infrastructure::providers::convert::delivery_time_from_text;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http::retry_once;
use crate::infrastructure::providers::traits::{Deadline, ProviderAdapter, RawQuote};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const QUOTE_URL: &str = "https://api.singx.co/api/v1/public/quote";

/// Published corridor list: (source, destination), alpha-2.
const CORRIDORS: &[(&str, &str)] = &[
    ("SG", "IN"),
    ("SG", "PH"),
    ("SG", "ID"),
    ("SG", "MY"),
    ("SG", "TH"),
    ("SG", "VN"),
    ("SG", "BD"),
    ("SG", "LK"),
    ("AU", "IN"),
    ("AU", "PH"),
    ("AU", "ID"),
    ("HK", "IN"),
    ("HK", "PH"),
];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QuotePayload {
    source_country: String,
    source_currency: String,
    destination_country: String,
    destination_currency: String,
    amount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteResponse {
    exchange_rate: Decimal,
    fee: Decimal,
    receive_amount: Decimal,
    #[serde(default)]
    transfer_time: Option<String>,
}

/// SingX quoting adapter.
#[derive(Debug)]
pub struct SingXAdapter {
    ctx: AdapterContext,
}

impl SingXAdapter {
    /// Creates the adapter.
    #[must_use]
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    fn corridor_served(source: CountryCode, dest: CountryCode) -> bool {
        CORRIDORS
            .iter()
            .any(|(s, d)| *s == source.as_str() && *d == dest.as_str())
    }
}

/// SingX reports "Within 1 working day" style estimates.
fn transfer_minutes(text: &str) -> Option<u32> {
    let lowered = text.to_lowercase();
    if lowered.contains("working day") || lowered.contains("business day") {
        if lowered.contains('1') {
            return Some(1440);
        }
        if lowered.contains('2') {
            return Some(2880);
        }
    }
    delivery_time_from_text(&lowered)
}

fn build_raw(
    response: &QuoteResponse,
    request: &QuoteRequest,
    dest_currency: CurrencyCode,
    raw_payload: Option<serde_json::Value>,
) -> RawQuote {
    RawQuote {
        send_amount: request.amount,
        source_currency: request.source_currency,
        destination_amount: response.receive_amount,
        destination_currency: dest_currency,
        exchange_rate: Some(response.exchange_rate),
        fee: Some(response.fee),
        payment_method: PaymentMethod::BankAccount,
        delivery_method: DeliveryMethod::BankDeposit,
        delivery_time_minutes: response.transfer_time.as_deref().and_then(transfer_minutes),
        raw: raw_payload,
    }
}

#[async_trait]
impl ProviderAdapter for SingXAdapter {
    fn id(&self) -> &'static str {
        "singx"
    }

    fn display_name(&self) -> &'static str {
        "SingX"
    }

    fn supported_corridors(&self) -> Option<Vec<(CountryCode, CountryCode)>> {
        Some(
            CORRIDORS
                .iter()
                .filter_map(|(s, d)| {
                    match (CountryCode::parse(s), CountryCode::parse(d)) {
                        (Ok(source), Ok(dest)) => Some((source, dest)),
                        _ => None,
                    }
                })
                .collect(),
        )
    }

    async fn fetch_quote(
        &self,
        request: &QuoteRequest,
        deadline: Deadline,
    ) -> ProviderResult<RawQuote> {
        if !Self::corridor_served(request.source_country, request.dest_country) {
            return Err(ProviderError::unsupported_corridor(
                request.source_country,
                request.dest_country,
            ));
        }

        let dest_currency = self.ctx.resolve_dest_currency(request)?;
        let payload = QuotePayload {
            source_country: request.source_country.to_string(),
            source_currency: request.source_currency.to_string(),
            destination_country: request.dest_country.to_string(),
            destination_currency: dest_currency.to_string(),
            amount: request.amount,
        };

        let body: serde_json::Value = retry_once(deadline, || {
            self.ctx.http.post_json(QUOTE_URL, &payload, deadline)
        })
        .await?;

        let response: QuoteResponse = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::parsing(format!("unexpected quote shape: {e}")))?;
        let raw_payload = request.options.include_raw.then_some(body);
        Ok(build_raw(&response, request, dest_currency, raw_payload))
    }
}
