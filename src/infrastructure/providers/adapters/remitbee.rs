//! # Remitbee Adapter
//!
//! Integration with Remitbee's public multi-currency rates API
//! (Canada-outbound corridors only).
//!
//! Remitbee publishes amount-banded rates per destination: a base band
//! and a better rate above a promotional threshold. The shared tier
//! selection picks the band containing the requested amount.

use crate::domain::entities::request::QuoteRequest;
use crate::domain::value_objects::{CurrencyCode, DeliveryMethod, PaymentMethod};
use crate::infrastructure::providers::context::AdapterContext;
use crate::infrastructure::providers::convert::{delivery_time_from_text, select_tier, RateTier};
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http::retry_once;
use crate::infrastructure::providers::traits::{Deadline, ProviderAdapter, RawQuote};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;

const RATES_URL: &str =
    "https://api.remitbee.com/public-services/online-rates-multi-currency";

#[derive(Debug, Clone, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    rates: Vec<CountryRates>,
}

#[derive(Debug, Clone, Deserialize)]
struct CountryRates {
    country_to: String,
    currency_code: String,
    #[serde(default)]
    tiers: Vec<TierEntry>,
    #[serde(default)]
    transfer_fee: Option<Decimal>,
    #[serde(default)]
    delivery_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TierEntry {
    min_amount: Decimal,
    max_amount: Decimal,
    rate: Decimal,
}

/// Remitbee rates adapter.
#[derive(Debug)]
pub struct RemitbeeAdapter {
    ctx: AdapterContext,
}

impl RemitbeeAdapter {
    /// Creates the adapter.
    #[must_use]
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }
}

fn build_raw(
    response: &RatesResponse,
    request: &QuoteRequest,
    dest_currency: CurrencyCode,
    raw_payload: Option<serde_json::Value>,
) -> ProviderResult<RawQuote> {
    let Some(country) = response.rates.iter().find(|r| {
        r.country_to.eq_ignore_ascii_case(request.dest_country.as_str())
            && r.currency_code.eq_ignore_ascii_case(dest_currency.as_str())
    }) else {
        return Err(ProviderError::unsupported_corridor(
            request.source_country,
            request.dest_country,
        ));
    };

    let tiers: Vec<RateTier> = country
        .tiers
        .iter()
        .map(|t| RateTier {
            min: t.min_amount,
            max: t.max_amount,
            rate: t.rate,
        })
        .collect();
    let Some(tier) = select_tier(&tiers, request.amount) else {
        return Err(ProviderError::api(
            format!("no rate band covers amount {}", request.amount),
            None,
        ));
    };

    let delivery_time_minutes = country
        .delivery_text
        .as_deref()
        .and_then(delivery_time_from_text);

    Ok(RawQuote {
        send_amount: request.amount,
        source_currency: request.source_currency,
        destination_amount: request.amount * tier.rate,
        destination_currency: dest_currency,
        exchange_rate: Some(tier.rate),
        fee: country.transfer_fee,
        payment_method: PaymentMethod::BankAccount,
        delivery_method: DeliveryMethod::BankDeposit,
        delivery_time_minutes,
        raw: raw_payload,
    })
}

#[async_trait]
impl ProviderAdapter for RemitbeeAdapter {
    fn id(&self) -> &'static str {
        "remitbee"
    }

    fn display_name(&self) -> &'static str {
        "Remitbee"
    }

    async fn fetch_quote(
        &self,
        request: &QuoteRequest,
        deadline: Deadline,
    ) -> ProviderResult<RawQuote> {
        // Remitbee only sends from Canada in CAD.
        if request.source_country.as_str() != "CA" || request.source_currency.as_str() != "CAD" {
            return Err(ProviderError::unsupported_corridor(
                request.source_country,
                request.dest_country,
            ));
        }

        let dest_currency = self.ctx.resolve_dest_currency(request)?;
        let body: serde_json::Value = retry_once(deadline, || {
            self.ctx.http.get_json(RATES_URL, deadline)
        })
        .await?;

        let response: RatesResponse = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::parsing(format!("unexpected rates shape: {e}")))?;
        let raw_payload = request.options.include_raw.then_some(body);
        build_raw(&response, request, dest_currency, raw_payload)
    }
}
