//! # KoronaPay Adapter
//!
//! Integration with the KoronaPay tariff API (Europe → Asia corridors).
//!
//! KoronaPay identifies countries by alpha-3 codes and currencies by
//! ISO numeric ids, and quotes amounts in integer cents. The adapter
//! owns those conversions; the corridor tables below are the service's
//! published coverage, so unsupported corridors are detected before any
//! network call.

use crate::domain::entities::request::QuoteRequest;
use crate::domain::value_objects::{CountryCode, CurrencyCode, DeliveryMethod, PaymentMethod};
use crate::infrastructure::providers::context::AdapterContext;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http::retry_once;
use crate::infrastructure::providers::traits::{Deadline, ProviderAdapter, RawQuote};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

const BASE_URL: &str = "https://koronapay.com/api";
const API_VERSION: &str = "v2.138";

/// ISO-4217 numeric ids for the currencies KoronaPay serves.
const CURRENCY_IDS: &[(&str, &str)] = &[
    ("EUR", "978"),
    ("USD", "840"),
    ("TRY", "949"),
    ("IDR", "360"),
    ("GBP", "826"),
    ("PLN", "985"),
    ("CZK", "203"),
    ("RON", "946"),
    ("VND", "704"),
    ("PHP", "608"),
    ("THB", "764"),
    ("MYR", "458"),
];

/// Sending side: European countries, alpha-2.
const SEND_COUNTRIES: &[&str] = &[
    "AT", "BE", "CZ", "DE", "DK", "ES", "FI", "FR", "GB", "GR", "HU", "IE", "IT", "NL", "NO",
    "PL", "PT", "RO", "SE", "SK",
];

/// Receiving side, alpha-2.
const RECEIVE_COUNTRIES: &[&str] = &["ID", "MY", "PH", "TH", "TR", "VN"];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TariffEntry {
    sending_amount: i64,
    receiving_amount: i64,
    exchange_rate: Decimal,
    sending_commission: i64,
    #[serde(default)]
    receiving_method: Option<String>,
}

/// KoronaPay tariff adapter.
#[derive(Debug)]
pub struct KoronaPayAdapter {
    ctx: AdapterContext,
}

impl KoronaPayAdapter {
    /// Creates the adapter.
    #[must_use]
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(accept) =
            HeaderValue::from_str(&format!("application/vnd.cft-data.{API_VERSION}+json"))
        {
            headers.insert(reqwest::header::ACCEPT, accept);
        }
        headers.insert("x-application", HeaderValue::from_static("Qpay-Web/3.0"));
        if let Ok(request_id) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
            headers.insert("Request-ID", request_id);
        }
        headers
    }

    fn currency_id(currency: CurrencyCode) -> Option<&'static str> {
        CURRENCY_IDS
            .iter()
            .find(|(code, _)| *code == currency.as_str())
            .map(|(_, id)| *id)
    }
}

fn cents(amount: Decimal) -> i64 {
    use rust_decimal::prelude::ToPrimitive;
    (amount * Decimal::from(100)).trunc().to_i64().unwrap_or(0)
}

fn from_cents(value: i64) -> Decimal {
    Decimal::from(value) / Decimal::from(100)
}

fn map_receiving_method(token: Option<&str>) -> DeliveryMethod {
    match token.map(str::to_ascii_lowercase).as_deref() {
        Some("cash") => DeliveryMethod::CashPickup,
        Some("card") => DeliveryMethod::DebitCardDeposit,
        _ => DeliveryMethod::CashPickup,
    }
}

fn build_raw(
    tariffs: &[TariffEntry],
    request: &QuoteRequest,
    dest_currency: CurrencyCode,
    raw_payload: Option<serde_json::Value>,
) -> ProviderResult<RawQuote> {
    let Some(tariff) = tariffs.first() else {
        return Err(ProviderError::unsupported_corridor(
            request.source_country,
            request.dest_country,
        ));
    };

    Ok(RawQuote {
        send_amount: from_cents(tariff.sending_amount),
        source_currency: request.source_currency,
        destination_amount: from_cents(tariff.receiving_amount),
        destination_currency: dest_currency,
        exchange_rate: Some(tariff.exchange_rate),
        fee: Some(from_cents(tariff.sending_commission)),
        payment_method: PaymentMethod::DebitCard,
        delivery_method: map_receiving_method(tariff.receiving_method.as_deref()),
        // KoronaPay cash pickups are available as soon as the transfer
        // is paid for.
        delivery_time_minutes: Some(10),
        raw: raw_payload,
    })
}

#[async_trait]
impl ProviderAdapter for KoronaPayAdapter {
    fn id(&self) -> &'static str {
        "koronapay"
    }

    fn display_name(&self) -> &'static str {
        "KoronaPay"
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
        let sending_currency = Self::currency_id(request.source_currency).ok_or_else(|| {
            ProviderError::invalid_parameter(format!(
                "currency not served: {}",
                request.source_currency
            ))
        })?;
        let receiving_currency = Self::currency_id(dest_currency).ok_or_else(|| {
            ProviderError::invalid_parameter(format!("currency not served: {dest_currency}"))
        })?;

        let sending_country = self
            .ctx
            .catalog
            .country(request.source_country)
            .map(|c| c.iso3)
            .ok_or_else(|| ProviderError::invalid_parameter("unknown source country"))?;
        let receiving_country = self
            .ctx
            .catalog
            .country(request.dest_country)
            .map(|c| c.iso3)
            .ok_or_else(|| ProviderError::invalid_parameter("unknown destination country"))?;

        let params = [
            ("sendingCountryId", sending_country.to_string()),
            ("receivingCountryId", receiving_country.to_string()),
            ("sendingCurrencyId", sending_currency.to_string()),
            ("receivingCurrencyId", receiving_currency.to_string()),
            ("paymentMethod", "debitCard".to_string()),
            ("receivingMethod", "cash".to_string()),
            ("paidNotificationEnabled", "false".to_string()),
            ("sendingAmount", cents(request.amount).to_string()),
        ];

        let url = format!("{BASE_URL}/transfers/tariffs");
        let body: serde_json::Value = retry_once(deadline, || {
            self.ctx
                .http
                .get_json_with_headers(&url, &params, Self::headers(), deadline)
        })
        .await?;

        let tariffs: Vec<TariffEntry> = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::parsing(format!("unexpected tariff shape: {e}")))?;
        let raw_payload = request.options.include_raw.then_some(body);
        build_raw(&tariffs, request, dest_currency, raw_payload)
    }
}
