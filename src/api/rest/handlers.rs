//! # REST Handlers
//!
//! Request parsing, the client-facing rate limit, and the JSON error
//! envelope for the quote-comparison API.

use crate::application::services::Aggregator;
use crate::domain::entities::aggregate::AggregateResult;
use crate::domain::entities::request::{QuoteOptions, QuoteRequest};
use crate::domain::value_objects::{CountryCode, CurrencyCode, SortBy};
use crate::infrastructure::cache::store::ProviderMeta;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    /// The aggregation coordinator.
    pub aggregator: Arc<Aggregator>,
    /// Client-facing rate limiter.
    pub rate_limiter: Arc<SurfaceRateLimiter>,
}

/// Sliding-window limiter for the public API surface.
///
/// Providers handle their own upstream backoff; this guard only keeps
/// one client from monopolizing fan-out capacity.
#[derive(Debug)]
pub struct SurfaceRateLimiter {
    max_per_window: usize,
    window: Duration,
    hits: Mutex<VecDeque<Instant>>,
}

impl SurfaceRateLimiter {
    /// A limiter allowing `max_per_minute` requests per minute.
    #[must_use]
    pub fn per_minute(max_per_minute: usize) -> Self {
        Self {
            max_per_window: max_per_minute,
            window: Duration::from_secs(60),
            hits: Mutex::new(VecDeque::new()),
        }
    }

    /// Records a hit; false when the window budget is exhausted.
    pub fn allow(&self) -> bool {
        let Ok(mut hits) = self.hits.lock() else {
            return true;
        };
        let now = Instant::now();
        while hits
            .front()
            .is_some_and(|t| now.duration_since(*t) > self.window)
        {
            hits.pop_front();
        }
        if hits.len() >= self.max_per_window {
            return false;
        }
        hits.push_back(now);
        true
    }
}

/// JSON error envelope.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Always false.
    pub success: bool,
    /// Error payload.
    pub error: ErrorBody,
}

/// Error payload inside the envelope.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional extra detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: ErrorBody {
                code: code.to_string(),
                message: message.into(),
                details: None,
            },
        }),
    )
        .into_response()
}

/// Query parameters for `GET /api/quotes/`.
#[derive(Debug, Deserialize)]
pub struct QuotesQuery {
    /// Sender country, alpha-2.
    pub source_country: String,
    /// Recipient country, alpha-2.
    pub dest_country: String,
    /// Sender currency, ISO-4217.
    pub source_currency: String,
    /// Recipient currency, ISO-4217; defaults per destination country.
    pub dest_currency: Option<String>,
    /// Amount to send.
    pub amount: String,
    /// Sort criterion token.
    pub sort_by: Option<String>,
    /// Fee ceiling.
    pub max_fee: Option<String>,
    /// Delivery-time ceiling, minutes.
    pub max_delivery_time_minutes: Option<u32>,
    /// Bypass cache reads.
    pub force_refresh: Option<bool>,
    /// Comma-separated provider ids to include.
    pub include_providers: Option<String>,
    /// Comma-separated provider ids to exclude.
    pub exclude_providers: Option<String>,
    /// Attach original provider payloads.
    pub include_raw: Option<bool>,
}

fn csv_set(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Translates the query string into a domain request.
///
/// # Errors
///
/// A human-readable message for the 400 envelope.
pub fn parse_quotes_query(query: &QuotesQuery) -> Result<QuoteRequest, String> {
    let source_country = CountryCode::parse(&query.source_country)
        .map_err(|e| format!("source_country: {e}"))?;
    let dest_country =
        CountryCode::parse(&query.dest_country).map_err(|e| format!("dest_country: {e}"))?;
    let source_currency = CurrencyCode::parse(&query.source_currency)
        .map_err(|e| format!("source_currency: {e}"))?;
    let amount =
        Decimal::from_str(query.amount.trim()).map_err(|_| format!("amount: {}", query.amount))?;

    let mut options = QuoteOptions::default();
    if let Some(sort) = &query.sort_by {
        options.sort_by = SortBy::from_str(sort).map_err(|e| e.to_string())?;
    }
    if let Some(max_fee) = &query.max_fee {
        options.max_fee =
            Some(Decimal::from_str(max_fee.trim()).map_err(|_| format!("max_fee: {max_fee}"))?);
    }
    options.max_delivery_time_minutes = query.max_delivery_time_minutes;
    options.force_refresh = query.force_refresh.unwrap_or(false);
    options.include_raw = query.include_raw.unwrap_or(false);
    if let Some(include) = &query.include_providers {
        let set = csv_set(include);
        if !set.is_empty() {
            options.include_providers = Some(set);
        }
    }
    if let Some(exclude) = &query.exclude_providers {
        options.exclude_providers = csv_set(exclude);
    }

    let mut request = QuoteRequest::new(source_country, dest_country, source_currency, amount)
        .with_options(options);
    if let Some(dest_ccy) = &query.dest_currency {
        request.dest_currency =
            Some(CurrencyCode::parse(dest_ccy).map_err(|e| format!("dest_currency: {e}"))?);
    }
    Ok(request)
}

/// `GET /api/quotes/`
pub async fn get_quotes(
    State(state): State<AppState>,
    Query(query): Query<QuotesQuery>,
) -> Response {
    if !state.rate_limiter.allow() {
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "RateLimit",
            "client request rate exceeded",
        );
    }

    let request = match parse_quotes_query(&query) {
        Ok(request) => request,
        Err(message) => {
            return error_response(StatusCode::BAD_REQUEST, "InvalidParameter", message);
        }
    };

    let result: AggregateResult = state.aggregator.get_all_quotes(request).await;
    if !result.success {
        let message = result
            .errors
            .values()
            .next()
            .map(|f| f.error_message.clone())
            .unwrap_or_else(|| "invalid request".to_string());
        return error_response(StatusCode::BAD_REQUEST, "InvalidParameter", message);
    }
    Json(result).into_response()
}

/// One row of `GET /api/providers/`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderInfo {
    /// Stable id.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
}

/// `GET /api/providers/`
pub async fn list_providers(State(state): State<AppState>) -> Json<Vec<ProviderInfo>> {
    let providers = state
        .aggregator
        .registry()
        .display_names()
        .into_iter()
        .map(|(id, display_name)| ProviderInfo {
            id: id.to_string(),
            display_name: display_name.to_string(),
        })
        .collect();
    Json(providers)
}

/// Body of `GET /api/providers/{id}/`.
#[derive(Debug, Serialize)]
pub struct ProviderDetail {
    /// Stable id.
    pub id: String,
    /// Human-readable name.
    pub display_name: String,
    /// Current enable flag.
    pub enabled: bool,
    /// Declared corridors, when the adapter publishes them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_corridors: Option<Vec<(String, String)>>,
}

/// `GET /api/providers/{id}/`
pub async fn get_provider(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let registry = state.aggregator.registry();
    let Some(display_name) = registry.display_name(&id) else {
        return error_response(
            StatusCode::NOT_FOUND,
            "UnknownProvider",
            format!("no provider registered as {id}"),
        );
    };

    let enabled = registry.is_enabled(&id);
    let supported_corridors = registry.build(&id).ok().and_then(|adapter| {
        adapter.supported_corridors().map(|corridors| {
            corridors
                .into_iter()
                .map(|(s, d)| (s.to_string(), d.to_string()))
                .collect()
        })
    });

    // Keep the provider metadata namespace warm for observability.
    state
        .aggregator
        .cache()
        .put_provider_meta(ProviderMeta {
            provider_id: id.clone(),
            enabled,
        })
        .await;

    Json(ProviderDetail {
        id,
        display_name: display_name.to_string(),
        enabled,
        supported_corridors,
    })
    .into_response()
}

/// `GET /api/health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base_query() -> QuotesQuery {
        QuotesQuery {
            source_country: "us".to_string(),
            dest_country: "MX".to_string(),
            source_currency: "usd".to_string(),
            dest_currency: None,
            amount: "1000.00".to_string(),
            sort_by: None,
            max_fee: None,
            max_delivery_time_minutes: None,
            force_refresh: None,
            include_providers: None,
            exclude_providers: None,
            include_raw: None,
        }
    }

    #[test]
    fn parses_minimal_query() {
        let request = parse_quotes_query(&base_query()).unwrap();
        assert_eq!(request.source_country.as_str(), "US");
        assert_eq!(request.source_currency.as_str(), "USD");
        assert_eq!(request.amount, Decimal::from(1000));
        assert!(!request.options.force_refresh);
    }

    #[test]
    fn parses_full_option_set() {
        let mut query = base_query();
        query.sort_by = Some("lowest_fee".to_string());
        query.max_fee = Some("2.50".to_string());
        query.max_delivery_time_minutes = Some(1440);
        query.force_refresh = Some(true);
        query.include_providers = Some("wise, xe".to_string());
        query.exclude_providers = Some("paysend".to_string());

        let request = parse_quotes_query(&query).unwrap();
        assert_eq!(request.options.sort_by, SortBy::LowestFee);
        assert_eq!(request.options.max_fee, Some(Decimal::new(250, 2)));
        assert_eq!(request.options.max_delivery_time_minutes, Some(1440));
        assert!(request.options.force_refresh);
        let include = request.options.include_providers.unwrap();
        assert!(include.contains("wise") && include.contains("xe"));
        assert!(request.options.exclude_providers.contains("paysend"));
    }

    #[test]
    fn rejects_bad_tokens() {
        let mut query = base_query();
        query.sort_by = Some("cheapest".to_string());
        assert!(parse_quotes_query(&query).is_err());

        let mut query = base_query();
        query.amount = "lots".to_string();
        assert!(parse_quotes_query(&query).is_err());

        let mut query = base_query();
        query.source_country = "USA".to_string();
        assert!(parse_quotes_query(&query).is_err());
    }

    #[test]
    fn rate_limiter_enforces_window() {
        let limiter = SurfaceRateLimiter::per_minute(3);
        assert!(limiter.allow());
        assert!(limiter.allow());
        assert!(limiter.allow());
        assert!(!limiter.allow());
    }
}
