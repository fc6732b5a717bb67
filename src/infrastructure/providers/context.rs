//! # Adapter Context
//!
//! The narrow dependency bundle handed to every provider adapter:
//! the ISO catalog, the shared HTTP client, and credential lookup.
//! Adapters depend on nothing else from the application, which keeps
//! the dependency graph acyclic.

use crate::domain::catalog::Catalog;
use crate::domain::entities::request::QuoteRequest;
use crate::domain::value_objects::CurrencyCode;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::http::HttpClient;
use std::sync::Arc;

/// Shared dependencies for provider adapters.
#[derive(Debug, Clone)]
pub struct AdapterContext {
    /// ISO country/currency tables.
    pub catalog: Arc<Catalog>,
    /// Shared HTTP client.
    pub http: HttpClient,
}

impl AdapterContext {
    /// Creates a context over the given catalog with a fresh HTTP
    /// client.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the HTTP client cannot be
    /// built.
    pub fn new(catalog: Arc<Catalog>) -> ProviderResult<Self> {
        Ok(Self {
            catalog,
            http: HttpClient::new()?,
        })
    }

    /// Destination currency for a request, falling back to the
    /// destination country's catalog default.
    ///
    /// # Errors
    ///
    /// `ProviderError::InvalidParameter` when neither an explicit
    /// currency nor a catalog default exists.
    pub fn resolve_dest_currency(&self, request: &QuoteRequest) -> ProviderResult<CurrencyCode> {
        request
            .resolved_dest_currency(&self.catalog)
            .ok_or_else(|| {
                ProviderError::invalid_parameter(format!(
                    "no destination currency for country {}",
                    request.dest_country
                ))
            })
    }

    /// Reads a provider credential from the environment.
    ///
    /// Variable names mirror the provider id, e.g. `WISE_API_KEY`.
    #[must_use]
    pub fn credential(&self, var: &str) -> Option<String> {
        std::env::var(var).ok().filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::CountryCode;
    use rust_decimal_macros::dec;

    fn context() -> AdapterContext {
        AdapterContext::new(Arc::new(Catalog::new())).unwrap()
    }

    #[test]
    fn resolves_default_dest_currency() {
        let ctx = context();
        let request = QuoteRequest::new(
            CountryCode::parse("US").unwrap(),
            CountryCode::parse("PH").unwrap(),
            CurrencyCode::parse("USD").unwrap(),
            dec!(200),
        );
        assert_eq!(
            ctx.resolve_dest_currency(&request).unwrap(),
            CurrencyCode::parse("PHP").unwrap()
        );
    }

    #[test]
    fn explicit_dest_currency_short_circuits() {
        let ctx = context();
        let request = QuoteRequest::new(
            CountryCode::parse("US").unwrap(),
            CountryCode::parse("PH").unwrap(),
            CurrencyCode::parse("USD").unwrap(),
            dec!(200),
        )
        .with_dest_currency(CurrencyCode::parse("USD").unwrap());
        assert_eq!(
            ctx.resolve_dest_currency(&request).unwrap(),
            CurrencyCode::parse("USD").unwrap()
        );
    }

    #[test]
    fn unknown_country_is_invalid_parameter() {
        let ctx = context();
        let request = QuoteRequest::new(
            CountryCode::parse("US").unwrap(),
            CountryCode::parse("ZZ").unwrap(),
            CurrencyCode::parse("USD").unwrap(),
            dec!(200),
        );
        assert!(matches!(
            ctx.resolve_dest_currency(&request),
            Err(ProviderError::InvalidParameter { .. })
        ));
    }
}
