//! # Configuration
//!
//! Environment-driven settings, loaded once at process start by the
//! composition root. Every knob has a default so a bare environment
//! still boots.

use crate::application::services::executor::ExecutorConfig;
use crate::application::services::AggregatorConfig;
use crate::infrastructure::cache::CacheConfig;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Process-wide configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TTL for aggregate quote cache entries, seconds.
    pub quote_cache_ttl_secs: u64,
    /// TTL for corridor-support entries, seconds.
    pub corridor_cache_ttl_secs: u64,
    /// TTL for provider metadata entries, seconds.
    pub provider_cache_ttl_secs: u64,
    /// Upper bound of TTL jitter, seconds.
    pub jitter_max_seconds: u64,
    /// Per-adapter deadline, milliseconds.
    pub per_provider_timeout_ms: u64,
    /// Worker pool cap for fan-out, when set.
    pub aggregator_max_workers: Option<usize>,
    /// Upper bound on request amounts.
    pub max_send_amount: Decimal,
    /// HTTP server bind address.
    pub bind_addr: String,
    /// Client-facing requests per minute at the API surface.
    pub surface_rate_limit_per_minute: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quote_cache_ttl_secs: 1800,
            corridor_cache_ttl_secs: 43_200,
            provider_cache_ttl_secs: 86_400,
            jitter_max_seconds: 300,
            per_provider_timeout_ms: 30_000,
            aggregator_max_workers: None,
            max_send_amount: Decimal::from(1_000_000u32),
            bind_addr: "0.0.0.0:8000".to_string(),
            surface_rate_limit_per_minute: 120,
        }
    }
}

impl AppConfig {
    /// Reads configuration from the environment, falling back to
    /// defaults for unset or unparseable variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            quote_cache_ttl_secs: env_parse("QUOTE_CACHE_TTL", defaults.quote_cache_ttl_secs),
            corridor_cache_ttl_secs: env_parse(
                "CORRIDOR_CACHE_TTL",
                defaults.corridor_cache_ttl_secs,
            ),
            provider_cache_ttl_secs: env_parse(
                "PROVIDER_CACHE_TTL",
                defaults.provider_cache_ttl_secs,
            ),
            jitter_max_seconds: env_parse("JITTER_MAX_SECONDS", defaults.jitter_max_seconds),
            per_provider_timeout_ms: env_parse(
                "PER_PROVIDER_TIMEOUT_MS",
                defaults.per_provider_timeout_ms,
            ),
            aggregator_max_workers: env_opt("AGGREGATOR_MAX_WORKERS"),
            max_send_amount: env_parse("MAX_SEND_AMOUNT", defaults.max_send_amount),
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            surface_rate_limit_per_minute: env_parse(
                "SURFACE_RATE_LIMIT_PER_MINUTE",
                defaults.surface_rate_limit_per_minute,
            ),
        }
    }

    /// Cache TTL policy derived from this configuration.
    #[must_use]
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            quote_ttl: Duration::from_secs(self.quote_cache_ttl_secs),
            corridor_ttl: Duration::from_secs(self.corridor_cache_ttl_secs),
            provider_ttl: Duration::from_secs(self.provider_cache_ttl_secs),
            jitter_max: Duration::from_secs(self.jitter_max_seconds),
        }
    }

    /// Executor defaults derived from this configuration.
    #[must_use]
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            per_provider_timeout: Duration::from_millis(self.per_provider_timeout_ms),
            max_workers: self.aggregator_max_workers,
        }
    }

    /// Coordinator tuning derived from this configuration.
    #[must_use]
    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            max_amount: self.max_send_amount,
            ..AggregatorConfig::default()
        }
    }
}

fn env_parse<T: FromStr + Copy>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!(var, %value, "unparseable environment value, using default");
            default
        }),
        Err(_) => default,
    }
}

fn env_opt<T: FromStr>(var: &str) -> Option<T> {
    std::env::var(var).ok().and_then(|v| v.parse().ok())
}
