//! # Aggregator Coordinator
//!
//! End-to-end orchestration: validate → cache probe → single-flight →
//! fan-out → normalize → filter/sort → cache store → respond.
//!
//! The coordinator owns no I/O of its own; it composes the catalog,
//! registry, executor, normalizer, pipeline, and cache it was built
//! with. Only request validation can fail the aggregate; provider
//! failures become per-provider failed quotes.

use crate::application::services::executor::{CancelToken, FanOutExecutor};
use crate::application::services::normalizer::Normalizer;
use crate::application::services::pipeline::filter_and_sort;
use crate::domain::catalog::Catalog;
use crate::domain::entities::aggregate::{AggregateResult, ProviderFailure};
use crate::domain::entities::quote::Quote;
use crate::domain::entities::request::QuoteRequest;
use crate::domain::value_objects::{CurrencyCode, ErrorKind, Timestamp};
use crate::infrastructure::cache::quote_cache::QuoteCache;
use crate::infrastructure::cache::single_flight::{Flight, FlightGuard, SingleFlight};
use crate::infrastructure::cache::store::CachedAggregate;
use crate::infrastructure::cache::key::quote_key;
use crate::infrastructure::providers::registry::ProviderRegistry;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Coordinator tuning.
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Upper bound on request amounts.
    pub max_amount: Decimal,
    /// Slack added on top of the per-provider timeout for the overall
    /// call bound and the single-flight follower wait.
    pub slack: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_amount: Decimal::from(1_000_000u32),
            slack: Duration::from_millis(1500),
        }
    }
}

/// The aggregation coordinator.
#[derive(Debug)]
pub struct Aggregator {
    catalog: Arc<Catalog>,
    registry: Arc<ProviderRegistry>,
    cache: Arc<QuoteCache>,
    single_flight: SingleFlight,
    executor: FanOutExecutor,
    normalizer: Normalizer,
    config: AggregatorConfig,
}

impl Aggregator {
    /// Wires the coordinator from its injected collaborators.
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        registry: Arc<ProviderRegistry>,
        cache: Arc<QuoteCache>,
        executor: FanOutExecutor,
        config: AggregatorConfig,
    ) -> Self {
        let normalizer = Normalizer::new(Arc::clone(&catalog));
        Self {
            catalog,
            registry,
            cache,
            single_flight: SingleFlight::new(),
            executor,
            normalizer,
            config,
        }
    }

    /// The registry this coordinator dispatches over.
    #[must_use]
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// The cache this coordinator reads and writes.
    #[must_use]
    pub fn cache(&self) -> &Arc<QuoteCache> {
        &self.cache
    }

    /// Fetches quotes for a request, uncancellable.
    pub async fn get_all_quotes(&self, request: QuoteRequest) -> AggregateResult {
        self.get_all_quotes_cancellable(request, CancelToken::never())
            .await
    }

    /// Fetches quotes for a request; `cancel` propagates to every
    /// in-flight adapter and suppresses the cache write.
    pub async fn get_all_quotes_cancellable(
        &self,
        request: QuoteRequest,
        cancel: CancelToken,
    ) -> AggregateResult {
        let started = Instant::now();

        if let Err(error) = request.validate(&self.catalog, self.config.max_amount) {
            info!(%error, "request rejected before fan-out");
            return AggregateResult::invalid_parameter(
                request.summary(None),
                error.to_string(),
                elapsed_ms(started),
            );
        }
        let Some(dest_currency) = request.resolved_dest_currency(&self.catalog) else {
            return AggregateResult::invalid_parameter(
                request.summary(None),
                "destination currency could not be resolved",
                elapsed_ms(started),
            );
        };

        let cache_key = quote_key(
            request.source_country,
            request.dest_country,
            request.source_currency,
            dest_currency,
            request.amount,
        );

        if request.options.force_refresh {
            // Reads and single-flight are bypassed; the write still happens.
            return self
                .fan_out(request, dest_currency, cache_key, cancel, started, None)
                .await;
        }

        if let Some(hit) = self.cache.get_quote(&cache_key).await {
            debug!(key = %cache_key, "quote cache hit");
            return self.serve_cached(hit, &request, dest_currency, started);
        }

        match self.single_flight.begin(&cache_key) {
            Flight::Leader(guard) => {
                self.fan_out(request, dest_currency, cache_key, cancel, started, Some(guard))
                    .await
            }
            Flight::Follower(follower) => {
                follower.wait(self.follower_wait(&request)).await;
                if let Some(hit) = self.cache.get_quote(&cache_key).await {
                    debug!(key = %cache_key, "quote cache hit after single-flight wait");
                    return self.serve_cached(hit, &request, dest_currency, started);
                }
                // Leader produced nothing cacheable; proceed alone.
                self.fan_out(request, dest_currency, cache_key, cancel, started, None)
                    .await
            }
        }
    }

    fn follower_wait(&self, request: &QuoteRequest) -> Duration {
        let per_provider = request
            .options
            .per_provider_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(super::executor::DEFAULT_PER_PROVIDER_TIMEOUT);
        per_provider + self.config.slack
    }

    fn serve_cached(
        &self,
        hit: CachedAggregate,
        request: &QuoteRequest,
        dest_currency: CurrencyCode,
        started: Instant,
    ) -> AggregateResult {
        // The stored entry is keyed by corridor and amount only; the
        // caller's filters and sort are re-applied to the stored
        // provider set.
        let (quotes, filters_applied) = filter_and_sort(&hit.all_providers, &request.options);
        AggregateResult {
            success: true,
            request: request.summary(Some(dest_currency)),
            elapsed_ms: elapsed_ms(started),
            cache_hit: true,
            timestamp: Timestamp::now(),
            filters_applied,
            all_providers: hit.all_providers,
            quotes,
            errors: hit.errors,
        }
    }

    async fn fan_out(
        &self,
        request: QuoteRequest,
        dest_currency: CurrencyCode,
        cache_key: String,
        cancel: CancelToken,
        started: Instant,
        guard: Option<FlightGuard>,
    ) -> AggregateResult {
        // Held for the duration of the fan-out; dropping it wakes
        // single-flight followers.
        let _guard = guard;

        let adapters = self.registry.build_active(
            request.options.include_providers.as_ref(),
            &request.options.exclude_providers,
        );
        info!(
            providers = adapters.len(),
            corridor = %format_args!("{}->{}", request.source_country, request.dest_country),
            "starting fan-out"
        );

        let request = Arc::new(request);
        let outcomes = self
            .executor
            .dispatch(adapters, Arc::clone(&request), cancel.clone())
            .await;

        let all_providers: Vec<Quote> = outcomes
            .into_iter()
            .map(|outcome| {
                self.normalizer.normalize(
                    outcome.provider_id,
                    outcome.display_name,
                    &request,
                    dest_currency,
                    outcome.result,
                )
            })
            .collect();

        let errors: BTreeMap<String, ProviderFailure> = all_providers
            .iter()
            .filter(|q| !q.success)
            .map(|q| {
                (
                    q.provider_id.clone(),
                    ProviderFailure {
                        error_kind: q.error_kind.unwrap_or(ErrorKind::Internal),
                        error_message: q
                            .error_message
                            .clone()
                            .unwrap_or_else(|| "unknown failure".to_string()),
                    },
                )
            })
            .collect();

        let (quotes, filters_applied) = filter_and_sort(&all_providers, &request.options);

        let cancelled = cancel.is_cancelled();
        if !cancelled && has_definitive_answer(&all_providers) {
            self.cache
                .put_quote(
                    cache_key,
                    CachedAggregate {
                        request: request.summary(Some(dest_currency)),
                        filters_applied: filters_applied.clone(),
                        all_providers: all_providers.clone(),
                        quotes: quotes.clone(),
                        errors: errors.clone(),
                        stored_at: Timestamp::now(),
                    },
                )
                .await;
            self.write_corridor_support(&request, &all_providers).await;
        }

        info!(
            total = all_providers.len(),
            successful = quotes.len(),
            cancelled,
            "fan-out complete"
        );

        AggregateResult {
            success: true,
            request: request.summary(Some(dest_currency)),
            elapsed_ms: elapsed_ms(started),
            cache_hit: false,
            timestamp: Timestamp::now(),
            filters_applied,
            all_providers,
            quotes,
            errors,
        }
    }

    async fn write_corridor_support(&self, request: &QuoteRequest, all_providers: &[Quote]) {
        let any_success = all_providers.iter().any(|q| q.success);
        if any_success {
            self.cache
                .put_corridor(request.source_country, request.dest_country, true)
                .await;
            return;
        }
        let all_unsupported = !all_providers.is_empty()
            && all_providers
                .iter()
                .all(|q| q.error_kind == Some(ErrorKind::UnsupportedCorridor));
        if all_unsupported {
            self.cache
                .put_corridor(request.source_country, request.dest_country, false)
                .await;
        }
    }
}

/// True when the run produced something worth caching: a successful
/// quote or a definitive corridor verdict. Purely transient failures
/// would poison the cache.
fn has_definitive_answer(all_providers: &[Quote]) -> bool {
    all_providers
        .iter()
        .any(|q| q.success || q.error_kind.is_some_and(ErrorKind::is_definitive))
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::executor::{cancel_pair, ExecutorConfig};
    use crate::domain::entities::request::QuoteRequest;
    use crate::domain::value_objects::{
        CountryCode, DeliveryMethod, PaymentMethod, SortBy,
    };
    use crate::infrastructure::cache::memory::InMemoryCacheStore;
    use crate::infrastructure::cache::quote_cache::CacheConfig;
    use crate::infrastructure::providers::context::AdapterContext;
    use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
    use crate::infrastructure::providers::traits::{Deadline, ProviderAdapter, RawQuote};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone)]
    enum Behavior {
        Quote {
            rate: Decimal,
            fee: Decimal,
            minutes: Option<u32>,
        },
        Unsupported,
        Sleep(Duration),
        Connection,
    }

    #[derive(Debug)]
    struct MockAdapter {
        id: &'static str,
        behavior: Behavior,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ProviderAdapter for MockAdapter {
        fn id(&self) -> &'static str {
            self.id
        }

        fn display_name(&self) -> &'static str {
            "Mock"
        }

        async fn fetch_quote(
            &self,
            request: &QuoteRequest,
            _deadline: Deadline,
        ) -> ProviderResult<RawQuote> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Quote { rate, fee, minutes } => Ok(RawQuote {
                    send_amount: request.amount,
                    source_currency: request.source_currency,
                    destination_amount: request.amount * rate,
                    destination_currency: CurrencyCode::parse("MXN")
                        .unwrap(),
                    exchange_rate: Some(*rate),
                    fee: Some(*fee),
                    payment_method: PaymentMethod::BankAccount,
                    delivery_method: DeliveryMethod::BankDeposit,
                    delivery_time_minutes: *minutes,
                    raw: None,
                }),
                Behavior::Unsupported => Err(ProviderError::unsupported_corridor(
                    request.source_country,
                    request.dest_country,
                )),
                Behavior::Sleep(delay) => {
                    tokio::time::sleep(*delay).await;
                    Err(ProviderError::internal("should have been cut off"))
                }
                Behavior::Connection => Err(ProviderError::connection("connect refused")),
            }
        }
    }

    struct Harness {
        aggregator: Aggregator,
        calls: BTreeMap<&'static str, Arc<AtomicUsize>>,
    }

    fn harness(providers: Vec<(&'static str, Behavior)>) -> Harness {
        let catalog = Arc::new(Catalog::new());
        let context = AdapterContext::new(Arc::clone(&catalog)).unwrap();
        let mut registry = ProviderRegistry::new(context);
        let mut calls = BTreeMap::new();

        for (id, behavior) in providers {
            let counter = Arc::new(AtomicUsize::new(0));
            calls.insert(id, Arc::clone(&counter));
            let adapter: Arc<dyn ProviderAdapter> = Arc::new(MockAdapter {
                id,
                behavior,
                calls: counter,
            });
            registry.register(id, "Mock", Arc::new(move |_ctx| Arc::clone(&adapter)));
        }

        let cache = Arc::new(QuoteCache::new(
            Arc::new(InMemoryCacheStore::new()),
            CacheConfig {
                jitter_max: Duration::ZERO,
                ..CacheConfig::default()
            },
        ));
        let aggregator = Aggregator::new(
            catalog,
            Arc::new(registry),
            cache,
            FanOutExecutor::new(ExecutorConfig::default()),
            AggregatorConfig::default(),
        );
        Harness { aggregator, calls }
    }

    fn request(source: &str, dest: &str, source_ccy: &str, amount: Decimal) -> QuoteRequest {
        QuoteRequest::new(
            CountryCode::parse(source).unwrap(),
            CountryCode::parse(dest).unwrap(),
            CurrencyCode::parse(source_ccy).unwrap(),
            amount,
        )
    }

    #[tokio::test]
    async fn happy_path_sorts_by_best_rate() {
        let harness = harness(vec![
            (
                "p1",
                Behavior::Quote {
                    rate: dec!(17.94),
                    fee: dec!(8.42),
                    minutes: Some(1440),
                },
            ),
            (
                "p2",
                Behavior::Quote {
                    rate: dec!(17.78),
                    fee: dec!(0),
                    minutes: Some(2880),
                },
            ),
            ("p3", Behavior::Unsupported),
        ]);

        let result = harness
            .aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(1000)))
            .await;

        assert!(result.success);
        assert!(!result.cache_hit);
        assert_eq!(result.all_providers.len(), 3);
        let order: Vec<&str> = result
            .all_providers
            .iter()
            .map(|q| q.provider_id.as_str())
            .collect();
        assert_eq!(order, vec!["p1", "p2", "p3"]);

        let sorted: Vec<&str> = result.quotes.iter().map(|q| q.provider_id.as_str()).collect();
        assert_eq!(sorted, vec!["p1", "p2"]);
        assert_eq!(
            result.errors.get("p3").unwrap().error_kind,
            ErrorKind::UnsupportedCorridor
        );
    }

    #[tokio::test]
    async fn max_fee_filter_drops_paid_quotes() {
        let harness = harness(vec![
            (
                "free",
                Behavior::Quote {
                    rate: dec!(103.99),
                    fee: dec!(0),
                    minutes: Some(1440),
                },
            ),
            (
                "paid",
                Behavior::Quote {
                    rate: dec!(104.10),
                    fee: dec!(2),
                    minutes: Some(1440),
                },
            ),
            ("down", Behavior::Connection),
        ]);

        let mut req = request("GB", "IN", "GBP", dec!(500));
        req.options.max_fee = Some(dec!(0));
        let result = harness.aggregator.get_all_quotes(req).await;

        assert_eq!(result.all_providers.len(), 3);
        assert_eq!(result.quotes.len(), 1);
        assert_eq!(result.quotes[0].provider_id, "free");
        assert!(result
            .all_providers
            .iter()
            .any(|q| q.provider_id == "paid" && q.success));
    }

    #[tokio::test]
    async fn invalid_amount_short_circuits() {
        let harness = harness(vec![(
            "p1",
            Behavior::Quote {
                rate: dec!(17.94),
                fee: dec!(1),
                minutes: None,
            },
        )]);

        let result = harness
            .aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(-1)))
            .await;

        assert!(!result.success);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors.values().next().unwrap().error_kind,
            ErrorKind::InvalidParameter
        );
        assert_eq!(harness.calls["p1"].load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_identical_call_hits_cache() {
        let harness = harness(vec![(
            "p1",
            Behavior::Quote {
                rate: dec!(17.94),
                fee: dec!(1),
                minutes: Some(60),
            },
        )]);

        let first = harness
            .aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(1000)))
            .await;
        assert!(!first.cache_hit);
        assert_eq!(harness.calls["p1"].load(Ordering::SeqCst), 1);

        let second = harness
            .aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(1000)))
            .await;
        assert!(second.cache_hit);
        // No further network activity.
        assert_eq!(harness.calls["p1"].load(Ordering::SeqCst), 1);
        // Idempotence modulo volatile fields.
        let ids = |r: &AggregateResult| {
            r.quotes
                .iter()
                .map(|q| q.provider_id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[tokio::test]
    async fn trailing_zero_amounts_share_the_cache_entry() {
        let harness = harness(vec![(
            "p1",
            Behavior::Quote {
                rate: dec!(17.94),
                fee: dec!(1),
                minutes: Some(60),
            },
        )]);

        harness
            .aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(1000)))
            .await;
        let second = harness
            .aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(1000.00)))
            .await;
        assert!(second.cache_hit);
        assert_eq!(harness.calls["p1"].load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn force_refresh_bypasses_reads_but_writes() {
        let harness = harness(vec![(
            "p1",
            Behavior::Quote {
                rate: dec!(17.94),
                fee: dec!(1),
                minutes: Some(60),
            },
        )]);

        harness
            .aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(1000)))
            .await;

        let mut req = request("US", "MX", "USD", dec!(1000));
        req.options.force_refresh = true;
        let refreshed = harness.aggregator.get_all_quotes(req).await;
        assert!(!refreshed.cache_hit);
        assert_eq!(harness.calls["p1"].load(Ordering::SeqCst), 2);

        // The refreshed entry is served afterwards.
        let third = harness
            .aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(1000)))
            .await;
        assert!(third.cache_hit);
        assert_eq!(harness.calls["p1"].load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn slow_adapter_times_out_without_stalling_the_call() {
        let harness = harness(vec![
            ("slow", Behavior::Sleep(Duration::from_secs(10))),
            (
                "fast",
                Behavior::Quote {
                    rate: dec!(17.78),
                    fee: dec!(0),
                    minutes: Some(60),
                },
            ),
        ]);

        let mut req = request("US", "MX", "USD", dec!(1000));
        req.options.per_provider_timeout_ms = Some(500);
        let started = Instant::now();
        let result = harness.aggregator.get_all_quotes(req).await;

        assert!(started.elapsed() < Duration::from_millis(1500 + 500));
        let slow = result
            .all_providers
            .iter()
            .find(|q| q.provider_id == "slow")
            .unwrap();
        assert!(!slow.success);
        assert_eq!(slow.error_kind, Some(ErrorKind::Timeout));
        assert_eq!(result.quotes.len(), 1);
    }

    #[tokio::test]
    async fn transient_failures_are_not_cached() {
        let harness = harness(vec![("down", Behavior::Connection)]);

        harness
            .aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(1000)))
            .await;
        // A second call fans out again: nothing was cached.
        harness
            .aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(1000)))
            .await;
        assert_eq!(harness.calls["down"].load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn definitive_unsupported_corridor_is_cached() {
        let harness = harness(vec![("nope", Behavior::Unsupported)]);

        let first = harness
            .aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(1000)))
            .await;
        assert!(first.success);
        assert!(first.quotes.is_empty());

        let second = harness
            .aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(1000)))
            .await;
        assert!(second.cache_hit);
        assert_eq!(harness.calls["nope"].load(Ordering::SeqCst), 1);

        // Corridor verdict recorded as unsupported.
        assert_eq!(
            harness
                .aggregator
                .cache()
                .get_corridor(
                    CountryCode::parse("US").unwrap(),
                    CountryCode::parse("MX").unwrap()
                )
                .await,
            Some(false)
        );
    }

    #[tokio::test]
    async fn cancellation_skips_the_cache_write() {
        let harness = harness(vec![("slow", Behavior::Sleep(Duration::from_secs(30)))]);
        let (handle, token) = cancel_pair();

        let aggregator = Arc::new(harness.aggregator);
        let call = tokio::spawn({
            let aggregator = Arc::clone(&aggregator);
            async move {
                aggregator
                    .get_all_quotes_cancellable(request("US", "MX", "USD", dec!(1000)), token)
                    .await
            }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        let cancelled_at = Instant::now();
        handle.cancel();

        let result = call.await.unwrap();
        assert!(cancelled_at.elapsed() < Duration::from_secs(3));
        assert!(result
            .all_providers
            .iter()
            .any(|q| q.error_kind == Some(ErrorKind::Cancelled)));

        // No cache entry was written.
        let followup = aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(500)))
            .await;
        assert!(!followup.cache_hit);
    }

    #[tokio::test]
    async fn concurrent_identical_requests_single_flight() {
        let harness = harness(vec![(
            "p1",
            Behavior::Quote {
                rate: dec!(17.94),
                fee: dec!(1),
                minutes: Some(60),
            },
        )]);
        let aggregator = Arc::new(harness.aggregator);

        let mut joins = Vec::new();
        for _ in 0..8 {
            let aggregator = Arc::clone(&aggregator);
            joins.push(tokio::spawn(async move {
                aggregator
                    .get_all_quotes(request("US", "MX", "USD", dec!(1000)))
                    .await
            }));
        }
        let mut hit_count = 0;
        for join in joins {
            let result = join.await.unwrap();
            assert!(result.success);
            if result.cache_hit {
                hit_count += 1;
            }
        }
        // Exactly one leader fanned out; followers were served from the
        // entry it wrote.
        assert_eq!(harness.calls["p1"].load(Ordering::SeqCst), 1);
        assert_eq!(hit_count, 7);
    }

    #[tokio::test]
    async fn cached_entry_reapplies_caller_filters() {
        let harness = harness(vec![
            (
                "cheap",
                Behavior::Quote {
                    rate: dec!(17.5),
                    fee: dec!(0),
                    minutes: Some(2880),
                },
            ),
            (
                "fast",
                Behavior::Quote {
                    rate: dec!(17.9),
                    fee: dec!(5),
                    minutes: Some(10),
                },
            ),
        ]);

        harness
            .aggregator
            .get_all_quotes(request("US", "MX", "USD", dec!(1000)))
            .await;

        let mut req = request("US", "MX", "USD", dec!(1000));
        req.options.sort_by = SortBy::LowestFee;
        req.options.max_fee = Some(dec!(0));
        let result = harness.aggregator.get_all_quotes(req).await;

        assert!(result.cache_hit);
        assert_eq!(result.quotes.len(), 1);
        assert_eq!(result.quotes[0].provider_id, "cheap");
        assert_eq!(result.filters_applied.sort_by, SortBy::LowestFee);
    }

    #[tokio::test]
    async fn include_exclude_limit_the_fan_out() {
        let harness = harness(vec![
            (
                "p1",
                Behavior::Quote {
                    rate: dec!(17.94),
                    fee: dec!(1),
                    minutes: None,
                },
            ),
            (
                "p2",
                Behavior::Quote {
                    rate: dec!(17.78),
                    fee: dec!(1),
                    minutes: None,
                },
            ),
        ]);

        let mut req = request("US", "MX", "USD", dec!(1000));
        req.options.exclude_providers = ["p1".to_string()].into();
        let result = harness.aggregator.get_all_quotes(req).await;

        assert_eq!(result.all_providers.len(), 1);
        assert_eq!(result.all_providers[0].provider_id, "p2");
        assert_eq!(harness.calls["p1"].load(Ordering::SeqCst), 0);
    }
}
