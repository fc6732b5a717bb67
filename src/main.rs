//! Composition root and CLI for the remitscan aggregator.

use clap::{Parser, Subcommand};
use remitscan::api::rest::{create_router, AppState, SurfaceRateLimiter};
use remitscan::application::services::{Aggregator, FanOutExecutor};
use remitscan::config::AppConfig;
use remitscan::domain::catalog::Catalog;
use remitscan::domain::entities::request::QuoteRequest;
use remitscan::domain::value_objects::{CountryCode, CurrencyCode, SortBy};
use remitscan::infrastructure::cache::{
    CacheInvalidationHook, InMemoryCacheStore, QuoteCache,
};
use remitscan::infrastructure::providers::{default_registry, AdapterContext};
use rust_decimal::Decimal;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "remitscan", about = "Remittance quote aggregator", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API server.
    Serve {
        /// Bind address, overrides BIND_ADDR.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Fetch quotes for one corridor and print them.
    Quote {
        /// Source country, alpha-2.
        #[arg(long)]
        from: String,
        /// Destination country, alpha-2.
        #[arg(long)]
        to: String,
        /// Source currency, ISO-4217.
        #[arg(long)]
        currency: String,
        /// Amount to send.
        #[arg(long)]
        amount: String,
        /// Destination currency override.
        #[arg(long)]
        dest_currency: Option<String>,
        /// Sort criterion.
        #[arg(long, default_value = "best_rate")]
        sort_by: String,
        /// Bypass cache reads.
        #[arg(long)]
        force_refresh: bool,
    },
    /// List registered providers.
    Providers,
}

fn build_aggregator(config: &AppConfig) -> Result<Arc<Aggregator>, String> {
    let catalog = Arc::new(Catalog::new());
    let context = AdapterContext::new(Arc::clone(&catalog)).map_err(|e| e.to_string())?;
    let registry = Arc::new(default_registry(context));
    let cache = Arc::new(QuoteCache::new(
        Arc::new(InMemoryCacheStore::new()),
        config.cache_config(),
    ));
    registry.set_events(Arc::new(CacheInvalidationHook::new(Arc::clone(&cache))));

    Ok(Arc::new(Aggregator::new(
        catalog,
        registry,
        cache,
        FanOutExecutor::new(config.executor_config()),
        config.aggregator_config(),
    )))
}

async fn serve(config: AppConfig, bind: Option<String>) -> ExitCode {
    let aggregator = match build_aggregator(&config) {
        Ok(aggregator) => aggregator,
        Err(message) => {
            error!(%message, "failed to assemble aggregator");
            return ExitCode::FAILURE;
        }
    };
    let state = AppState {
        aggregator,
        rate_limiter: Arc::new(SurfaceRateLimiter::per_minute(
            config.surface_rate_limit_per_minute,
        )),
    };
    let addr = bind.unwrap_or(config.bind_addr);
    let router = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!(%addr, "listening");
    if let Err(e) = axum::serve(listener, router).await {
        error!(%e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[allow(clippy::too_many_arguments)]
async fn quote_command(
    config: AppConfig,
    from: String,
    to: String,
    currency: String,
    amount: String,
    dest_currency: Option<String>,
    sort_by: String,
    force_refresh: bool,
) -> ExitCode {
    // Exit codes: 0 success (including partial), 2 invalid parameter,
    // 3 no providers active.
    let invalid = ExitCode::from(2);
    let no_providers = ExitCode::from(3);

    let Ok(source_country) = CountryCode::parse(&from) else {
        eprintln!("invalid source country: {from}");
        return invalid;
    };
    let Ok(dest_country) = CountryCode::parse(&to) else {
        eprintln!("invalid destination country: {to}");
        return invalid;
    };
    let Ok(source_currency) = CurrencyCode::parse(&currency) else {
        eprintln!("invalid currency: {currency}");
        return invalid;
    };
    let Ok(amount) = Decimal::from_str(amount.trim()) else {
        eprintln!("invalid amount: {amount}");
        return invalid;
    };
    let Ok(sort_by) = SortBy::from_str(&sort_by) else {
        eprintln!("invalid sort criterion: {sort_by}");
        return invalid;
    };

    let aggregator = match build_aggregator(&config) {
        Ok(aggregator) => aggregator,
        Err(message) => {
            eprintln!("failed to assemble aggregator: {message}");
            return ExitCode::FAILURE;
        }
    };
    if aggregator
        .registry()
        .active_ids(None, &Default::default())
        .is_empty()
    {
        eprintln!("no providers active");
        return no_providers;
    }

    let mut request = QuoteRequest::new(source_country, dest_country, source_currency, amount)
        .with_sort_by(sort_by);
    request.options.force_refresh = force_refresh;
    if let Some(ccy) = dest_currency {
        let Ok(ccy) = CurrencyCode::parse(&ccy) else {
            eprintln!("invalid destination currency: {ccy}");
            return invalid;
        };
        request.dest_currency = Some(ccy);
    }

    let result = aggregator.get_all_quotes(request).await;
    if !result.success {
        for failure in result.errors.values() {
            eprintln!("{}", failure.error_message);
        }
        return invalid;
    }

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("failed to serialize result: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

fn providers_command(config: &AppConfig) -> ExitCode {
    let aggregator = match build_aggregator(config) {
        Ok(aggregator) => aggregator,
        Err(message) => {
            eprintln!("failed to assemble aggregator: {message}");
            return ExitCode::FAILURE;
        }
    };
    for (id, display_name) in aggregator.registry().display_names() {
        println!("{id}\t{display_name}");
    }
    ExitCode::SUCCESS
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    match cli.command {
        Command::Serve { bind } => serve(config, bind).await,
        Command::Quote {
            from,
            to,
            currency,
            amount,
            dest_currency,
            sort_by,
            force_refresh,
        } => {
            quote_command(
                config,
                from,
                to,
                currency,
                amount,
                dest_currency,
                sort_by,
                force_refresh,
            )
            .await
        }
        Command::Providers => providers_command(&config),
    }
}
