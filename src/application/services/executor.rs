//! # Fan-out Executor
//!
//! Bounded-parallel dispatch over provider adapters.
//!
//! One request creates one dispatch scope: every active adapter becomes
//! a task racing a per-call deadline and the caller's cancellation
//! signal. Outcomes come back in the adapter order handed in (registry
//! order), independent of completion order. A failed or panicking
//! adapter never aborts the aggregate.

use crate::domain::entities::request::QuoteRequest;
use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::traits::{Deadline, ProviderAdapter, RawQuote};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Semaphore};
use tokio::time::Instant;
use tracing::warn;

/// Hard cap on the worker pool regardless of adapter count.
pub const MAX_WORKERS_CAP: usize = 32;

/// Default per-adapter deadline.
pub const DEFAULT_PER_PROVIDER_TIMEOUT: Duration = Duration::from_millis(30_000);

/// How long a cancelled dispatch waits for workers to acknowledge
/// before abandoning them.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Creates a linked cancellation pair for one dispatch scope.
#[must_use]
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// Caller-held side of the cancellation pair.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signals every worker holding the matching token.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Worker-held cancellation signal, observed at I/O boundaries.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token that can never fire, for plain uncancellable calls.
    ///
    /// The sender side is dropped immediately; `cancelled()` pends
    /// forever and `is_cancelled()` stays false.
    #[must_use]
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// True once the handle has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when the handle fires; pends forever if it never does.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                // Handle dropped without firing; nothing to wait for.
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Per-dispatch tuning derived from defaults plus request options.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Deadline budget per adapter call.
    pub per_provider_timeout: Duration,
    /// Worker pool cap before the [`MAX_WORKERS_CAP`] clamp.
    pub max_workers: Option<usize>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            per_provider_timeout: DEFAULT_PER_PROVIDER_TIMEOUT,
            max_workers: None,
        }
    }
}

/// One adapter's dispatch outcome.
#[derive(Debug)]
pub struct ProviderOutcome {
    /// Adapter id.
    pub provider_id: &'static str,
    /// Adapter display name.
    pub display_name: &'static str,
    /// Raw quote or typed failure.
    pub result: ProviderResult<RawQuote>,
}

/// Parallel dispatcher with per-call deadlines and cancellation.
#[derive(Debug, Clone, Default)]
pub struct FanOutExecutor {
    defaults: ExecutorConfig,
}

impl FanOutExecutor {
    /// Creates an executor with the given default tuning.
    #[must_use]
    pub fn new(defaults: ExecutorConfig) -> Self {
        Self { defaults }
    }

    /// Effective worker count for `adapter_count` adapters.
    #[must_use]
    pub fn worker_count(&self, adapter_count: usize, override_workers: Option<usize>) -> usize {
        let requested = override_workers
            .or(self.defaults.max_workers)
            .unwrap_or(adapter_count);
        requested.clamp(1, MAX_WORKERS_CAP.min(adapter_count.max(1)))
    }

    /// Dispatches the request to every adapter in order.
    ///
    /// Returns one outcome per adapter, in the order given. The call
    /// completes when all workers finish, or - after cancellation -
    /// when the drain timeout expires and stragglers are abandoned.
    pub async fn dispatch(
        &self,
        adapters: Vec<Arc<dyn ProviderAdapter>>,
        request: Arc<QuoteRequest>,
        cancel: CancelToken,
    ) -> Vec<ProviderOutcome> {
        if adapters.is_empty() {
            return Vec::new();
        }

        let timeout = request
            .options
            .per_provider_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(self.defaults.per_provider_timeout);
        let workers = self.worker_count(adapters.len(), request.options.max_workers);
        let semaphore = Arc::new(Semaphore::new(workers));
        // One deadline for the whole dispatch scope: adapters queued
        // behind the worker pool spend their own budget waiting, which
        // keeps the overall call bounded by the per-provider timeout.
        let deadline = Deadline::within(timeout);

        let mut handles = Vec::with_capacity(adapters.len());
        for adapter in adapters {
            let provider_id = adapter.id();
            let display_name = adapter.display_name();
            let request = Arc::clone(&request);
            let semaphore = Arc::clone(&semaphore);
            let cancel = cancel.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return Err(ProviderError::internal("worker pool closed"));
                };
                if cancel.is_cancelled() {
                    return Err(ProviderError::cancelled("cancelled before dispatch"));
                }
                tokio::select! {
                    outcome = tokio::time::timeout_at(
                        deadline.instant(),
                        adapter.fetch_quote(&request, deadline),
                    ) => match outcome {
                        Ok(result) => result,
                        Err(_) => Err(ProviderError::timeout(
                            format!("provider exceeded {}ms deadline", timeout.as_millis()),
                            Some(timeout.as_millis() as u64),
                        )),
                    },
                    () = cancel.cancelled() => {
                        Err(ProviderError::cancelled("cancelled during fetch"))
                    }
                }
            });
            handles.push((provider_id, display_name, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        let mut drain_until: Option<Instant> = None;

        for (provider_id, display_name, mut handle) in handles {
            if cancel.is_cancelled() && drain_until.is_none() {
                drain_until = Some(Instant::now() + DRAIN_TIMEOUT);
            }

            let joined = match drain_until {
                Some(drain_deadline) => {
                    match tokio::time::timeout_at(drain_deadline, &mut handle).await {
                        Ok(joined) => joined,
                        Err(_) => {
                            handle.abort();
                            outcomes.push(ProviderOutcome {
                                provider_id,
                                display_name,
                                result: Err(ProviderError::cancelled(
                                    "abandoned after drain timeout",
                                )),
                            });
                            continue;
                        }
                    }
                }
                None => handle.await,
            };

            let result = match joined {
                Ok(result) => result,
                Err(join_error) if join_error.is_cancelled() => {
                    Err(ProviderError::cancelled("worker aborted"))
                }
                Err(join_error) => {
                    warn!(provider_id, %join_error, "adapter task panicked");
                    Err(ProviderError::internal(format!(
                        "adapter fault: {join_error}"
                    )))
                }
            };
            outcomes.push(ProviderOutcome {
                provider_id,
                display_name,
                result,
            });
        }

        outcomes
    }
}
