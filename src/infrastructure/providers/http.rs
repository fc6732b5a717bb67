//! # HTTP Client Utilities
//!
//! Shared HTTP client for provider adapters.
//!
//! Wraps `reqwest` with deadline-aware timeouts, JSON handling, typed
//! error mapping onto the provider taxonomy, and the bounded
//! retry-once policy adapters apply to transient failures.
//!
//! # Examples
//!
//! ```ignore
//! use remitscan::infrastructure::providers::http::HttpClient;
//!
//! let client = HttpClient::new()?;
//! let response: MyResponse = client.get_json(url, deadline).await?;
//! ```

use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use crate::infrastructure::providers::traits::Deadline;
use rand::Rng;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// Browser-like user agent several provider APIs require before they
/// answer pricing calls.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.3 Safari/605.1.15";

/// HTTP client wrapper for provider adapters.
///
/// Cheap to clone; adapters share one instance through their context.
/// Per-request timeouts come from the caller's [`Deadline`] so inner
/// calls can never outlive the executor's budget.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with the default browser-like headers.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the client cannot be built.
    pub fn new() -> ProviderResult<Self> {
        Self::with_headers(HeaderMap::new())
    }

    /// Creates a client with extra default headers.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Internal` if the client cannot be built.
    pub fn with_headers(default_headers: HeaderMap) -> ProviderResult<Self> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(default_headers)
            .build()
            .map_err(|e| ProviderError::internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// GET returning deserialized JSON.
    ///
    /// # Errors
    ///
    /// Connection/Timeout on transport failure, a status-mapped error on
    /// non-2xx, Parsing when the body is not the expected shape.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        deadline: Deadline,
    ) -> ProviderResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(deadline.remaining())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        handle_response(response).await
    }

    /// GET with query parameters, returning deserialized JSON.
    ///
    /// # Errors
    ///
    /// Same mapping as [`get_json`](Self::get_json).
    pub async fn get_json_with_params<T: DeserializeOwned, P: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
        deadline: Deadline,
    ) -> ProviderResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .timeout(deadline.remaining())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        handle_response(response).await
    }

    /// GET with query parameters and per-call headers.
    ///
    /// # Errors
    ///
    /// Same mapping as [`get_json`](Self::get_json).
    pub async fn get_json_with_headers<T: DeserializeOwned, P: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
        headers: HeaderMap,
        deadline: Deadline,
    ) -> ProviderResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .headers(headers)
            .timeout(deadline.remaining())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        handle_response(response).await
    }

    /// POST with a JSON body, returning deserialized JSON.
    ///
    /// # Errors
    ///
    /// Same mapping as [`get_json`](Self::get_json).
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        url: &str,
        body: &B,
        deadline: Deadline,
    ) -> ProviderResult<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .timeout(deadline.remaining())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        handle_response(response).await
    }

    /// POST with a JSON body and per-call headers.
    ///
    /// # Errors
    ///
    /// Same mapping as [`get_json`](Self::get_json).
    pub async fn post_json_with_headers<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
        deadline: Deadline,
    ) -> ProviderResult<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .headers(headers)
            .timeout(deadline.remaining())
            .send()
            .await
            .map_err(map_reqwest_error)?;
        handle_response(response).await
    }
}

/// Runs `op`, retrying exactly once when the failure is transient and
/// the backoff still fits inside the deadline budget.
///
/// Backoff: 250 ms for connection failures, the provider's
/// `Retry-After` (capped at 1 s) or a jittered 250-1000 ms for rate
/// limits. Non-retryable errors pass straight through.
///
/// # Errors
///
/// The final attempt's error.
pub async fn retry_once<T, F, Fut>(deadline: Deadline, mut op: F) -> ProviderResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ProviderResult<T>>,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(error) if error.is_retryable() => {
            let backoff = backoff_for(&error);
            if !deadline.allows(backoff) {
                return Err(error);
            }
            tokio::time::sleep(backoff).await;
            op().await
        }
        Err(error) => Err(error),
    }
}

fn backoff_for(error: &ProviderError) -> Duration {
    match error {
        ProviderError::RateLimited { retry_after_ms, .. } => {
            let millis = retry_after_ms
                .unwrap_or_else(|| rand::thread_rng().gen_range(250..=1000))
                .min(1000);
            Duration::from_millis(millis)
        }
        _ => Duration::from_millis(250),
    }
}

async fn handle_response<T: DeserializeOwned>(response: Response) -> ProviderResult<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::parsing(format!("failed to parse response: {e}")));
    }

    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(|secs| secs * 1000);
    let body = response.text().await.unwrap_or_default();
    Err(map_status_error(status, &body, retry_after))
}

/// Maps a transport-level reqwest failure onto the taxonomy.
pub fn map_reqwest_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::timeout("request timed out", None)
    } else if error.is_connect() {
        ProviderError::connection(format!("connection failed: {error}"))
    } else {
        ProviderError::connection(format!("http request failed: {error}"))
    }
}

/// Maps a non-2xx status onto the taxonomy.
pub fn map_status_error(status: StatusCode, body: &str, retry_after_ms: Option<u64>) -> ProviderError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ProviderError::api(format!("bad request: {body}"), Some(status.as_u16()))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::authentication(format!("authentication failed: {body}"))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            ProviderError::rate_limited("rate limit exceeded", retry_after_ms)
        }
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            ProviderError::connection(format!("server error ({status}): {body}"))
        }
        _ => ProviderError::api(format!("http error ({status}): {body}"), Some(status.as_u16())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn new_client_builds() {
        assert!(HttpClient::new().is_ok());
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            map_status_error(StatusCode::UNAUTHORIZED, "", None),
            ProviderError::Authentication { .. }
        ));
        assert!(matches!(
            map_status_error(StatusCode::TOO_MANY_REQUESTS, "", Some(500)),
            ProviderError::RateLimited {
                retry_after_ms: Some(500),
                ..
            }
        ));
        assert!(matches!(
            map_status_error(StatusCode::SERVICE_UNAVAILABLE, "", None),
            ProviderError::Connection { .. }
        ));
        assert!(matches!(
            map_status_error(StatusCode::NOT_FOUND, "", None),
            ProviderError::Api {
                status: Some(404),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn retry_once_retries_transient_failures() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);
        let deadline = Deadline::within(Duration::from_secs(5));

        let result: ProviderResult<u32> = retry_once(deadline, move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ProviderError::connection("first attempt fails"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retry_once_passes_terminal_errors_through() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);
        let deadline = Deadline::within(Duration::from_secs(5));

        let result: ProviderResult<u32> = retry_once(deadline, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::authentication("bad key"))
            }
        })
        .await;

        assert!(matches!(result, Err(ProviderError::Authentication { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_once_respects_exhausted_deadline() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&attempts);
        let deadline = Deadline::within(Duration::from_millis(1));
        tokio::time::sleep(Duration::from_millis(5)).await;

        let result: ProviderResult<u32> = retry_once(deadline, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(ProviderError::connection("down"))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
