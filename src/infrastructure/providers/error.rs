//! # Provider Errors
//!
//! Typed failures for provider adapter operations.
//!
//! Adapters are contractually no-throw past their boundary: every
//! failure mode becomes a [`ProviderError`] variant mapping onto the
//! canonical [`ErrorKind`] taxonomy.
//!
//! # Examples
//!
//! ```
//! use remitscan::infrastructure::providers::error::ProviderError;
//! use remitscan::domain::value_objects::ErrorKind;
//!
//! let error = ProviderError::timeout("deadline exceeded", Some(30_000));
//! assert_eq!(error.kind(), ErrorKind::Timeout);
//! assert!(!error.is_retryable());
//!
//! let error = ProviderError::connection("connect refused");
//! assert!(error.is_retryable());
//! ```

use crate::domain::value_objects::{CountryCode, ErrorKind};
use thiserror::Error;

/// Error type for provider adapter operations.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Deadline exceeded before the provider answered.
    #[error("provider timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Deadline budget in milliseconds, when known.
        timeout_ms: Option<u64>,
    },

    /// Network-level failure reaching the provider.
    #[error("provider connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Credentials missing, expired, or rejected.
    #[error("provider authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// Provider throttled the request.
    #[error("provider rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
        /// Provider-suggested retry delay in milliseconds.
        retry_after_ms: Option<u64>,
    },

    /// Request parameters the provider cannot serve.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Error message.
        message: String,
    },

    /// The provider does not serve this corridor.
    #[error("unsupported corridor: {source_country}->{dest_country}")]
    UnsupportedCorridor {
        /// Sender country.
        source_country: CountryCode,
        /// Recipient country.
        dest_country: CountryCode,
    },

    /// The provider returned a well-formed error response.
    #[error("provider api error: {message}")]
    Api {
        /// Error message.
        message: String,
        /// HTTP status, when the failure came from a response.
        status: Option<u16>,
    },

    /// The provider payload could not be interpreted.
    #[error("provider response parse error: {message}")]
    Parsing {
        /// Error message.
        message: String,
    },

    /// Provider figures failed cross-checks.
    #[error("inconsistent provider response: {message}")]
    Inconsistent {
        /// Error message.
        message: String,
    },

    /// The aggregate call was cancelled mid-flight.
    #[error("request cancelled: {message}")]
    Cancelled {
        /// Error message.
        message: String,
    },

    /// Unexpected fault inside the adapter.
    #[error("internal provider error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl ProviderError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>, timeout_ms: Option<u64>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms,
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a rate-limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>, retry_after_ms: Option<u64>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms,
        }
    }

    /// Creates an invalid-parameter error.
    #[must_use]
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Creates an unsupported-corridor error.
    #[must_use]
    pub fn unsupported_corridor(source_country: CountryCode, dest_country: CountryCode) -> Self {
        Self::UnsupportedCorridor {
            source_country,
            dest_country,
        }
    }

    /// Creates a provider API error.
    #[must_use]
    pub fn api(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Api {
            message: message.into(),
            status,
        }
    }

    /// Creates a parsing error.
    #[must_use]
    pub fn parsing(message: impl Into<String>) -> Self {
        Self::Parsing {
            message: message.into(),
        }
    }

    /// Creates an inconsistent-response error.
    #[must_use]
    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::Inconsistent {
            message: message.into(),
        }
    }

    /// Creates a cancelled error.
    #[must_use]
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Maps the variant onto the canonical taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Connection { .. } => ErrorKind::Connection,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::RateLimited { .. } => ErrorKind::RateLimit,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::UnsupportedCorridor { .. } => ErrorKind::UnsupportedCorridor,
            Self::Api { .. } => ErrorKind::ProviderApi,
            Self::Parsing { .. } => ErrorKind::Parsing,
            Self::Inconsistent { .. } => ErrorKind::InconsistentResponse,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// True for transient errors the adapter may retry once within the
    /// remaining deadline budget.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Provider-suggested retry delay, when present.
    #[must_use]
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
