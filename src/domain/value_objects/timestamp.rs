//! # Timestamp Value Object
//!
//! DateTime wrapper with domain-specific methods.
//!
//! This module provides the [`Timestamp`] type for representing points in
//! time, used for quote stamping and cache expiry.
//!
//! # Examples
//!
//! ```
//! use remitscan::domain::value_objects::timestamp::Timestamp;
//!
//! let now = Timestamp::now();
//! let later = now.add_secs(60);
//!
//! assert!(later.is_after(&now));
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A UTC timestamp.
///
/// Wraps `chrono::DateTime<Utc>` with the handful of operations the
/// aggregator needs: stamping, expiry checks, and elapsed measurement.
///
/// # Invariants
///
/// - Always in UTC timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Returns the Unix timestamp in milliseconds.
    #[inline]
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns the Unix timestamp in seconds.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Adds seconds to the timestamp. Negative values subtract.
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Adds milliseconds to the timestamp. Negative values subtract.
    #[must_use]
    pub fn add_millis(&self, millis: i64) -> Self {
        Self(self.0 + Duration::milliseconds(millis))
    }

    /// Returns true if this timestamp is in the past.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.0 < Utc::now()
    }

    /// Returns true if this timestamp is before another.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    /// Returns true if this timestamp is after another.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Returns the whole milliseconds elapsed since `earlier`, clamped
    /// to zero when `earlier` is in the future.
    #[must_use]
    pub fn millis_since(&self, earlier: &Self) -> u64 {
        let delta = self.0.signed_duration_since(earlier.0).num_milliseconds();
        u64::try_from(delta).unwrap_or(0)
    }

    /// Returns the inner `DateTime<Utc>`.
    #[inline]
    #[must_use]
    pub fn inner(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
