//! # Currency Code Value Object
//!
//! ISO-4217 currency code wrapper.
//!
//! # Examples
//!
//! ```
//! use remitscan::domain::value_objects::currency::CurrencyCode;
//!
//! let usd = CurrencyCode::parse("usd").unwrap();
//! assert_eq!(usd.as_str(), "USD");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a currency code does not have ISO-4217 shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid currency code: {input}")]
pub struct InvalidCurrencyCode {
    /// The rejected input.
    pub input: String,
}

/// An ISO-4217 currency code, stored uppercase.
///
/// Construction validates shape only (three ASCII letters); membership in
/// the known ISO set is checked by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// Parses and uppercases a currency code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCurrencyCode`] unless the input is exactly three
    /// ASCII letters.
    pub fn parse(input: &str) -> Result<Self, InvalidCurrencyCode> {
        let trimmed = input.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(InvalidCurrencyCode {
                input: input.to_string(),
            });
        }
        Ok(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }

    /// Returns the code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for CurrencyCode {
    type Err = InvalidCurrencyCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = InvalidCurrencyCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
