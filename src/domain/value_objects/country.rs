//! # Country Code Value Object
//!
//! ISO-3166-1 alpha-2 country code wrapper.
//!
//! # Examples
//!
//! ```
//! use remitscan::domain::value_objects::country::CountryCode;
//!
//! let us = CountryCode::parse("us").unwrap();
//! assert_eq!(us.as_str(), "US");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a country code does not have ISO-3166-1 alpha-2 shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid country code: {input}")]
pub struct InvalidCountryCode {
    /// The rejected input.
    pub input: String,
}

/// An ISO-3166-1 alpha-2 country code, stored uppercase.
///
/// Construction validates shape only (two ASCII letters); membership in
/// the known ISO set is checked by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Parses and uppercases a country code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCountryCode`] unless the input is exactly two
    /// ASCII letters.
    pub fn parse(input: &str) -> Result<Self, InvalidCountryCode> {
        let trimmed = input.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(InvalidCountryCode {
                input: input.to_string(),
            });
        }
        Ok(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
        ]))
    }

    /// Returns the code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Invariant: always two ASCII uppercase letters.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl FromStr for CountryCode {
    type Err = InvalidCountryCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = InvalidCountryCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
