//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Code Types
//!
//! - [`CountryCode`]: ISO-3166-1 alpha-2 country code
//! - [`CurrencyCode`]: ISO-4217 currency code
//!
//! ## Domain Enums
//!
//! - `PaymentMethod` / `DeliveryMethod`: transfer funding and payout tokens
//! - `SortBy`: quote comparison criterion
//! - `ErrorKind`: canonical failure taxonomy
//!
//! ## Time
//!
//! - [`Timestamp`]: UTC timestamp wrapper

pub mod country;
pub mod currency;
pub mod enums;
pub mod timestamp;

pub use country::{CountryCode, InvalidCountryCode};
pub use currency::{CurrencyCode, InvalidCurrencyCode};
pub use enums::{DeliveryMethod, ErrorKind, PaymentMethod, SortBy, UnknownToken};
pub use timestamp::Timestamp;
