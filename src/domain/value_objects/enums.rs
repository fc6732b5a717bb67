//! # Domain Enums
//!
//! Closed token sets shared across the aggregator:
//!
//! - [`PaymentMethod`] - how the sender funds the transfer
//! - [`DeliveryMethod`] - how the recipient receives the funds
//! - [`SortBy`] - comparison criterion for the filtered quote list
//! - [`ErrorKind`] - canonical failure taxonomy
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits. Wire tokens are `snake_case`
//! except [`ErrorKind`], which keeps PascalCase variant names to match the
//! error envelope format.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the sender funds the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Direct debit from a bank account.
    BankAccount,
    /// Debit card payment.
    DebitCard,
    /// Credit card payment.
    CreditCard,
    /// Provider-held balance.
    Balance,
    /// Open-banking initiated payment.
    OpenBanking,
    /// Generic card when the provider does not distinguish debit/credit.
    Card,
    /// Cash paid in at an agent location.
    Cash,
    /// Mobile wallet.
    MobileWallet,
    /// Provider did not report a recognizable method.
    Unknown,
}

impl PaymentMethod {
    /// Returns the stable wire token for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BankAccount => "bank_account",
            Self::DebitCard => "debit_card",
            Self::CreditCard => "credit_card",
            Self::Balance => "balance",
            Self::OpenBanking => "open_banking",
            Self::Card => "card",
            Self::Cash => "cash",
            Self::MobileWallet => "mobile_wallet",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bank_account" => Ok(Self::BankAccount),
            "debit_card" => Ok(Self::DebitCard),
            "credit_card" => Ok(Self::CreditCard),
            "balance" => Ok(Self::Balance),
            "open_banking" => Ok(Self::OpenBanking),
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            "mobile_wallet" => Ok(Self::MobileWallet),
            "unknown" => Ok(Self::Unknown),
            other => Err(UnknownToken {
                token: other.to_string(),
                expected: "payment_method",
            }),
        }
    }
}

/// How the recipient receives the funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    /// Deposit into a bank account.
    BankDeposit,
    /// Cash collected at an agent location.
    CashPickup,
    /// Mobile wallet credit.
    MobileWallet,
    /// Push to a debit card.
    DebitCardDeposit,
    /// Cash delivered to the recipient's address.
    HomeDelivery,
    /// Provider did not report a recognizable method.
    Unknown,
}

impl DeliveryMethod {
    /// Returns the stable wire token for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BankDeposit => "bank_deposit",
            Self::CashPickup => "cash_pickup",
            Self::MobileWallet => "mobile_wallet",
            Self::DebitCardDeposit => "debit_card_deposit",
            Self::HomeDelivery => "home_delivery",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeliveryMethod {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bank_deposit" => Ok(Self::BankDeposit),
            "cash_pickup" => Ok(Self::CashPickup),
            "mobile_wallet" => Ok(Self::MobileWallet),
            "debit_card_deposit" => Ok(Self::DebitCardDeposit),
            "home_delivery" => Ok(Self::HomeDelivery),
            "unknown" => Ok(Self::Unknown),
            other => Err(UnknownToken {
                token: other.to_string(),
                expected: "delivery_method",
            }),
        }
    }
}

/// Sort criterion for the filtered quote list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Highest exchange rate first.
    #[default]
    BestRate,
    /// Lowest fee first.
    LowestFee,
    /// Shortest delivery time first, unknown last.
    FastestTime,
    /// Highest effective receive amount after fees first.
    BestValue,
}

impl SortBy {
    /// Returns the stable wire token for this criterion.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BestRate => "best_rate",
            Self::LowestFee => "lowest_fee",
            Self::FastestTime => "fastest_time",
            Self::BestValue => "best_value",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best_rate" => Ok(Self::BestRate),
            "lowest_fee" => Ok(Self::LowestFee),
            "fastest_time" => Ok(Self::FastestTime),
            "best_value" => Ok(Self::BestValue),
            other => Err(UnknownToken {
                token: other.to_string(),
                expected: "sort_by",
            }),
        }
    }
}

/// Canonical classification for provider and aggregate failures.
///
/// The taxonomy drives retry policy and cacheability: retryable kinds may
/// get one bounded retry inside the adapter, definitive kinds are safe to
/// cache alongside successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Request rejected before fan-out.
    InvalidParameter,
    /// Provider does not serve the requested corridor.
    UnsupportedCorridor,
    /// Credentials missing, expired, or rejected.
    Authentication,
    /// Network-level failure reaching the provider.
    Connection,
    /// Deadline exceeded, enforced by adapter or executor.
    Timeout,
    /// Provider throttled the request.
    RateLimit,
    /// Provider returned a well-formed error response.
    ProviderApi,
    /// Provider payload could not be interpreted.
    Parsing,
    /// Provider figures failed cross-checks during normalization.
    InconsistentResponse,
    /// The aggregate call was cancelled before this provider finished.
    Cancelled,
    /// Unexpected fault inside the adapter or executor.
    Internal,
}

impl ErrorKind {
    /// True for transient kinds where the adapter may retry once.
    #[inline]
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Connection | Self::RateLimit)
    }

    /// True for kinds that are a definitive answer for the corridor,
    /// safe to include in a cached aggregate.
    #[inline]
    #[must_use]
    pub const fn is_definitive(self) -> bool {
        matches!(self, Self::UnsupportedCorridor)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvalidParameter => "InvalidParameter",
            Self::UnsupportedCorridor => "UnsupportedCorridor",
            Self::Authentication => "Authentication",
            Self::Connection => "Connection",
            Self::Timeout => "Timeout",
            Self::RateLimit => "RateLimit",
            Self::ProviderApi => "ProviderApi",
            Self::Parsing => "Parsing",
            Self::InconsistentResponse => "InconsistentResponse",
            Self::Cancelled => "Cancelled",
            Self::Internal => "Internal",
        };
        f.write_str(name)
    }
}

/// Error produced when a wire token is not in its closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {expected} token: {token}")]
pub struct UnknownToken {
    /// The rejected token.
    pub token: String,
    /// Which token set was expected.
    pub expected: &'static str,
}
