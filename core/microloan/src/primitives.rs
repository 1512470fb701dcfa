use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
#[cfg(feature = "json-schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use std::fmt;

pub use core_money::{Asset, AssetId, ExchangeRate, MoneyError, Rounding, TokenAmount};

/// Installments a loan can be split into.
pub const MAX_TERM_IN_PERIODS: u8 = 6;
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Seconds since the Unix epoch, as reported by the ledger.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const EPOCH: Self = Self(0);

    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    pub const fn unix_seconds(self) -> i64 {
        self.0
    }

    pub fn checked_add_seconds(self, seconds: u64) -> Option<Self> {
        let seconds = i64::try_from(seconds).ok()?;
        self.0.checked_add(seconds).map(Self)
    }

    /// Signed number of seconds from `earlier` to `self`.
    pub fn seconds_since(self, earlier: Timestamp) -> i64 {
        self.0.saturating_sub(earlier.0)
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(time: DateTime<Utc>) -> Self {
        Self(time.timestamp())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(time) => write!(f, "{}", time.to_rfc3339()),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Ledger account address of a borrower, lender or merchant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn new(address: impl AsRef<str>) -> Self {
        Self(address.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Address {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Address {
    fn from(address: String) -> Self {
        Self::new(address)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-owned handle pairing a validated request with the ledger's
/// eventual answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(transparent)]
pub struct CorrelationId(uuid::Uuid);

impl CorrelationId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl From<uuid::Uuid> for CorrelationId {
    fn from(id: uuid::Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Collateral required per unit of product price. Never below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct CollateralRatio(Decimal);

impl CollateralRatio {
    pub fn try_new(ratio: Decimal) -> Result<Self, MoneyError> {
        if ratio < Decimal::ONE {
            return Err(MoneyError::InvalidRate(ratio));
        }
        Ok(Self(ratio))
    }

    pub fn into_inner(self) -> Decimal {
        self.0
    }
}

impl Default for CollateralRatio {
    fn default() -> Self {
        Self(Decimal::new(120, 2))
    }
}

impl TryFrom<Decimal> for CollateralRatio {
    type Error = MoneyError;

    fn try_from(ratio: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(ratio)
    }
}

impl From<CollateralRatio> for Decimal {
    fn from(ratio: CollateralRatio) -> Self {
        ratio.0
    }
}

/// Whole days from `now` until `due`, rounded up; negative once `due` has
/// passed.
pub fn days_until(due: Timestamp, now: Timestamp) -> i64 {
    let diff = due.seconds_since(now);
    let days = diff / SECONDS_PER_DAY;
    if diff % SECONDS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_collateral_ratio_is_one_twenty() {
        assert_eq!(CollateralRatio::default().into_inner(), dec!(1.20));
        assert!(CollateralRatio::try_new(dec!(0.99)).is_err());
    }

    #[test]
    fn days_until_rounds_up() {
        let now = Timestamp::from_unix_seconds(1_000);
        assert_eq!(days_until(now, now), 0);
        assert_eq!(days_until(Timestamp::from_unix_seconds(1_001), now), 1);
        assert_eq!(
            days_until(Timestamp::from_unix_seconds(1_000 + SECONDS_PER_DAY), now),
            1
        );
        assert_eq!(
            days_until(Timestamp::from_unix_seconds(1_000 + SECONDS_PER_DAY + 1), now),
            2
        );
    }

    #[test]
    fn days_until_is_negative_when_past() {
        let now = Timestamp::from_unix_seconds(10 * SECONDS_PER_DAY);
        assert_eq!(days_until(Timestamp::from_unix_seconds(SECONDS_PER_DAY), now), -9);
        assert_eq!(days_until(Timestamp::from_unix_seconds(9 * SECONDS_PER_DAY - 1), now), -1);
    }

    #[test]
    fn timestamp_round_trips_through_chrono() {
        let ts = Timestamp::from_unix_seconds(2_592_000);
        let time = ts.to_datetime().unwrap();
        assert_eq!(Timestamp::from(time), ts);
        assert_eq!(ts.checked_add_seconds(10), Some(Timestamp::from_unix_seconds(2_592_010)));
    }
}
