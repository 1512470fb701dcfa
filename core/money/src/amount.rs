use primitive_types::U256;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
#[cfg(feature = "json-schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::{asset::Asset, error::MoneyError};

/// How a decimal amount is brought onto an asset's smallest-unit grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Floor,
    Ceil,
    /// Matches fixed-point string formatting of the amount to the asset's
    /// decimals.
    HalfAwayFromZero,
}

impl From<Rounding> for RoundingStrategy {
    fn from(rounding: Rounding) -> Self {
        match rounding {
            Rounding::Floor => RoundingStrategy::ToZero,
            Rounding::Ceil => RoundingStrategy::AwayFromZero,
            Rounding::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
        }
    }
}

/// An unsigned amount expressed in an asset's smallest unit, the way the
/// ledger stores it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(transparent)]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    pub const fn into_inner(self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    pub fn checked_mul(self, factor: u128) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    /// Integer division truncating toward zero, `None` on a zero divisor.
    pub fn div_floor(self, divisor: u128) -> Option<Self> {
        self.0.checked_div(divisor).map(Self)
    }

    /// `self * numerator / denominator` with the division floored. The
    /// product is taken in 256 bits, so only a quotient above `u128::MAX`
    /// overflows.
    pub fn mul_div_floor(self, numerator: u128, denominator: u128) -> Result<Self, MoneyError> {
        if denominator == 0 {
            return Err(MoneyError::DivisionByZero);
        }
        let quotient = U256::from(self.0) * U256::from(numerator) / U256::from(denominator);
        if quotient > U256::from(u128::MAX) {
            return Err(MoneyError::Overflow);
        }
        Ok(Self(quotient.low_u128()))
    }

    /// `self` as a percentage of `whole`, capped at 100. Zero when `whole` is
    /// zero.
    pub fn percent_of(self, whole: TokenAmount) -> Decimal {
        if whole.is_zero() {
            return Decimal::ZERO;
        }
        if self >= whole {
            return Decimal::ONE_HUNDRED;
        }

        // Both operands are brought under 96 bits so they fit a Decimal mantissa.
        let shift = (u128::BITS - whole.0.leading_zeros()).saturating_sub(96);
        let whole = Decimal::from_i128_with_scale((whole.0 >> shift) as i128, 0);
        let part = Decimal::from_i128_with_scale((self.0 >> shift) as i128, 0);
        part / whole * Decimal::ONE_HUNDRED
    }

    pub fn to_major(self, asset: &Asset) -> Result<Decimal, MoneyError> {
        let units = i128::try_from(self.0).map_err(|_| MoneyError::Overflow)?;
        Decimal::try_from_i128_with_scale(units, u32::from(asset.decimals))
            .map_err(|_| MoneyError::Overflow)
    }

    pub fn from_major(
        value: Decimal,
        asset: &Asset,
        rounding: Rounding,
    ) -> Result<Self, MoneyError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyError::NegativeAmount(value));
        }
        let scale = Decimal::from(asset.unit_scale()?);
        let units = value
            .checked_mul(scale)
            .ok_or(MoneyError::Overflow)?
            .round_dp_with_strategy(0, rounding.into());
        units.to_u128().map(Self).ok_or(MoneyError::Overflow)
    }
}

impl From<u128> for TokenAmount {
    fn from(units: u128) -> Self {
        Self(units)
    }
}

impl From<TokenAmount> for u128 {
    fn from(amount: TokenAmount) -> Self {
        amount.0
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
