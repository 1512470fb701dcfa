use rust_decimal::Decimal;
#[cfg(feature = "json-schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MoneyError;

/// Units of a quote token obtained for one USD, e.g. `19.48` for MXN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct ExchangeRate(Decimal);

impl ExchangeRate {
    pub const PAR: Self = Self(Decimal::ONE);

    pub fn try_new(rate: Decimal) -> Result<Self, MoneyError> {
        if rate <= Decimal::ZERO {
            return Err(MoneyError::InvalidRate(rate));
        }
        Ok(Self(rate))
    }

    pub fn usd_to_token(&self, usd: Decimal) -> Result<Decimal, MoneyError> {
        usd.checked_mul(self.0).ok_or(MoneyError::Overflow)
    }

    pub fn token_to_usd(&self, amount: Decimal) -> Result<Decimal, MoneyError> {
        amount.checked_div(self.0).ok_or(MoneyError::DivisionByZero)
    }

    pub fn into_inner(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for ExchangeRate {
    type Error = MoneyError;

    fn try_from(rate: Decimal) -> Result<Self, Self::Error> {
        Self::try_new(rate)
    }
}

impl From<ExchangeRate> for Decimal {
    fn from(rate: ExchangeRate) -> Self {
        rate.0
    }
}
