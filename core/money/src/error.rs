use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("MoneyError - Overflow")]
    Overflow,
    #[error("MoneyError - DivisionByZero")]
    DivisionByZero,
    #[error("MoneyError - NegativeAmount: {0}")]
    NegativeAmount(Decimal),
    #[error("MoneyError - InvalidRate: {0}")]
    InvalidRate(Decimal),
    #[error("MoneyError - UnsupportedDecimals: {0}")]
    UnsupportedDecimals(u8),
}
