use rust_decimal::Decimal;
use thiserror::Error;

use crate::primitives::AssetId;

#[derive(Error, Debug)]
pub enum PaymentRequestError {
    #[error("PaymentRequestError - InvalidPayload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("PaymentRequestError - NonPositiveAmount: {0}")]
    NonPositiveAmount(Decimal),
    #[error("PaymentRequestError - MissingMerchant")]
    MissingMerchant,
    #[error("PaymentRequestError - InvalidLoanTerm: {loan_term:?}, allowed 1..={max}")]
    InvalidLoanTerm { loan_term: Option<u8>, max: u8 },
    #[error("PaymentRequestError - UnknownToken: {0}")]
    UnknownToken(AssetId),
    #[error("PaymentRequestError - MoneyError: {0}")]
    MoneyError(#[from] core_money::MoneyError),
}
