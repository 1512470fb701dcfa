use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ConfigError - CollateralRatioBelowOne: {0}")]
    CollateralRatioBelowOne(Decimal),
    #[error("ConfigError - MaxTermOutOfRange: {0}")]
    MaxTermOutOfRange(u8),
    #[error("ConfigError - FeeOutOfRange: {0}")]
    FeeOutOfRange(Decimal),
    #[error(
        "ConfigError - BnplFeeOutOfRange: {platform_fee_pct}% over {max_term_in_periods} periods exceeds 100%"
    )]
    BnplFeeOutOfRange {
        platform_fee_pct: Decimal,
        max_term_in_periods: u8,
    },
    #[error("ConfigError - EmptyConfirmationWindow")]
    EmptyConfirmationWindow,
}

#[derive(Error, Debug)]
pub enum CoreMicroloanError {
    #[error("CoreMicroloanError - ConfigError: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("CoreMicroloanError - MoneyError: {0}")]
    MoneyError(#[from] core_money::MoneyError),
    #[error("CoreMicroloanError - LoanAccountError: {0}")]
    LoanAccountError(#[from] crate::loan_account::error::LoanAccountError),
    #[error("CoreMicroloanError - ScheduleError: {0}")]
    ScheduleError(#[from] crate::schedule::error::ScheduleError),
    #[error("CoreMicroloanError - LoanLifecycleError: {0}")]
    LoanLifecycleError(#[from] crate::lifecycle::error::LoanLifecycleError),
    #[error("CoreMicroloanError - LendingPoolError: {0}")]
    LendingPoolError(#[from] crate::lending_pool::error::LendingPoolError),
    #[error("CoreMicroloanError - LiquidationError: {0}")]
    LiquidationError(#[from] crate::liquidation::error::LiquidationError),
    #[error("CoreMicroloanError - PaymentRequestError: {0}")]
    PaymentRequestError(#[from] crate::payment_request::error::PaymentRequestError),
    #[error("CoreMicroloanError - SubmissionFailed: {0}")]
    SubmissionFailed(#[from] crate::submission::SubmissionFailed),
}
