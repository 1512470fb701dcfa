use rust_decimal::Decimal;
use thiserror::Error;

use crate::primitives::TokenAmount;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoanLifecycleError {
    #[error("LoanLifecycleError - LoanAlreadyActive: {outstanding} outstanding")]
    LoanAlreadyActive { outstanding: TokenAmount },
    #[error("LoanLifecycleError - UnsupportedTerm: {requested} periods, allowed 1..={max}")]
    UnsupportedTerm { requested: u8, max: u8 },
    #[error("LoanLifecycleError - InvalidProductPrice: {0}")]
    InvalidProductPrice(Decimal),
    #[error("LoanLifecycleError - NoActiveLoan")]
    NoActiveLoan,
    #[error("LoanLifecycleError - NoPaymentDue")]
    NoPaymentDue,
    #[error("LoanLifecycleError - InsufficientFunds: required {required}, available {available}")]
    InsufficientFunds {
        required: TokenAmount,
        available: TokenAmount,
    },
    #[error(
        "LoanLifecycleError - InsufficientPoolLiquidity: required {required}, available {available}"
    )]
    InsufficientPoolLiquidity {
        required: TokenAmount,
        available: TokenAmount,
    },
    #[error("LoanLifecycleError - LoanStillActive: {outstanding} outstanding")]
    LoanStillActive { outstanding: TokenAmount },
    #[error("LoanLifecycleError - NothingToWithdraw")]
    NothingToWithdraw,
    #[error("LoanLifecycleError - LoanAccountError: {0}")]
    LoanAccountError(#[from] crate::loan_account::error::LoanAccountError),
    #[error("LoanLifecycleError - ScheduleError: {0}")]
    ScheduleError(#[from] crate::schedule::error::ScheduleError),
    #[error("LoanLifecycleError - MoneyError: {0}")]
    MoneyError(#[from] core_money::MoneyError),
}
