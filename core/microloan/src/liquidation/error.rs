use thiserror::Error;

use crate::primitives::Timestamp;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiquidationError {
    #[error("LiquidationError - NoActiveLoan")]
    NoActiveLoan,
    #[error("LiquidationError - NotLiquidatable: next installment due {next_due_date}")]
    NotLiquidatable { next_due_date: Timestamp },
    #[error("LiquidationError - LoanAccountError: {0}")]
    LoanAccountError(#[from] crate::loan_account::error::LoanAccountError),
    #[error("LiquidationError - ScheduleError: {0}")]
    ScheduleError(#[from] crate::schedule::error::ScheduleError),
    #[error("LiquidationError - MoneyError: {0}")]
    MoneyError(#[from] core_money::MoneyError),
}
