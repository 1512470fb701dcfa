use thiserror::Error;

use crate::primitives::TokenAmount;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoanAccountError {
    #[error("LoanAccountError - InvalidLoanState: {0}")]
    InvalidLoanState(LoanStateViolation),
    #[error("LoanAccountError - UninitializedField: {0}")]
    UninitializedField(&'static str),
}

impl From<LoanStateViolation> for LoanAccountError {
    fn from(violation: LoanStateViolation) -> Self {
        Self::InvalidLoanState(violation)
    }
}

impl From<derive_builder::UninitializedFieldError> for LoanAccountError {
    fn from(e: derive_builder::UninitializedFieldError) -> Self {
        Self::UninitializedField(e.field_name())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanStateViolation {
    #[error("term_in_periods {term_in_periods} outside 1..={max}")]
    TermInPeriodsOutOfRange { term_in_periods: u8, max: u8 },
    #[error("pending_payments {pending_payments} exceeds term_in_periods {term_in_periods}")]
    PendingExceedsTerm {
        pending_payments: u8,
        term_in_periods: u8,
    },
    #[error("paid {paid} exceeds principal {principal} on an active loan")]
    PaidExceedsPrincipal {
        paid: TokenAmount,
        principal: TokenAmount,
    },
    #[error("loan is fully repaid but still flagged active")]
    FullyRepaidButActive,
    #[error("active loan has {outstanding} outstanding but no pending installments")]
    ActiveWithoutPendingPayments { outstanding: TokenAmount },
    #[error("term of {term}s does not split evenly into {term_in_periods} periods")]
    TermNotDivisible { term: u64, term_in_periods: u8 },
}
