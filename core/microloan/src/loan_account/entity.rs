use derive_builder::Builder;
#[cfg(feature = "json-schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::primitives::*;

use super::error::{LoanAccountError, LoanStateViolation};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::AsRefStr, strum::Display,
)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoanClosure {
    Repaid,
    Liquidated,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::AsRefStr, strum::Display,
)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(tag = "type", content = "reason", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoanStatus {
    NoLoan,
    Open,
    PartiallyRepaid,
    Closed(LoanClosure),
}

impl LoanStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, LoanStatus::Closed(_))
    }
}

/// Snapshot of one borrower's loan slot on the ledger.
///
/// An address that never borrowed reads back as the all-zero record, which is
/// the `Default` value here. `paid` tracks principal repayment only, `fee` is
/// reported alongside and never enters installment arithmetic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(
    pattern = "owned",
    build_fn(private, name = "build_unchecked", error = "LoanAccountError")
)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct LoanAccount {
    #[builder(default)]
    pub collateral: TokenAmount,
    #[builder(default)]
    pub principal: TokenAmount,
    #[builder(default)]
    pub fee: TokenAmount,
    #[builder(default)]
    pub start_time: Timestamp,
    /// Whole loan duration in seconds.
    #[builder(default)]
    pub term: u64,
    #[builder(default)]
    pub term_in_periods: u8,
    #[builder(default)]
    pub pending_payments: u8,
    #[builder(default)]
    pub paid: TokenAmount,
    #[builder(default)]
    pub liquidated: u32,
    #[builder(default)]
    pub active: bool,
}

impl LoanAccountBuilder {
    pub fn build(self) -> Result<LoanAccount, LoanAccountError> {
        let account = self.build_unchecked()?;
        account.validate()?;
        Ok(account)
    }
}

impl LoanAccount {
    pub fn builder() -> LoanAccountBuilder {
        LoanAccountBuilder::default()
    }

    pub fn validate(&self) -> Result<(), LoanAccountError> {
        if self.term_in_periods > MAX_TERM_IN_PERIODS || (self.active && self.term_in_periods == 0)
        {
            return Err(LoanStateViolation::TermInPeriodsOutOfRange {
                term_in_periods: self.term_in_periods,
                max: MAX_TERM_IN_PERIODS,
            }
            .into());
        }

        if self.pending_payments > self.term_in_periods {
            return Err(LoanStateViolation::PendingExceedsTerm {
                pending_payments: self.pending_payments,
                term_in_periods: self.term_in_periods,
            }
            .into());
        }

        if !self.active {
            return Ok(());
        }

        if self.paid > self.principal {
            return Err(LoanStateViolation::PaidExceedsPrincipal {
                paid: self.paid,
                principal: self.principal,
            }
            .into());
        }

        if self.pending_payments == 0 {
            if self.paid == self.principal {
                return Err(LoanStateViolation::FullyRepaidButActive.into());
            }
            return Err(LoanStateViolation::ActiveWithoutPendingPayments {
                outstanding: self.outstanding_principal(),
            }
            .into());
        }

        if self.term % u64::from(self.term_in_periods) != 0 {
            return Err(LoanStateViolation::TermNotDivisible {
                term: self.term,
                term_in_periods: self.term_in_periods,
            }
            .into());
        }

        Ok(())
    }

    pub fn status(&self) -> LoanStatus {
        if self.active {
            if self.pending_payments < self.term_in_periods {
                LoanStatus::PartiallyRepaid
            } else {
                LoanStatus::Open
            }
        } else if self.liquidated > 0 {
            LoanStatus::Closed(LoanClosure::Liquidated)
        } else if self.term_in_periods > 0 && self.pending_payments == 0 {
            LoanStatus::Closed(LoanClosure::Repaid)
        } else {
            LoanStatus::NoLoan
        }
    }

    pub fn paid_periods(&self) -> u8 {
        self.term_in_periods.saturating_sub(self.pending_payments)
    }

    pub fn outstanding_principal(&self) -> TokenAmount {
        self.principal.saturating_sub(self.paid)
    }

    /// The snapshot the ledger should report once `amount` has been repaid
    /// against this one, assuming no other writer interleaves.
    pub fn after_repayment(&self, amount: TokenAmount) -> Option<LoanAccount> {
        let paid = self.paid.checked_add(amount)?;
        let pending_payments = self.pending_payments.checked_sub(1)?;
        Some(LoanAccount {
            paid,
            pending_payments,
            active: !(pending_payments == 0 && paid >= self.principal),
            ..self.clone()
        })
    }
}
