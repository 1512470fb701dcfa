pub mod error;

use rust_decimal::Decimal;
#[cfg(feature = "json-schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{loan_account::LoanAccount, primitives::*};

pub use error::ScheduleError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::AsRefStr, strum::Display,
)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PeriodStatus {
    Paid,
    /// The first unpaid installment.
    DueSoon { days_until_due: i64 },
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
pub struct ScheduledInstallment {
    pub index: u8,
    pub due_date: Timestamp,
    pub amount: TokenAmount,
    pub status: PeriodStatus,
    pub overdue: bool,
    pub days_until_due: i64,
}

/// Seconds per installment, truncated the same way the ledger truncates.
pub fn period_length(account: &LoanAccount) -> Result<u64, ScheduleError> {
    if account.term_in_periods == 0 {
        return Err(ScheduleError::NoPeriods);
    }
    Ok(account.term / u64::from(account.term_in_periods))
}

pub fn period_due_date(
    account: &LoanAccount,
    period_index: u8,
) -> Result<Timestamp, ScheduleError> {
    if period_index >= account.term_in_periods {
        return Err(ScheduleError::IndexOutOfRange {
            index: period_index,
            term_in_periods: account.term_in_periods,
        });
    }
    let offset = (u64::from(period_index) + 1)
        .checked_mul(period_length(account)?)
        .ok_or(ScheduleError::TimestampOverflow)?;
    account
        .start_time
        .checked_add_seconds(offset)
        .ok_or(ScheduleError::TimestampOverflow)
}

/// Floor of `principal / term_in_periods`. The remainder is not spread over
/// the periods; the last installment of [`repayment_schedule`] absorbs it.
pub fn period_amount(account: &LoanAccount) -> TokenAmount {
    account
        .principal
        .div_floor(u128::from(account.term_in_periods))
        .unwrap_or(TokenAmount::ZERO)
}

pub fn period_status(
    account: &LoanAccount,
    period_index: u8,
    now: Timestamp,
) -> Result<PeriodStatus, ScheduleError> {
    let due_date = period_due_date(account, period_index)?;
    let paid_periods = account.paid_periods();
    let period = period_index + 1;

    let status = if period <= paid_periods {
        PeriodStatus::Paid
    } else if u16::from(period) == u16::from(paid_periods) + 1 {
        PeriodStatus::DueSoon {
            days_until_due: days_until(due_date, now),
        }
    } else {
        PeriodStatus::Pending
    };
    Ok(status)
}

pub fn next_due_date(account: &LoanAccount) -> Result<Timestamp, ScheduleError> {
    if account.pending_payments == 0 {
        return Err(ScheduleError::NoPaymentDue);
    }
    if account.pending_payments > account.term_in_periods {
        return Err(ScheduleError::InconsistentPeriods {
            pending_payments: account.pending_payments,
            term_in_periods: account.term_in_periods,
        });
    }
    period_due_date(account, account.paid_periods())
}

/// Outstanding principal split evenly over the remaining installments,
/// floored. Zero once nothing is pending.
pub fn minimum_payment(account: &LoanAccount) -> TokenAmount {
    account
        .outstanding_principal()
        .div_floor(u128::from(account.pending_payments))
        .unwrap_or(TokenAmount::ZERO)
}

/// Share of principal repaid, in percent. Zero for a zero principal and
/// capped at 100.
pub fn percent_repaid(account: &LoanAccount) -> Decimal {
    account.paid.percent_of(account.principal)
}

pub fn repayment_schedule(
    account: &LoanAccount,
    now: Timestamp,
) -> Result<Vec<ScheduledInstallment>, ScheduleError> {
    let per_period = period_amount(account);
    let last_index = account.term_in_periods.saturating_sub(1);
    let last_amount = per_period
        .checked_mul(u128::from(last_index))
        .map(|earlier| account.principal.saturating_sub(earlier))
        .unwrap_or(per_period);

    (0..account.term_in_periods)
        .map(|index| {
            let due_date = period_due_date(account, index)?;
            let status = period_status(account, index, now)?;
            Ok(ScheduledInstallment {
                index,
                due_date,
                amount: if index == last_index {
                    last_amount
                } else {
                    per_period
                },
                overdue: status != PeriodStatus::Paid && due_date <= now,
                days_until_due: days_until(due_date, now),
                status,
            })
        })
        .collect()
}
