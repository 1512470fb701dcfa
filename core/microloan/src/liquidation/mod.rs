pub mod error;

#[cfg(feature = "json-schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    loan_account::LoanAccount,
    primitives::*,
    schedule::{self, ScheduleError},
};

pub use error::LiquidationError;

/// What a liquidation of the loan would settle, in the ledger's units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct LiquidationPlan {
    /// Outstanding principal, in loan-asset units.
    pub debt: TokenAmount,
    pub seized_collateral: TokenAmount,
    pub returned_collateral: TokenAmount,
    pub overdue_periods: u8,
}

pub fn debt_balance(account: &LoanAccount) -> TokenAmount {
    account.outstanding_principal()
}

/// Installments whose due date has been reached but which are still unpaid.
pub fn overdue_periods(account: &LoanAccount, now: Timestamp) -> Result<u8, ScheduleError> {
    Ok(periods_due(account, now)?.saturating_sub(account.paid_periods()))
}

/// Principal of every installment due by `now`, less what has been paid.
pub fn debt_balance_due(
    account: &LoanAccount,
    now: Timestamp,
) -> Result<TokenAmount, ScheduleError> {
    let due = periods_due(account, now)?;
    let scheduled = schedule::repayment_schedule(account, now)?
        .into_iter()
        .take(usize::from(due))
        .try_fold(TokenAmount::ZERO, |total, installment| {
            total.checked_add(installment.amount)
        })
        .unwrap_or(account.principal);
    Ok(scheduled
        .saturating_sub(account.paid)
        .min(debt_balance(account)))
}

pub fn plan_liquidation(
    account: &LoanAccount,
    now: Timestamp,
    usd_in_asset: ExchangeRate,
    loan_asset: &Asset,
    collateral_asset: &Asset,
) -> Result<LiquidationPlan, LiquidationError> {
    account.validate()?;
    if !account.active {
        return Err(LiquidationError::NoActiveLoan);
    }

    let overdue = overdue_periods(account, now)?;
    if overdue == 0 {
        return Err(LiquidationError::NotLiquidatable {
            next_due_date: schedule::next_due_date(account)?,
        });
    }

    let debt = debt_balance(account);
    let debt_usd = usd_in_asset.token_to_usd(debt.to_major(loan_asset)?)?;
    let seized_collateral = TokenAmount::from_major(debt_usd, collateral_asset, Rounding::Ceil)?
        .min(account.collateral);

    Ok(LiquidationPlan {
        debt,
        seized_collateral,
        returned_collateral: account.collateral.saturating_sub(seized_collateral),
        overdue_periods: overdue,
    })
}

fn periods_due(account: &LoanAccount, now: Timestamp) -> Result<u8, ScheduleError> {
    let mut due = 0;
    for index in 0..account.term_in_periods {
        if schedule::period_due_date(account, index)? > now {
            break;
        }
        due += 1;
    }
    Ok(due)
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::loan_account::{LoanAccountError, LoanStateViolation};

    const THIRTY_DAYS: i64 = 2_592_000;

    fn usd() -> Asset {
        Asset::new("usd", 6)
    }

    fn mxn() -> Asset {
        Asset::new("mxn", 6)
    }

    fn loan(pending_payments: u8, paid: u128) -> LoanAccount {
        LoanAccount::builder()
            .collateral(TokenAmount::new(36_960_000))
            .principal(TokenAmount::new(600_000_000))
            .start_time(Timestamp::EPOCH)
            .term(15_552_000)
            .term_in_periods(6)
            .pending_payments(pending_payments)
            .paid(TokenAmount::new(paid))
            .active(true)
            .build()
            .unwrap()
    }

    fn day_after(periods: i64) -> Timestamp {
        Timestamp::from_unix_seconds(periods * THIRTY_DAYS + 86_400)
    }

    #[test]
    fn overdue_counts_unpaid_due_installments() {
        assert_eq!(overdue_periods(&loan(6, 0), Timestamp::EPOCH), Ok(0));
        assert_eq!(
            overdue_periods(&loan(6, 0), Timestamp::from_unix_seconds(THIRTY_DAYS)),
            Ok(1)
        );
        assert_eq!(overdue_periods(&loan(5, 100_000_000), day_after(1)), Ok(0));
        assert_eq!(overdue_periods(&loan(5, 100_000_000), day_after(3)), Ok(2));
    }

    #[test]
    fn debt_due_excludes_future_installments() {
        let account = loan(5, 100_000_000);
        assert_eq!(debt_balance(&account), TokenAmount::new(500_000_000));
        assert_eq!(debt_balance_due(&account, day_after(1)), Ok(TokenAmount::ZERO));
        assert_eq!(
            debt_balance_due(&account, day_after(3)),
            Ok(TokenAmount::new(200_000_000))
        );
        assert_eq!(
            debt_balance_due(&account, day_after(10)),
            Ok(TokenAmount::new(500_000_000))
        );
    }

    #[test]
    fn current_loan_is_not_liquidatable() {
        let res = plan_liquidation(
            &loan(5, 100_000_000),
            day_after(1),
            ExchangeRate::try_new(dec!(20)).unwrap(),
            &mxn(),
            &usd(),
        );
        assert_eq!(
            res,
            Err(LiquidationError::NotLiquidatable {
                next_due_date: Timestamp::from_unix_seconds(2 * THIRTY_DAYS)
            })
        );
    }

    #[test]
    fn seizes_debt_value_and_returns_rest() {
        let plan = plan_liquidation(
            &loan(5, 100_000_000),
            day_after(2),
            ExchangeRate::try_new(dec!(20)).unwrap(),
            &mxn(),
            &usd(),
        )
        .unwrap();
        assert_eq!(plan.debt, TokenAmount::new(500_000_000));
        assert_eq!(plan.seized_collateral, TokenAmount::new(25_000_000));
        assert_eq!(plan.returned_collateral, TokenAmount::new(11_960_000));
        assert_eq!(plan.overdue_periods, 1);
    }

    #[test]
    fn seizure_is_capped_at_collateral() {
        let plan = plan_liquidation(
            &loan(6, 0),
            day_after(1),
            ExchangeRate::try_new(dec!(10)).unwrap(),
            &mxn(),
            &usd(),
        )
        .unwrap();
        assert_eq!(plan.seized_collateral, TokenAmount::new(36_960_000));
        assert_eq!(plan.returned_collateral, TokenAmount::ZERO);
    }

    #[test]
    fn snapshot_without_pending_installments_is_rejected() {
        let account = LoanAccount {
            pending_payments: 0,
            ..loan(5, 100_000_000)
        };
        assert!(matches!(
            plan_liquidation(
                &account,
                day_after(10),
                ExchangeRate::PAR,
                &mxn(),
                &usd()
            ),
            Err(LiquidationError::LoanAccountError(
                LoanAccountError::InvalidLoanState(
                    LoanStateViolation::ActiveWithoutPendingPayments { .. }
                )
            ))
        ));
    }

    #[test]
    fn closed_loan_has_nothing_to_liquidate() {
        assert_eq!(
            plan_liquidation(
                &LoanAccount::default(),
                day_after(1),
                ExchangeRate::PAR,
                &mxn(),
                &usd()
            ),
            Err(LiquidationError::NoActiveLoan)
        );
    }
}
