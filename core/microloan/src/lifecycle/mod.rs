pub mod error;

use rust_decimal::Decimal;
#[cfg(feature = "json-schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{loan_account::LoanAccount, primitives::*, schedule};

pub use error::LoanLifecycleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
pub struct LoanTerms {
    pub collateral_ratio: CollateralRatio,
    pub max_term_in_periods: u8,
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self {
            collateral_ratio: CollateralRatio::default(),
            max_term_in_periods: MAX_TERM_IN_PERIODS,
        }
    }
}

impl LoanTerms {
    pub fn ensure_supported_term(&self, term_in_periods: u8) -> Result<(), LoanLifecycleError> {
        let max = self.max_term_in_periods.min(MAX_TERM_IN_PERIODS);
        if term_in_periods == 0 || term_in_periods > max {
            return Err(LoanLifecycleError::UnsupportedTerm {
                requested: term_in_periods,
                max,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
pub struct OpenLoanRequest {
    pub product_price_usd: Decimal,
    pub term_in_periods: u8,
    pub merchant: Address,
    pub collateral_asset: Asset,
    pub loan_asset: Asset,
    /// Loan-asset units per USD.
    pub usd_rate: ExchangeRate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
pub struct LoanOpening {
    pub correlation_id: CorrelationId,
    pub collateral_amount: TokenAmount,
    pub principal_amount: TokenAmount,
    pub term_in_periods: u8,
    pub merchant: Address,
}

impl LoanOpening {
    pub fn ensure_collateral_balance(
        &self,
        available: TokenAmount,
    ) -> Result<(), LoanLifecycleError> {
        if self.collateral_amount > available {
            return Err(LoanLifecycleError::InsufficientFunds {
                required: self.collateral_amount,
                available,
            });
        }
        Ok(())
    }

    pub fn ensure_pool_liquidity(
        &self,
        pool_balance: TokenAmount,
    ) -> Result<(), LoanLifecycleError> {
        if self.principal_amount > pool_balance {
            return Err(LoanLifecycleError::InsufficientPoolLiquidity {
                required: self.principal_amount,
                available: pool_balance,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
pub struct Repayment {
    pub correlation_id: CorrelationId,
    pub amount: TokenAmount,
    pub pending_payments_after: u8,
    pub settles_loan: bool,
}

impl Repayment {
    pub fn expected_account(&self, before: &LoanAccount) -> Option<LoanAccount> {
        before.after_repayment(self.amount)
    }

    /// Whether `reported` shows this repayment as landed. Other payments may
    /// have landed as well, so only lower bounds are checked.
    pub fn is_reflected_in(&self, before: &LoanAccount, reported: &LoanAccount) -> bool {
        let Some(expected) = self.expected_account(before) else {
            return false;
        };
        reported.paid >= expected.paid
            && reported.pending_payments <= expected.pending_payments
            && (expected.active || !reported.active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
pub struct CollateralWithdrawal {
    pub correlation_id: CorrelationId,
    pub amount: TokenAmount,
}

pub fn request_open_loan(
    borrower: &LoanAccount,
    request: &OpenLoanRequest,
    terms: &LoanTerms,
) -> Result<LoanOpening, LoanLifecycleError> {
    borrower.validate()?;
    if borrower.active {
        return Err(LoanLifecycleError::LoanAlreadyActive {
            outstanding: borrower.outstanding_principal(),
        });
    }
    terms.ensure_supported_term(request.term_in_periods)?;

    let price = request.product_price_usd;
    if price <= Decimal::ZERO {
        return Err(LoanLifecycleError::InvalidProductPrice(price));
    }

    let collateral_usd = price
        .checked_mul(terms.collateral_ratio.into_inner())
        .ok_or(MoneyError::Overflow)?;
    let collateral_amount =
        TokenAmount::from_major(collateral_usd, &request.collateral_asset, Rounding::Ceil)?;
    let principal_amount = TokenAmount::from_major(
        request.usd_rate.usd_to_token(price)?,
        &request.loan_asset,
        Rounding::HalfAwayFromZero,
    )?;
    if principal_amount.is_zero() {
        return Err(LoanLifecycleError::InvalidProductPrice(price));
    }

    Ok(LoanOpening {
        correlation_id: CorrelationId::new(),
        collateral_amount,
        principal_amount,
        term_in_periods: request.term_in_periods,
        merchant: request.merchant.clone(),
    })
}

pub fn request_repayment(
    account: &LoanAccount,
    available_balance: TokenAmount,
) -> Result<Repayment, LoanLifecycleError> {
    account.validate()?;
    if !account.active {
        return Err(LoanLifecycleError::NoActiveLoan);
    }

    // A principal smaller than the number of pending installments floors
    // every installment to zero; the whole balance is requested instead.
    let amount = match schedule::minimum_payment(account) {
        amount if amount.is_zero() => account.outstanding_principal(),
        amount => amount,
    };
    if amount.is_zero() {
        return Err(LoanLifecycleError::NoPaymentDue);
    }
    if amount > available_balance {
        return Err(LoanLifecycleError::InsufficientFunds {
            required: amount,
            available: available_balance,
        });
    }

    let pending_payments_after = account.pending_payments - 1;
    Ok(Repayment {
        correlation_id: CorrelationId::new(),
        amount,
        pending_payments_after,
        settles_loan: pending_payments_after == 0,
    })
}

pub fn request_collateral_withdrawal(
    account: &LoanAccount,
) -> Result<CollateralWithdrawal, LoanLifecycleError> {
    account.validate()?;
    if account.active {
        return Err(LoanLifecycleError::LoanStillActive {
            outstanding: account.outstanding_principal(),
        });
    }
    if account.collateral.is_zero() {
        return Err(LoanLifecycleError::NothingToWithdraw);
    }
    Ok(CollateralWithdrawal {
        correlation_id: CorrelationId::new(),
        amount: account.collateral,
    })
}
