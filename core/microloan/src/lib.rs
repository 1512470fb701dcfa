#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![cfg_attr(feature = "fail-on-warnings", deny(clippy::all))]

mod config;
mod confirmation;
pub mod error;
pub mod lending_pool;
pub mod lifecycle;
pub mod liquidation;
pub mod loan_account;
pub mod payment_request;
mod primitives;
pub mod schedule;
mod submission;

use rust_decimal::Decimal;
use tracing::instrument;

use std::sync::Arc;

pub use config::*;
pub use confirmation::*;
use error::*;
pub use lending_pool::{
    Deposit, FeeClaim, LenderSnapshot, LendingPoolError, PoolSnapshot, ShareWithdrawal,
};
pub use lifecycle::{
    CollateralWithdrawal, LoanLifecycleError, LoanOpening, LoanTerms, OpenLoanRequest, Repayment,
};
pub use liquidation::{LiquidationError, LiquidationPlan};
pub use loan_account::*;
pub use payment_request::{
    AssetRegistry, DirectPayment, FeeSplit, MerchantQuote, PaymentContext, PaymentOptions,
    PaymentRequest, PaymentRequestError,
};
pub use primitives::*;
pub use schedule::{PeriodStatus, ScheduleError, ScheduledInstallment};
pub use submission::SubmissionFailed;

/// Entry point to the microloan rules, with the configured collateral ratio,
/// term limit, platform fee and rejection markers applied.
#[derive(Clone)]
pub struct MicroLoans {
    config: Arc<MicroloanConfig>,
    terms: LoanTerms,
}

impl MicroLoans {
    pub fn init(config: MicroloanConfig) -> Result<Self, CoreMicroloanError> {
        config.validate()?;
        let terms = config.loan_terms()?;
        Ok(Self {
            config: Arc::new(config),
            terms,
        })
    }

    pub fn config(&self) -> &MicroloanConfig {
        &self.config
    }

    pub fn loan_terms(&self) -> LoanTerms {
        self.terms
    }

    #[instrument(name = "microloan.loan_status", skip(self))]
    pub fn loan_status(&self, account: &LoanAccount) -> Result<LoanStatus, CoreMicroloanError> {
        account.validate()?;
        Ok(account.status())
    }

    #[instrument(name = "microloan.period_due_date", skip(self))]
    pub fn period_due_date(
        &self,
        account: &LoanAccount,
        period_index: u8,
    ) -> Result<Timestamp, CoreMicroloanError> {
        Ok(schedule::period_due_date(account, period_index)?)
    }

    pub fn period_amount(&self, account: &LoanAccount) -> TokenAmount {
        schedule::period_amount(account)
    }

    #[instrument(name = "microloan.period_status", skip(self))]
    pub fn period_status(
        &self,
        account: &LoanAccount,
        period_index: u8,
        now: Timestamp,
    ) -> Result<PeriodStatus, CoreMicroloanError> {
        Ok(schedule::period_status(account, period_index, now)?)
    }

    #[instrument(name = "microloan.next_due_date", skip(self))]
    pub fn next_due_date(&self, account: &LoanAccount) -> Result<Timestamp, CoreMicroloanError> {
        Ok(schedule::next_due_date(account)?)
    }

    pub fn minimum_payment(&self, account: &LoanAccount) -> TokenAmount {
        schedule::minimum_payment(account)
    }

    pub fn percent_repaid(&self, account: &LoanAccount) -> Decimal {
        schedule::percent_repaid(account)
    }

    #[instrument(name = "microloan.repayment_schedule", skip(self))]
    pub fn repayment_schedule(
        &self,
        account: &LoanAccount,
        now: Timestamp,
    ) -> Result<Vec<ScheduledInstallment>, CoreMicroloanError> {
        Ok(schedule::repayment_schedule(account, now)?)
    }

    #[instrument(
        name = "microloan.request_open_loan",
        skip(self, borrower, request),
        fields(
            merchant = %request.merchant,
            term_in_periods = request.term_in_periods,
            product_price_usd = %request.product_price_usd,
        )
    )]
    pub fn request_open_loan(
        &self,
        borrower: &LoanAccount,
        request: &OpenLoanRequest,
    ) -> Result<LoanOpening, CoreMicroloanError> {
        Ok(lifecycle::request_open_loan(borrower, request, &self.terms)?)
    }

    #[instrument(name = "microloan.request_repayment", skip(self))]
    pub fn request_repayment(
        &self,
        account: &LoanAccount,
        available_balance: TokenAmount,
    ) -> Result<Repayment, CoreMicroloanError> {
        Ok(lifecycle::request_repayment(account, available_balance)?)
    }

    #[instrument(name = "microloan.request_collateral_withdrawal", skip(self))]
    pub fn request_collateral_withdrawal(
        &self,
        account: &LoanAccount,
    ) -> Result<CollateralWithdrawal, CoreMicroloanError> {
        Ok(lifecycle::request_collateral_withdrawal(account)?)
    }

    #[instrument(name = "microloan.request_deposit", skip(self))]
    pub fn request_deposit(
        &self,
        lender: &LenderSnapshot,
        amount: TokenAmount,
        available_balance: TokenAmount,
    ) -> Result<Deposit, CoreMicroloanError> {
        Ok(lending_pool::request_deposit(
            lender,
            amount,
            available_balance,
        )?)
    }

    #[instrument(name = "microloan.request_claim", skip(self))]
    pub fn request_claim(
        &self,
        pool: &PoolSnapshot,
        lender: &LenderSnapshot,
        now: Timestamp,
    ) -> Result<FeeClaim, CoreMicroloanError> {
        Ok(lending_pool::request_claim(pool, lender, now)?)
    }

    #[instrument(name = "microloan.request_withdraw_shares", skip(self))]
    pub fn request_withdraw_shares(
        &self,
        pool: &PoolSnapshot,
        lender: &LenderSnapshot,
        now: Timestamp,
    ) -> Result<ShareWithdrawal, CoreMicroloanError> {
        Ok(lending_pool::request_withdraw_shares(pool, lender, now)?)
    }

    #[instrument(name = "microloan.debt_balance_due", skip(self))]
    pub fn debt_balance_due(
        &self,
        account: &LoanAccount,
        now: Timestamp,
    ) -> Result<TokenAmount, CoreMicroloanError> {
        Ok(liquidation::debt_balance_due(account, now)?)
    }

    #[instrument(name = "microloan.plan_liquidation", skip(self))]
    pub fn plan_liquidation(
        &self,
        account: &LoanAccount,
        now: Timestamp,
        usd_in_asset: ExchangeRate,
        loan_asset: &Asset,
        collateral_asset: &Asset,
    ) -> Result<LiquidationPlan, CoreMicroloanError> {
        Ok(liquidation::plan_liquidation(
            account,
            now,
            usd_in_asset,
            loan_asset,
            collateral_asset,
        )?)
    }

    #[instrument(name = "microloan.parse_payment_request", skip_all)]
    pub fn parse_payment_request(
        &self,
        payload: &str,
    ) -> Result<PaymentRequest, CoreMicroloanError> {
        Ok(PaymentRequest::from_json(payload)?)
    }

    pub fn merchant_quote(
        &self,
        request: &PaymentRequest,
    ) -> Result<MerchantQuote, CoreMicroloanError> {
        Ok(request.merchant_quote(self.config.platform_fee_pct)?)
    }

    #[instrument(
        name = "microloan.evaluate_payment_options",
        skip(self, request, registry, context),
        fields(
            merchant = %request.merchant,
            token = %request.token,
            amount = %request.amount,
            enable_bnpl = request.enable_bnpl,
        )
    )]
    pub fn evaluate_payment_options(
        &self,
        request: &PaymentRequest,
        registry: &AssetRegistry,
        context: &PaymentContext,
    ) -> Result<PaymentOptions, CoreMicroloanError> {
        Ok(payment_request::evaluate_payment_options(
            request,
            registry,
            context,
            &self.terms,
            self.config.platform_fee_pct,
        )?)
    }

    pub fn classify_submission_failure(&self, reason: impl Into<String>) -> SubmissionFailed {
        SubmissionFailed::classify(reason, self.config.user_rejected_markers.as_slice())
    }

    pub fn confirmation_schedule(&self) -> PollSchedule {
        self.config.confirmation.schedule()
    }
}
