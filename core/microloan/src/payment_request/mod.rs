pub mod error;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
#[cfg(feature = "json-schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use std::collections::HashMap;

use crate::{
    lifecycle::{self, LoanLifecycleError, LoanOpening, LoanTerms, OpenLoanRequest},
    loan_account::LoanAccount,
    primitives::*,
};

pub use error::PaymentRequestError;

/// The charge payload a merchant hands to a payer, e.g. through a QR code or
/// a pay link.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub merchant: Address,
    /// Whole units of `token`.
    pub amount: Decimal,
    pub token: AssetId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub allow_fallback: bool,
    #[serde(default, rename = "enableBNPL")]
    pub enable_bnpl: bool,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub loan_term: Option<u8>,
}

impl PaymentRequest {
    pub fn from_json(payload: &str) -> Result<Self, PaymentRequestError> {
        let request: Self = serde_json::from_str(payload)?;
        request.validate()?;
        Ok(request)
    }

    pub fn to_json(&self) -> Result<String, PaymentRequestError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), PaymentRequestError> {
        if self.amount <= Decimal::ZERO {
            return Err(PaymentRequestError::NonPositiveAmount(self.amount));
        }
        if self.merchant.is_empty() {
            return Err(PaymentRequestError::MissingMerchant);
        }
        if self.enable_bnpl
            && !self
                .loan_term
                .is_some_and(|term| (1..=MAX_TERM_IN_PERIODS).contains(&term))
        {
            return Err(PaymentRequestError::InvalidLoanTerm {
                loan_term: self.loan_term,
                max: MAX_TERM_IN_PERIODS,
            });
        }
        Ok(())
    }

    /// Installments offered to the payer, if buy-now-pay-later is enabled.
    pub fn bnpl_term(&self) -> Option<u8> {
        self.loan_term.filter(|_| self.enable_bnpl)
    }

    /// What the merchant should expect at worst: the platform fee grows by
    /// `fee_pct` for every installment of a buy-now-pay-later term, and never
    /// exceeds the amount itself.
    pub fn merchant_quote(&self, fee_pct: Decimal) -> Result<MerchantQuote, PaymentRequestError> {
        if fee_pct.is_sign_negative() && !fee_pct.is_zero() {
            return Err(MoneyError::InvalidRate(fee_pct).into());
        }
        let periods = Decimal::from(self.bnpl_term().unwrap_or(1));
        let fee = (fee_pct
            .checked_mul(periods)
            .and_then(|pct| pct.checked_mul(self.amount))
            .ok_or(MoneyError::Overflow)?
            / Decimal::ONE_HUNDRED)
            .min(self.amount);
        Ok(MerchantQuote {
            fee,
            minimum_received: self.amount - fee,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct MerchantQuote {
    pub fee: Decimal,
    pub minimum_received: Decimal,
}

/// Maps payload token identifiers to the assets the ledger knows.
#[derive(Debug, Clone)]
pub struct AssetRegistry {
    usd: Asset,
    tokens: HashMap<AssetId, Asset>,
}

impl AssetRegistry {
    pub fn new(usd: Asset) -> Self {
        Self {
            usd,
            tokens: HashMap::new(),
        }
    }

    pub fn with_token(mut self, asset: Asset) -> Self {
        self.tokens.insert(asset.id.clone(), asset);
        self
    }

    pub fn usd(&self) -> &Asset {
        &self.usd
    }

    pub fn resolve(&self, id: &AssetId) -> Result<&Asset, PaymentRequestError> {
        if *id == self.usd.id {
            return Ok(&self.usd);
        }
        self.tokens
            .get(id)
            .ok_or_else(|| PaymentRequestError::UnknownToken(id.clone()))
    }
}

/// The payer's side of a payment, as read from the ledger just before
/// choosing how to pay.
#[derive(Debug, Clone)]
pub struct PaymentContext {
    pub borrower: LoanAccount,
    pub token_balance: TokenAmount,
    pub usd_balance: TokenAmount,
    pub pool_balance: TokenAmount,
    /// Requested-token units per USD.
    pub usd_rate: ExchangeRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct FeeSplit {
    pub fee: TokenAmount,
    pub to_merchant: TokenAmount,
}

impl FeeSplit {
    /// `fee = floor(amount * fee_pct / 100)`, the remainder goes to the
    /// merchant.
    pub fn compute(amount: TokenAmount, fee_pct: Decimal) -> Result<Self, MoneyError> {
        if fee_pct.is_sign_negative() && !fee_pct.is_zero() {
            return Err(MoneyError::InvalidRate(fee_pct));
        }
        let units = i128::try_from(amount.into_inner()).map_err(|_| MoneyError::Overflow)?;
        let fee = Decimal::try_from_i128_with_scale(units, 0)
            .map_err(|_| MoneyError::Overflow)?
            .checked_mul(fee_pct)
            .ok_or(MoneyError::Overflow)?
            / Decimal::ONE_HUNDRED;
        let fee = fee
            .floor()
            .to_u128()
            .map(TokenAmount::new)
            .ok_or(MoneyError::Overflow)?
            .min(amount);
        Ok(Self {
            fee,
            to_merchant: amount.saturating_sub(fee),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct DirectPayment {
    pub correlation_id: CorrelationId,
    pub asset: AssetId,
    pub total: TokenAmount,
    pub split: FeeSplit,
}

impl DirectPayment {
    fn new(asset: &Asset, total: TokenAmount, fee_pct: Decimal) -> Result<Self, MoneyError> {
        Ok(Self {
            correlation_id: CorrelationId::new(),
            asset: asset.id.clone(),
            total,
            split: FeeSplit::compute(total, fee_pct)?,
        })
    }
}

/// Every way the payer can settle a request right now. `bnpl_blocked`
/// explains why a requested buy-now-pay-later option is unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOptions {
    pub usd_quote: Decimal,
    pub direct: Option<DirectPayment>,
    pub usd_fallback: Option<DirectPayment>,
    pub bnpl: Option<LoanOpening>,
    pub bnpl_blocked: Option<LoanLifecycleError>,
}

impl PaymentOptions {
    pub fn is_payable(&self) -> bool {
        self.direct.is_some() || self.usd_fallback.is_some() || self.bnpl.is_some()
    }
}

pub fn evaluate_payment_options(
    request: &PaymentRequest,
    registry: &AssetRegistry,
    context: &PaymentContext,
    terms: &LoanTerms,
    fee_pct: Decimal,
) -> Result<PaymentOptions, PaymentRequestError> {
    request.validate()?;
    let token = registry.resolve(&request.token)?;
    let usd = registry.usd();
    let paying_usd = token.id == usd.id;
    let rate = if paying_usd {
        ExchangeRate::PAR
    } else {
        context.usd_rate
    };

    let amount = TokenAmount::from_major(request.amount, token, Rounding::HalfAwayFromZero)?;
    let price_usd = rate.token_to_usd(request.amount)?;
    let usd_quote = price_usd.round_dp_with_strategy(
        u32::from(usd.decimals),
        RoundingStrategy::MidpointAwayFromZero,
    );
    let quote_units = TokenAmount::from_major(usd_quote, usd, Rounding::HalfAwayFromZero)?;

    let direct = if context.token_balance >= amount {
        Some(DirectPayment::new(token, amount, fee_pct)?)
    } else {
        None
    };
    let usd_fallback =
        if request.allow_fallback && !paying_usd && context.usd_balance >= quote_units {
            Some(DirectPayment::new(usd, quote_units, fee_pct)?)
        } else {
            None
        };

    let (bnpl, bnpl_blocked) = match request.bnpl_term() {
        Some(term_in_periods) => {
            let open = OpenLoanRequest {
                product_price_usd: price_usd,
                term_in_periods,
                merchant: request.merchant.clone(),
                collateral_asset: usd.clone(),
                loan_asset: token.clone(),
                usd_rate: rate,
            };
            match size_bnpl(&context.borrower, &open, terms, context) {
                Ok(opening) => (Some(opening), None),
                Err(e) => (None, Some(e)),
            }
        }
        None => (None, None),
    };

    Ok(PaymentOptions {
        usd_quote,
        direct,
        usd_fallback,
        bnpl,
        bnpl_blocked,
    })
}

fn size_bnpl(
    borrower: &LoanAccount,
    request: &OpenLoanRequest,
    terms: &LoanTerms,
    context: &PaymentContext,
) -> Result<LoanOpening, LoanLifecycleError> {
    let opening = lifecycle::request_open_loan(borrower, request, terms)?;
    opening.ensure_collateral_balance(context.usd_balance)?;
    opening.ensure_pool_liquidity(context.pool_balance)?;
    Ok(opening)
}
