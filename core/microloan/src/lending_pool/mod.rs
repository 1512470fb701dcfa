pub mod error;

use rust_decimal::Decimal;
#[cfg(feature = "json-schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::primitives::*;

pub use error::LendingPoolError;

/// Pool-wide state of the liquidity pool and its fee pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct PoolSnapshot {
    pub total_shares: TokenAmount,
    /// Undeployed reserve balance.
    pub pool_balance: TokenAmount,
    pub claimable_fees: TokenAmount,
    pub total_fees: TokenAmount,
    /// Seconds after a deposit before fees may be claimed.
    pub claim_term: u64,
    /// Seconds after a deposit before shares may be withdrawn.
    pub locked_in_period: u64,
}

/// One lender's position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct LenderSnapshot {
    pub user_shares: TokenAmount,
    pub user_claimed: TokenAmount,
    pub balances_timestamp: Timestamp,
}

impl PoolSnapshot {
    /// `claimable_fees * user_shares / total_shares`, floored. Zero for an
    /// empty pool.
    pub fn entitlement(&self, lender: &LenderSnapshot) -> Result<TokenAmount, MoneyError> {
        if self.total_shares.is_zero() {
            return Ok(TokenAmount::ZERO);
        }
        self.claimable_fees.mul_div_floor(
            lender.user_shares.into_inner(),
            self.total_shares.into_inner(),
        )
    }

    pub fn unclaimed(&self, lender: &LenderSnapshot) -> Result<TokenAmount, MoneyError> {
        Ok(self.entitlement(lender)?.saturating_sub(lender.user_claimed))
    }

    /// Percent of deposited liquidity currently lent out, between 0 and 100.
    /// Zero for an empty pool.
    pub fn utilization(&self) -> Decimal {
        if self.total_shares.is_zero() {
            return Decimal::ZERO;
        }
        Decimal::ONE_HUNDRED - self.pool_balance.percent_of(self.total_shares)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
pub struct Deposit {
    pub correlation_id: CorrelationId,
    pub amount: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
pub struct FeeClaim {
    pub correlation_id: CorrelationId,
    pub amount: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "json-schema", derive(JsonSchema))]
pub struct ShareWithdrawal {
    pub correlation_id: CorrelationId,
    pub amount: TokenAmount,
}

pub fn request_deposit(
    lender: &LenderSnapshot,
    amount: TokenAmount,
    available_balance: TokenAmount,
) -> Result<Deposit, LendingPoolError> {
    if !lender.user_shares.is_zero() {
        return Err(LendingPoolError::ExistingDepositPresent {
            current_shares: lender.user_shares,
        });
    }
    if amount.is_zero() {
        return Err(LendingPoolError::ZeroDeposit);
    }
    if amount > available_balance {
        return Err(LendingPoolError::InsufficientFunds {
            required: amount,
            available: available_balance,
        });
    }
    Ok(Deposit {
        correlation_id: CorrelationId::new(),
        amount,
    })
}

pub fn request_claim(
    pool: &PoolSnapshot,
    lender: &LenderSnapshot,
    now: Timestamp,
) -> Result<FeeClaim, LendingPoolError> {
    let elapsed = now.seconds_since(lender.balances_timestamp);
    if !window_passed(elapsed, pool.claim_term) {
        return Err(LendingPoolError::ClaimNotYetAllowed {
            elapsed,
            required: pool.claim_term,
            allowed_at: window_end(lender.balances_timestamp, pool.claim_term),
        });
    }

    let entitlement = pool.entitlement(lender)?;
    if entitlement <= lender.user_claimed {
        return Err(LendingPoolError::NothingToClaim {
            entitlement,
            claimed: lender.user_claimed,
        });
    }
    Ok(FeeClaim {
        correlation_id: CorrelationId::new(),
        amount: entitlement.saturating_sub(lender.user_claimed),
    })
}

pub fn request_withdraw_shares(
    pool: &PoolSnapshot,
    lender: &LenderSnapshot,
    now: Timestamp,
) -> Result<ShareWithdrawal, LendingPoolError> {
    if lender.user_shares.is_zero() {
        return Err(LendingPoolError::NoSharesHeld);
    }

    let elapsed = now.seconds_since(lender.balances_timestamp);
    if !window_passed(elapsed, pool.locked_in_period) {
        return Err(LendingPoolError::LockupActive {
            elapsed,
            required: pool.locked_in_period,
            unlocked_at: window_end(lender.balances_timestamp, pool.locked_in_period),
        });
    }

    let unclaimed = pool.unclaimed(lender)?;
    if !unclaimed.is_zero() {
        return Err(LendingPoolError::PendingClaimOutstanding { unclaimed });
    }

    if lender.user_shares > pool.pool_balance {
        return Err(LendingPoolError::InsufficientPoolLiquidity {
            requested: lender.user_shares,
            available: pool.pool_balance,
        });
    }
    Ok(ShareWithdrawal {
        correlation_id: CorrelationId::new(),
        amount: lender.user_shares,
    })
}

fn window_passed(elapsed: i64, window: u64) -> bool {
    i64::try_from(window).is_ok_and(|window| elapsed >= window)
}

fn window_end(start: Timestamp, window: u64) -> Timestamp {
    start
        .checked_add_seconds(window)
        .unwrap_or(Timestamp::from_unix_seconds(i64::MAX))
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;

    use super::*;

    const DAY: u64 = 86_400;

    fn pool() -> PoolSnapshot {
        PoolSnapshot {
            total_shares: TokenAmount::new(1_000_000),
            pool_balance: TokenAmount::new(400_000),
            claimable_fees: TokenAmount::new(50_000),
            total_fees: TokenAmount::new(60_000),
            claim_term: DAY,
            locked_in_period: 30 * DAY,
        }
    }

    fn lender() -> LenderSnapshot {
        LenderSnapshot {
            user_shares: TokenAmount::new(250_000),
            user_claimed: TokenAmount::ZERO,
            balances_timestamp: Timestamp::from_unix_seconds(1_000),
        }
    }

    fn at(offset: u64) -> Timestamp {
        Timestamp::from_unix_seconds(1_000 + offset as i64)
    }

    #[test]
    fn entitlement_is_pro_rata() {
        assert_eq!(pool().entitlement(&lender()), Ok(TokenAmount::new(12_500)));
        let empty = PoolSnapshot {
            total_shares: TokenAmount::ZERO,
            ..pool()
        };
        assert_eq!(empty.entitlement(&lender()), Ok(TokenAmount::ZERO));
    }

    #[test]
    fn entitlement_handles_eighteen_decimal_pools() {
        let unit = 10u128.pow(18);
        let pool = PoolSnapshot {
            total_shares: TokenAmount::new(1_000_000 * unit),
            claimable_fees: TokenAmount::new(1_000 * unit),
            ..pool()
        };
        let lender = LenderSnapshot {
            user_shares: TokenAmount::new(500_000 * unit),
            balances_timestamp: Timestamp::from_unix_seconds(1_000),
            ..LenderSnapshot::default()
        };
        assert_eq!(pool.entitlement(&lender), Ok(TokenAmount::new(500 * unit)));
        let claim = request_claim(&pool, &lender, at(DAY)).unwrap();
        assert_eq!(claim.amount, TokenAmount::new(500 * unit));
    }

    #[test]
    fn utilization_tracks_lent_out_share() {
        assert_eq!(pool().utilization(), dec!(60));
        let idle = PoolSnapshot {
            pool_balance: TokenAmount::new(1_200_000),
            ..pool()
        };
        assert_eq!(idle.utilization(), Decimal::ZERO);
        assert_eq!(PoolSnapshot::default().utilization(), Decimal::ZERO);
    }

    mod request_deposit {
        use super::*;

        #[test]
        fn accepts_first_deposit() {
            let deposit = request_deposit(
                &LenderSnapshot::default(),
                TokenAmount::new(5_000),
                TokenAmount::new(5_000),
            )
            .unwrap();
            assert_eq!(deposit.amount, TokenAmount::new(5_000));
        }

        #[test]
        fn existing_deposit_blocks_any_amount() {
            for amount in [0, 1, 5_000, u128::MAX] {
                assert_eq!(
                    request_deposit(
                        &lender(),
                        TokenAmount::new(amount),
                        TokenAmount::new(u128::MAX)
                    ),
                    Err(LendingPoolError::ExistingDepositPresent {
                        current_shares: TokenAmount::new(250_000)
                    })
                );
            }
        }

        #[test]
        fn rejects_amount_above_balance() {
            assert_eq!(
                request_deposit(
                    &LenderSnapshot::default(),
                    TokenAmount::new(5_001),
                    TokenAmount::new(5_000)
                ),
                Err(LendingPoolError::InsufficientFunds {
                    required: TokenAmount::new(5_001),
                    available: TokenAmount::new(5_000),
                })
            );
        }

        #[test]
        fn rejects_zero_amount() {
            assert_eq!(
                request_deposit(&LenderSnapshot::default(), TokenAmount::ZERO, TokenAmount::new(1)),
                Err(LendingPoolError::ZeroDeposit)
            );
        }
    }

    mod request_claim {
        use super::*;

        #[test]
        fn blocked_during_cooldown() {
            let res = request_claim(&pool(), &lender(), at(10));
            assert_eq!(
                res,
                Err(LendingPoolError::ClaimNotYetAllowed {
                    elapsed: 10,
                    required: DAY,
                    allowed_at: at(DAY),
                })
            );
        }

        #[test]
        fn claims_unclaimed_entitlement() {
            let lender = LenderSnapshot {
                user_claimed: TokenAmount::new(2_500),
                ..lender()
            };
            let claim = request_claim(&pool(), &lender, at(DAY)).unwrap();
            assert_eq!(claim.amount, TokenAmount::new(10_000));
        }

        #[test]
        fn nothing_to_claim_once_claimed() {
            let lender = LenderSnapshot {
                user_claimed: TokenAmount::new(12_500),
                ..lender()
            };
            assert_eq!(
                request_claim(&pool(), &lender, at(2 * DAY)),
                Err(LendingPoolError::NothingToClaim {
                    entitlement: TokenAmount::new(12_500),
                    claimed: TokenAmount::new(12_500),
                })
            );
        }
    }

    mod request_withdraw_shares {
        use super::*;

        fn settled_lender() -> LenderSnapshot {
            LenderSnapshot {
                user_claimed: TokenAmount::new(12_500),
                ..lender()
            }
        }

        #[test]
        fn blocked_during_lockup() {
            assert!(matches!(
                request_withdraw_shares(&pool(), &settled_lender(), at(29 * DAY)),
                Err(LendingPoolError::LockupActive { .. })
            ));
        }

        #[test]
        fn requires_claiming_first() {
            assert_eq!(
                request_withdraw_shares(&pool(), &lender(), at(30 * DAY)),
                Err(LendingPoolError::PendingClaimOutstanding {
                    unclaimed: TokenAmount::new(12_500)
                })
            );
        }

        #[test]
        fn waitlisted_when_pool_is_short() {
            let pool = PoolSnapshot {
                pool_balance: TokenAmount::new(100_000),
                ..pool()
            };
            let err = request_withdraw_shares(&pool, &settled_lender(), at(30 * DAY)).unwrap_err();
            assert!(err.is_waitlisted());
        }

        #[test]
        fn withdraws_all_shares() {
            let withdrawal =
                request_withdraw_shares(&pool(), &settled_lender(), at(30 * DAY)).unwrap();
            assert_eq!(withdrawal.amount, TokenAmount::new(250_000));
        }

        #[test]
        fn nothing_held() {
            assert_eq!(
                request_withdraw_shares(&pool(), &LenderSnapshot::default(), at(30 * DAY)),
                Err(LendingPoolError::NoSharesHeld)
            );
        }
    }
}
