use thiserror::Error;

use crate::primitives::{Timestamp, TokenAmount};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LendingPoolError {
    #[error("LendingPoolError - ExistingDepositPresent: {current_shares} shares held")]
    ExistingDepositPresent { current_shares: TokenAmount },
    #[error("LendingPoolError - ZeroDeposit")]
    ZeroDeposit,
    #[error("LendingPoolError - InsufficientFunds: required {required}, available {available}")]
    InsufficientFunds {
        required: TokenAmount,
        available: TokenAmount,
    },
    #[error(
        "LendingPoolError - ClaimNotYetAllowed: {elapsed}s of {required}s elapsed, allowed from {allowed_at}"
    )]
    ClaimNotYetAllowed {
        elapsed: i64,
        required: u64,
        allowed_at: Timestamp,
    },
    #[error("LendingPoolError - NothingToClaim: entitled {entitlement}, claimed {claimed}")]
    NothingToClaim {
        entitlement: TokenAmount,
        claimed: TokenAmount,
    },
    #[error(
        "LendingPoolError - LockupActive: {elapsed}s of {required}s elapsed, unlocked from {unlocked_at}"
    )]
    LockupActive {
        elapsed: i64,
        required: u64,
        unlocked_at: Timestamp,
    },
    #[error("LendingPoolError - NoSharesHeld")]
    NoSharesHeld,
    #[error("LendingPoolError - PendingClaimOutstanding: {unclaimed} unclaimed")]
    PendingClaimOutstanding { unclaimed: TokenAmount },
    #[error(
        "LendingPoolError - InsufficientPoolLiquidity: requested {requested}, available {available}"
    )]
    InsufficientPoolLiquidity {
        requested: TokenAmount,
        available: TokenAmount,
    },
    #[error("LendingPoolError - MoneyError: {0}")]
    MoneyError(#[from] core_money::MoneyError),
}

impl LendingPoolError {
    /// The withdrawal is queued by the pool rather than refused.
    pub fn is_waitlisted(&self) -> bool {
        matches!(self, Self::InsufficientPoolLiquidity { .. })
    }
}
