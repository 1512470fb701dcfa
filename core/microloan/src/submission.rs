use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ledger-side failure of a submitted request, classified only as far as
/// telling a payer's own rejection apart from everything else.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "reason", rename_all = "snake_case")]
pub enum SubmissionFailed {
    #[error("SubmissionFailed - UserRejected: {0}")]
    UserRejected(String),
    #[error("SubmissionFailed - Other: {0}")]
    Other(String),
}

impl SubmissionFailed {
    /// Case-insensitive substring match of `reason` against `markers`.
    pub fn classify(reason: impl Into<String>, markers: &[impl AsRef<str>]) -> Self {
        let reason = reason.into();
        let lowered = reason.to_lowercase();
        let rejected = markers.iter().any(|marker| {
            let marker = marker.as_ref().trim().to_lowercase();
            !marker.is_empty() && lowered.contains(&marker)
        });
        if rejected {
            Self::UserRejected(reason)
        } else {
            Self::Other(reason)
        }
    }

    pub fn is_user_rejected(&self) -> bool {
        matches!(self, Self::UserRejected(_))
    }

    /// Nothing was mutated before the failure, so a retry is always safe once
    /// the request has been re-validated against a fresh snapshot.
    pub fn is_retryable(&self) -> bool {
        true
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::UserRejected(reason) | Self::Other(reason) => reason,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const MARKERS: [&str; 2] = ["cancelled transaction", "rejected the request"];

    #[test]
    fn recognizes_wallet_rejections() {
        let failed = SubmissionFailed::classify(
            "User Rejected The Request. Details: denied by wallet",
            &MARKERS,
        );
        assert!(failed.is_user_rejected());
        assert!(failed.is_retryable());
        assert_eq!(
            failed.reason(),
            "User Rejected The Request. Details: denied by wallet"
        );
    }

    #[test]
    fn anything_else_is_other() {
        let failed = SubmissionFailed::classify("execution reverted: pool paused", &MARKERS);
        assert_eq!(
            failed,
            SubmissionFailed::Other("execution reverted: pool paused".to_string())
        );
    }

    #[test]
    fn blank_markers_never_match() {
        let failed = SubmissionFailed::classify("nonce too low", &[" "]);
        assert!(!failed.is_user_rejected());
    }
}
