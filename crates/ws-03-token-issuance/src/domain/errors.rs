//! # Issuance Errors

use shared_types::{Address, Classify, ErrorKind, U256};
use thiserror::Error;
use ws_01_token_ledger::LedgerError;
use ws_02_identity_verifier::ProofError;

/// Errors from minting, rewards and administration.
///
/// Each maps onto an `ErrorKind` and a stable `reason_code()` so automated
/// clients can tell "wait longer" apart from "fix the signature".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssuanceError {
    /// Attestation not produced by the configured attester.
    #[error("Invalid attestation signature: {0}")]
    InvalidSignature(String),

    /// Nullifier already consumed by an earlier mint.
    #[error("Proof replayed: nullifier {nullifier:#x} already used")]
    ProofReplayed {
        /// The reused nullifier.
        nullifier: U256,
    },

    /// Identity proof rejected.
    #[error("Invalid identity proof: {0}")]
    InvalidProof(#[from] ProofError),

    /// The account minted too recently.
    #[error("Cooldown not elapsed for {account}: {remaining}s remaining")]
    CooldownNotElapsed {
        /// Requesting account.
        account: Address,
        /// Seconds until the next mint is allowed.
        remaining: u64,
    },

    /// Caller lacks the required capability.
    #[error("Unauthorized caller {caller}")]
    Unauthorized {
        /// Who tried.
        caller: Address,
    },

    /// Creator payout to an unregistered account.
    #[error("Account {account} is not a registered creator")]
    NotRegisteredCreator {
        /// The unregistered account.
        account: Address,
    },

    /// Zero address where one is required.
    #[error("Zero address not allowed for {field}")]
    ZeroAddress {
        /// Offending parameter.
        field: &'static str,
    },

    /// Zero amount where a positive one is required.
    #[error("Zero amount not allowed for {field}")]
    ZeroAmount {
        /// Offending parameter.
        field: &'static str,
    },

    /// Ledger refused the credit.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl Classify for IssuanceError {
    fn kind(&self) -> ErrorKind {
        match self {
            IssuanceError::InvalidSignature(_)
            | IssuanceError::InvalidProof(_)
            | IssuanceError::Unauthorized { .. }
            | IssuanceError::NotRegisteredCreator { .. } => ErrorKind::Authorization,
            IssuanceError::CooldownNotElapsed { .. } => ErrorKind::RateLimit,
            IssuanceError::ProofReplayed { .. } => ErrorKind::Replay,
            IssuanceError::ZeroAddress { .. } | IssuanceError::ZeroAmount { .. } => {
                ErrorKind::Validation
            }
            IssuanceError::Ledger(err) => err.kind(),
        }
    }

    fn reason_code(&self) -> &'static str {
        match self {
            IssuanceError::InvalidSignature(_) => "INVALID_SIGNATURE",
            IssuanceError::ProofReplayed { .. } => "PROOF_REPLAYED",
            IssuanceError::InvalidProof(_) => "INVALID_PROOF",
            IssuanceError::CooldownNotElapsed { .. } => "COOLDOWN_NOT_ELAPSED",
            IssuanceError::Unauthorized { .. } => "UNAUTHORIZED",
            IssuanceError::NotRegisteredCreator { .. } => "NOT_REGISTERED_CREATOR",
            IssuanceError::ZeroAddress { .. } => "ZERO_ADDRESS",
            IssuanceError::ZeroAmount { .. } => "ZERO_AMOUNT",
            IssuanceError::Ledger(err) => err.reason_code(),
        }
    }
}
