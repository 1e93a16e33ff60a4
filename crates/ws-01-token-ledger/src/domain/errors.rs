//! # Ledger Errors

use super::entities::MinterRole;
use shared_crypto::SignatureError;
use shared_types::{Address, Classify, ErrorKind, U256};
use thiserror::Error;

/// Errors raised by ledger operations. A returned error means the ledger
/// was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The zero address was used as owner, spender, sender or recipient.
    #[error("Zero address not allowed as {role}")]
    ZeroAddress {
        /// Which participant was zero.
        role: &'static str,
    },

    /// Debit larger than the account balance.
    #[error("Insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        /// Debited account.
        account: Address,
        /// Amount requested.
        required: U256,
        /// Current balance.
        available: U256,
    },

    /// `transfer_from` larger than the remaining allowance.
    #[error("Insufficient allowance: required {required}, available {available}")]
    InsufficientAllowance {
        /// Amount requested.
        required: U256,
        /// Remaining allowance.
        available: U256,
    },

    /// Caller does not hold a minter role.
    #[error("Unauthorized minter: {0}")]
    UnauthorizedMinter(MinterRole),

    /// Crediting would overflow the supply or a balance.
    #[error("Supply overflow")]
    SupplyOverflow,

    /// Permit redeemed after its deadline.
    #[error("Permit expired: deadline {deadline}, now {now}")]
    ExpiredApproval {
        /// Permit deadline.
        deadline: U256,
        /// Clock reading at redemption.
        now: u64,
    },

    /// Permit nonce does not match the owner's counter.
    #[error("Stale permit nonce: expected {expected}, got {actual}")]
    StaleNonce {
        /// Owner's current counter.
        expected: U256,
        /// Nonce carried by the permit.
        actual: U256,
    },

    /// Permit signature malformed or not made by the owner.
    #[error("Invalid permit signature: {0}")]
    InvalidSignature(String),
}

impl From<SignatureError> for LedgerError {
    fn from(err: SignatureError) -> Self {
        LedgerError::InvalidSignature(err.to_string())
    }
}

impl Classify for LedgerError {
    fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::ZeroAddress { .. }
            | LedgerError::InsufficientBalance { .. }
            | LedgerError::SupplyOverflow => ErrorKind::Validation,
            LedgerError::InsufficientAllowance { .. }
            | LedgerError::UnauthorizedMinter(_)
            | LedgerError::InvalidSignature(_) => ErrorKind::Authorization,
            LedgerError::ExpiredApproval { .. } | LedgerError::StaleNonce { .. } => ErrorKind::Replay,
        }
    }

    fn reason_code(&self) -> &'static str {
        match self {
            LedgerError::ZeroAddress { .. } => "ZERO_ADDRESS",
            LedgerError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            LedgerError::InsufficientAllowance { .. } => "INSUFFICIENT_ALLOWANCE",
            LedgerError::UnauthorizedMinter(_) => "UNAUTHORIZED_MINTER",
            LedgerError::SupplyOverflow => "SUPPLY_OVERFLOW",
            LedgerError::ExpiredApproval { .. } => "EXPIRED_APPROVAL",
            LedgerError::StaleNonce { .. } => "STALE_NONCE",
            LedgerError::InvalidSignature(_) => "INVALID_SIGNATURE",
        }
    }
}
