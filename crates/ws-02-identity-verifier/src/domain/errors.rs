//! # Proof Errors

use shared_types::{Classify, ErrorKind, U256};
use thiserror::Error;

/// Why a proof was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// The proof is well-formed but does not verify.
    #[error("Proof verification failed")]
    VerificationFailed,

    /// A proof word is not a valid curve point or field element.
    #[error("Malformed proof: {0}")]
    MalformedProof(String),

    /// A public input is not below the scalar field modulus.
    #[error("Public input {name} is out of field range")]
    InputOutOfField {
        /// Which input.
        name: &'static str,
    },

    /// The root is not in the accepted set.
    #[error("Unknown identity root {0:#x}")]
    UnknownRoot(U256),

    /// The verifying key could not be loaded.
    #[error("Invalid verifying key: {0}")]
    InvalidVerifyingKey(String),
}

impl Classify for ProofError {
    fn kind(&self) -> ErrorKind {
        match self {
            ProofError::InvalidVerifyingKey(_) => ErrorKind::Validation,
            _ => ErrorKind::Authorization,
        }
    }

    fn reason_code(&self) -> &'static str {
        match self {
            ProofError::VerificationFailed => "PROOF_VERIFICATION_FAILED",
            ProofError::MalformedProof(_) => "MALFORMED_PROOF",
            ProofError::InputOutOfField { .. } => "INPUT_OUT_OF_FIELD",
            ProofError::UnknownRoot(_) => "UNKNOWN_ROOT",
            ProofError::InvalidVerifyingKey(_) => "INVALID_VERIFYING_KEY",
        }
    }
}
