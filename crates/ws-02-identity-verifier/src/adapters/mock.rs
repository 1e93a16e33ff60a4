//! # Mock Verifier
//!
//! Deterministic stand-in for the proof system, for tests and local runs.
//! `Bound` mode accepts exactly one proof per argument tuple, so tests can
//! still observe that a proof made for one account fails for another.

use crate::domain::entities::{ProofContext, SemaphoreProof};
use crate::domain::errors::ProofError;
use crate::ports::inbound::IdentityProofVerifier;
use serde::{Deserialize, Serialize};
use shared_crypto::{keccak256, AbiWriter};
use shared_types::{Address, U256};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// How the mock decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MockMode {
    /// Every proof is valid.
    AcceptAll,
    /// Every proof is invalid.
    RejectAll,
    /// Only `MockProofVerifier::expected_proof` for the same arguments.
    #[default]
    Bound,
}

/// Mock `IdentityProofVerifier`.
#[derive(Debug, Default)]
pub struct MockProofVerifier {
    mode: MockMode,
    calls: AtomicUsize,
}

impl MockProofVerifier {
    /// Creates a mock in `mode`.
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    /// Accept-all mock.
    pub fn accepting() -> Self {
        Self::new(MockMode::AcceptAll)
    }

    /// Reject-all mock.
    pub fn rejecting() -> Self {
        Self::new(MockMode::RejectAll)
    }

    /// Argument-bound mock.
    pub fn bound() -> Self {
        Self::new(MockMode::Bound)
    }

    /// Current mode.
    pub fn mode(&self) -> MockMode {
        self.mode
    }

    /// Number of `verify` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The only proof `Bound` mode accepts for these arguments.
    pub fn expected_proof(
        root: U256,
        context: &ProofContext,
        signal: &Address,
        nullifier: U256,
    ) -> SemaphoreProof {
        let seed = AbiWriter::new()
            .word_u256(root)
            .word_u256(context.external_nullifier())
            .word_address(signal)
            .word_u256(nullifier)
            .keccak();

        let mut words = [U256::zero(); 8];
        for (i, word) in words.iter_mut().enumerate() {
            let mut preimage = seed.to_vec();
            preimage.push(i as u8);
            *word = U256::from_big_endian(&keccak256(&preimage));
        }
        SemaphoreProof(words)
    }
}

impl IdentityProofVerifier for MockProofVerifier {
    fn verify(
        &self,
        root: U256,
        context: &ProofContext,
        signal: &Address,
        nullifier: U256,
        proof: &SemaphoreProof,
    ) -> Result<(), ProofError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let accepted = match self.mode {
            MockMode::AcceptAll => true,
            MockMode::RejectAll => false,
            MockMode::Bound => *proof == Self::expected_proof(root, context, signal, nullifier),
        };
        debug!(mode = ?self.mode, accepted, %signal, "Mock proof verification");
        if accepted {
            Ok(())
        } else {
            Err(ProofError::VerificationFailed)
        }
    }
}
