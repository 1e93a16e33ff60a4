//! # Inbound Ports

use crate::domain::entities::{ProofContext, SemaphoreProof};
use crate::domain::errors::ProofError;
use shared_types::{Address, U256};

/// Validates a uniqueness proof. Implementations are read-only.
pub trait IdentityProofVerifier: Send + Sync {
    /// `Ok(())` iff `proof` shows membership under `root` for `context`,
    /// bound to `signal` and producing `nullifier`.
    fn verify(
        &self,
        root: U256,
        context: &ProofContext,
        signal: &Address,
        nullifier: U256,
        proof: &SemaphoreProof,
    ) -> Result<(), ProofError>;
}

impl<T: IdentityProofVerifier + ?Sized> IdentityProofVerifier for Box<T> {
    fn verify(
        &self,
        root: U256,
        context: &ProofContext,
        signal: &Address,
        nullifier: U256,
        proof: &SemaphoreProof,
    ) -> Result<(), ProofError> {
        (**self).verify(root, context, signal, nullifier, proof)
    }
}

impl<T: IdentityProofVerifier + ?Sized> IdentityProofVerifier for std::sync::Arc<T> {
    fn verify(
        &self,
        root: U256,
        context: &ProofContext,
        signal: &Address,
        nullifier: U256,
        proof: &SemaphoreProof,
    ) -> Result<(), ProofError> {
        (**self).verify(root, context, signal, nullifier, proof)
    }
}
