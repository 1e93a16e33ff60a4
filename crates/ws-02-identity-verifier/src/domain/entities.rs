//! # Domain Entities

use super::hashing::external_nullifier;
use serde::{Deserialize, Serialize};
use shared_types::U256;

/// Application/action pair that scopes a proof to this deployment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofContext {
    /// Application identifier, e.g. `app_staging_...`.
    pub app_id: String,
    /// Action identifier within the application.
    pub action: String,
}

impl ProofContext {
    /// Creates a context.
    pub fn new(app_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            action: action.into(),
        }
    }

    /// External nullifier public input for this context.
    pub fn external_nullifier(&self) -> U256 {
        external_nullifier(&self.app_id, &self.action)
    }
}

/// Eight-word Groth16 proof blob in Solidity calldata order:
/// `[A.x, A.y, B.x.c1, B.x.c0, B.y.c1, B.y.c0, C.x, C.y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemaphoreProof(pub [U256; 8]);

impl SemaphoreProof {
    /// Number of words in a proof.
    pub const WORDS: usize = 8;

    /// Builds a proof from exactly eight words.
    pub fn from_words(words: &[U256]) -> Option<Self> {
        let words: [U256; 8] = words.try_into().ok()?;
        Some(Self(words))
    }

    /// Proof words.
    pub fn words(&self) -> &[U256; 8] {
        &self.0
    }
}
