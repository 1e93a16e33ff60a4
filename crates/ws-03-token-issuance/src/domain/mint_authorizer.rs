//! # Mint Authorizer
//!
//! Proof-gated minting for verified humans.
//!
//! All four checks run before the first write. The only fallible write is
//! the ledger credit, and it happens before the registry is touched, so a
//! rejected request leaves balances, cooldowns and nullifiers unchanged.

use super::admin_config::AdminConfig;
use super::attestation::attestation_digest;
use super::errors::IssuanceError;
use serde::{Deserialize, Serialize};
use shared_crypto::{EcdsaSignature, SignatureRecovery};
use shared_types::{Address, Timestamp, TokenEvent, U256};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};
use ws_01_token_ledger::{MinterRole, PrivilegedMint};
use ws_02_identity_verifier::{IdentityProofVerifier, SemaphoreProof};

/// Everything a caller submits to mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRequest {
    /// Account to credit; also the proof's signal.
    pub account: Address,
    /// Identity root the proof was made against.
    pub root: U256,
    /// Proof nullifier.
    pub nullifier: U256,
    /// Groth16 proof blob.
    pub proof: SemaphoreProof,
    /// Attester signature over `(account, nullifier)`.
    pub signature: EcdsaSignature,
}

/// Per-account cooldowns and consumed nullifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRegistry {
    last_mint: BTreeMap<Address, Timestamp>,
    nullifiers: BTreeSet<U256>,
}

impl MintRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the last successful mint of `account`.
    pub fn last_mint(&self, account: &Address) -> Option<Timestamp> {
        self.last_mint.get(account).copied()
    }

    /// Whether `nullifier` was used by a successful mint.
    pub fn is_consumed(&self, nullifier: &U256) -> bool {
        self.nullifiers.contains(nullifier)
    }

    /// Number of consumed nullifiers.
    pub fn consumed_count(&self) -> usize {
        self.nullifiers.len()
    }

    /// Seconds until `account` may mint again; zero if it may mint now.
    /// An account that never minted has no cooldown.
    pub fn cooldown_remaining(&self, account: &Address, wait: u64, now: Timestamp) -> u64 {
        match self.last_mint(account) {
            Some(last) => wait.saturating_sub(now.saturating_sub(last)),
            None => 0,
        }
    }

    fn record(&mut self, account: Address, nullifier: U256, now: Timestamp) {
        self.last_mint.insert(account, now);
        self.nullifiers.insert(nullifier);
    }
}

/// Runs the mint checks against an identity verifier and signature
/// recovery backend.
pub struct MintAuthorizer<V, R> {
    verifier: V,
    recovery: R,
}

impl<V: IdentityProofVerifier, R: SignatureRecovery> MintAuthorizer<V, R> {
    /// Creates an authorizer.
    pub fn new(verifier: V, recovery: R) -> Self {
        Self { verifier, recovery }
    }

    /// The identity verifier.
    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    /// The signature recovery backend.
    pub fn recovery(&self) -> &R {
        &self.recovery
    }

    /// Checks `request` and, if every check passes, mints
    /// `config.amount_per_mint()` to the account.
    ///
    /// Returns the ledger `Transfer` followed by `Minted`.
    pub fn request_mint(
        &self,
        config: &AdminConfig,
        registry: &mut MintRegistry,
        ledger: &mut dyn PrivilegedMint,
        request: &MintRequest,
        now: Timestamp,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let account = request.account;
        if account.is_zero() {
            return Err(IssuanceError::ZeroAddress { field: "account" });
        }

        // 1. Attestation
        let digest = attestation_digest(&account, request.nullifier);
        let signer = self
            .recovery
            .recover(&digest, &request.signature)
            .map_err(|e| IssuanceError::InvalidSignature(e.to_string()))?;
        if signer != config.attester() {
            warn!(%account, %signer, attester = %config.attester(), "Attestation from wrong signer");
            return Err(IssuanceError::InvalidSignature(format!(
                "signed by {signer}, expected attester {}",
                config.attester()
            )));
        }

        // 2. Replay
        if config.enforce_unique_nullifiers() && registry.is_consumed(&request.nullifier) {
            warn!(%account, nullifier = %request.nullifier, "Nullifier replay");
            return Err(IssuanceError::ProofReplayed {
                nullifier: request.nullifier,
            });
        }

        // 3. Identity proof
        self.verifier
            .verify(
                request.root,
                config.proof_context(),
                &account,
                request.nullifier,
                &request.proof,
            )
            .map_err(|e| {
                warn!(%account, error = %e, "Identity proof rejected");
                IssuanceError::InvalidProof(e)
            })?;

        // 4. Cooldown
        let remaining = registry.cooldown_remaining(&account, config.wait_between_mints(), now);
        if remaining > 0 {
            warn!(%account, remaining, "Mint cooldown not elapsed");
            return Err(IssuanceError::CooldownNotElapsed { account, remaining });
        }
        debug!(%account, "Mint checks passed");

        let amount = config.amount_per_mint();
        let transfer = ledger.mint(MinterRole::MintAuthorizer, account, amount)?;
        registry.record(account, request.nullifier, now);

        info!(%account, %amount, now, "Minted");
        Ok(vec![transfer, TokenEvent::Minted { account, amount }])
    }
}
