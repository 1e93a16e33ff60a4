//! # Admin Config
//!
//! Single-owner parameters. Every setter checks the caller against the
//! stored owner before anything else, then validates, then overwrites the
//! field and returns the change event.

use super::errors::IssuanceError;
use serde::{Deserialize, Serialize};
use shared_types::{Address, RemainderPolicy, RewardCallerPolicy, TokenEvent, U256};
use std::collections::BTreeSet;
use tracing::{info, warn};
use ws_02_identity_verifier::ProofContext;

/// Owner-controlled configuration plus the creator registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    owner: Address,
    pending_owner: Option<Address>,
    attester: Address,
    amount_per_mint: U256,
    wait_between_mints: u64,
    proof_context: ProofContext,
    enforce_unique_nullifiers: bool,
    reward_callers: RewardCallerPolicy,
    remainder: RemainderPolicy,
    creators: BTreeSet<Address>,
}

impl AdminConfig {
    /// Creates the configuration. Nullifier enforcement starts enabled and
    /// rewards start owner-only with the remainder not issued.
    pub fn new(
        owner: Address,
        attester: Address,
        amount_per_mint: U256,
        wait_between_mints: u64,
        proof_context: ProofContext,
    ) -> Result<Self, IssuanceError> {
        require_address(&owner, "owner")?;
        require_address(&attester, "attester")?;
        require_amount(amount_per_mint, "amount_per_mint")?;
        Ok(Self {
            owner,
            pending_owner: None,
            attester,
            amount_per_mint,
            wait_between_mints,
            proof_context,
            enforce_unique_nullifiers: true,
            reward_callers: RewardCallerPolicy::default(),
            remainder: RemainderPolicy::default(),
            creators: BTreeSet::new(),
        })
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Candidate of an in-progress two-step ownership transfer.
    pub fn pending_owner(&self) -> Option<Address> {
        self.pending_owner
    }

    /// Address whose signatures authorize mints.
    pub fn attester(&self) -> Address {
        self.attester
    }

    /// Tokens (base units) per successful mint.
    pub fn amount_per_mint(&self) -> U256 {
        self.amount_per_mint
    }

    /// Cooldown between mints of one account, in seconds.
    pub fn wait_between_mints(&self) -> u64 {
        self.wait_between_mints
    }

    /// App/action pair proofs must be scoped to.
    pub fn proof_context(&self) -> &ProofContext {
        &self.proof_context
    }

    /// Whether a consumed nullifier blocks later mints.
    pub fn enforce_unique_nullifiers(&self) -> bool {
        self.enforce_unique_nullifiers
    }

    /// Who may distribute rewards.
    pub fn reward_callers(&self) -> &RewardCallerPolicy {
        &self.reward_callers
    }

    /// Where the undistributed part of a reward goes.
    pub fn remainder(&self) -> RemainderPolicy {
        self.remainder
    }

    /// Whether `account` is a registered creator.
    pub fn is_creator(&self, account: &Address) -> bool {
        self.creators.contains(account)
    }

    /// Registered creators in address order.
    pub fn creators(&self) -> impl Iterator<Item = &Address> {
        self.creators.iter()
    }

    /// Fails with `Unauthorized` unless `caller` is the owner.
    pub fn ensure_owner(&self, caller: &Address) -> Result<(), IssuanceError> {
        if *caller == self.owner {
            Ok(())
        } else {
            warn!(%caller, owner = %self.owner, "Owner-only operation rejected");
            Err(IssuanceError::Unauthorized { caller: *caller })
        }
    }

    /// Fails with `Unauthorized` unless `caller` may distribute rewards.
    pub fn ensure_reward_caller(&self, caller: &Address) -> Result<(), IssuanceError> {
        if self.reward_callers.permits(caller, &self.owner) {
            Ok(())
        } else {
            warn!(%caller, policy = %self.reward_callers, "Reward caller rejected");
            Err(IssuanceError::Unauthorized { caller: *caller })
        }
    }

    // =========================================================================
    // OWNER-GATED SETTERS
    // =========================================================================

    /// Rotates the attestation signer.
    pub fn set_attester(
        &mut self,
        caller: &Address,
        new: Address,
    ) -> Result<TokenEvent, IssuanceError> {
        self.ensure_owner(caller)?;
        require_address(&new, "attester")?;
        let old = std::mem::replace(&mut self.attester, new);
        info!(%old, %new, "Attester updated");
        Ok(TokenEvent::AttesterUpdated { old, new })
    }

    /// Changes the per-mint amount.
    pub fn set_amount_per_mint(
        &mut self,
        caller: &Address,
        new: U256,
    ) -> Result<TokenEvent, IssuanceError> {
        self.ensure_owner(caller)?;
        require_amount(new, "amount_per_mint")?;
        let old = std::mem::replace(&mut self.amount_per_mint, new);
        info!(%old, %new, "Amount per mint updated");
        Ok(TokenEvent::AmountPerMintUpdated { old, new })
    }

    /// Changes the cooldown. Zero disables it.
    pub fn set_wait_between_mints(
        &mut self,
        caller: &Address,
        new: u64,
    ) -> Result<TokenEvent, IssuanceError> {
        self.ensure_owner(caller)?;
        let old = std::mem::replace(&mut self.wait_between_mints, new);
        info!(old, new, "Wait between mints updated");
        Ok(TokenEvent::WaitBetweenMintsUpdated { old, new })
    }

    /// Turns nullifier replay rejection on or off.
    pub fn set_nullifier_enforcement(
        &mut self,
        caller: &Address,
        new: bool,
    ) -> Result<TokenEvent, IssuanceError> {
        self.ensure_owner(caller)?;
        let old = std::mem::replace(&mut self.enforce_unique_nullifiers, new);
        info!(old, new, "Nullifier enforcement updated");
        Ok(TokenEvent::NullifierEnforcementUpdated { old, new })
    }

    /// Replaces the reward caller policy.
    pub fn set_reward_caller_policy(
        &mut self,
        caller: &Address,
        new: RewardCallerPolicy,
    ) -> Result<TokenEvent, IssuanceError> {
        self.ensure_owner(caller)?;
        if let RewardCallerPolicy::Allowlist(list) = &new {
            if list.iter().any(Address::is_zero) {
                return Err(IssuanceError::ZeroAddress {
                    field: "reward caller",
                });
            }
        }
        let old = std::mem::replace(&mut self.reward_callers, new.clone());
        info!(%old, %new, "Reward caller policy updated");
        Ok(TokenEvent::RewardCallerPolicyUpdated { old, new })
    }

    /// Replaces the remainder policy.
    pub fn set_remainder_policy(
        &mut self,
        caller: &Address,
        new: RemainderPolicy,
    ) -> Result<TokenEvent, IssuanceError> {
        self.ensure_owner(caller)?;
        if let RemainderPolicy::Treasury(treasury) = &new {
            require_address(treasury, "treasury")?;
        }
        let old = std::mem::replace(&mut self.remainder, new);
        info!(%old, %new, "Remainder policy updated");
        Ok(TokenEvent::RemainderPolicyUpdated { old, new })
    }

    /// Flags `account` as a creator. Returns `None` if it already was one.
    pub fn register_creator(
        &mut self,
        caller: &Address,
        account: Address,
    ) -> Result<Option<TokenEvent>, IssuanceError> {
        self.ensure_owner(caller)?;
        require_address(&account, "creator")?;
        if self.creators.insert(account) {
            info!(%account, "Creator registered");
            Ok(Some(TokenEvent::CreatorRegistered { account }))
        } else {
            Ok(None)
        }
    }

    // =========================================================================
    // OWNERSHIP
    // =========================================================================

    /// Hands ownership to `new_owner` in one step.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<TokenEvent, IssuanceError> {
        self.ensure_owner(caller)?;
        require_address(&new_owner, "owner")?;
        let previous = std::mem::replace(&mut self.owner, new_owner);
        self.pending_owner = None;
        info!(%previous, new = %new_owner, "Ownership transferred");
        Ok(TokenEvent::OwnershipTransferred {
            previous,
            new: new_owner,
        })
    }

    /// Starts a two-step transfer; `candidate` must call `accept_ownership`.
    pub fn propose_owner(
        &mut self,
        caller: &Address,
        candidate: Address,
    ) -> Result<TokenEvent, IssuanceError> {
        self.ensure_owner(caller)?;
        require_address(&candidate, "owner")?;
        self.pending_owner = Some(candidate);
        info!(owner = %self.owner, %candidate, "Ownership transfer started");
        Ok(TokenEvent::OwnershipTransferStarted {
            owner: self.owner,
            candidate,
        })
    }

    /// Completes a two-step transfer. Only the pending candidate may call.
    pub fn accept_ownership(&mut self, caller: &Address) -> Result<TokenEvent, IssuanceError> {
        if self.pending_owner != Some(*caller) {
            warn!(%caller, "Ownership acceptance by non-candidate");
            return Err(IssuanceError::Unauthorized { caller: *caller });
        }
        self.pending_owner = None;
        let previous = std::mem::replace(&mut self.owner, *caller);
        info!(%previous, new = %caller, "Ownership transferred");
        Ok(TokenEvent::OwnershipTransferred {
            previous,
            new: *caller,
        })
    }
}

fn require_address(address: &Address, field: &'static str) -> Result<(), IssuanceError> {
    if address.is_zero() {
        Err(IssuanceError::ZeroAddress { field })
    } else {
        Ok(())
    }
}

fn require_amount(amount: U256, field: &'static str) -> Result<(), IssuanceError> {
    if amount.is_zero() {
        Err(IssuanceError::ZeroAmount { field })
    } else {
        Ok(())
    }
}
