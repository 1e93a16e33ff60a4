//! # WorldSocial Token Service
//!
//! Application service that owns the `TokenState` and drives every
//! operation against it.
//!
//! ## Architecture
//!
//! - Implements the inbound port (`TokenIssuanceApi`)
//! - Uses the outbound ports (`IdentityProofVerifier`, `SignatureRecovery`,
//!   `TimeSource`)
//! - Reads the clock once per operation and appends the emitted events to
//!   the log only after the domain call succeeded

use crate::domain::errors::IssuanceError;
use crate::domain::mint_authorizer::{MintAuthorizer, MintRequest};
use crate::domain::reward_distributor::RewardDistributor;
use crate::ports::inbound::TokenIssuanceApi;
use crate::ports::outbound::{SystemTimeSource, TimeSource};
use crate::state::TokenState;
use shared_crypto::{EcdsaSignature, Secp256k1Recovery, SignatureRecovery};
use shared_types::{
    Address, Classify, EventLog, RemainderPolicy, RewardCallerPolicy, Timestamp, TokenEvent, U256,
};
use tracing::{info, warn};
use ws_01_token_ledger::{PermitMessage, TokenLedger};
use ws_02_identity_verifier::IdentityProofVerifier;

/// The WorldSocial token system.
pub struct WorldSocialToken<V, T = SystemTimeSource, R = Secp256k1Recovery> {
    state: TokenState,
    authorizer: MintAuthorizer<V, R>,
    distributor: RewardDistributor,
    clock: T,
}

impl<V: IdentityProofVerifier, T: TimeSource> WorldSocialToken<V, T, Secp256k1Recovery> {
    /// Wraps `state` with the k256 signature backend.
    pub fn new(state: TokenState, verifier: V, clock: T) -> Self {
        Self::with_recovery(state, verifier, clock, Secp256k1Recovery)
    }
}

impl<V: IdentityProofVerifier, T: TimeSource, R: SignatureRecovery> WorldSocialToken<V, T, R> {
    /// Wraps `state` with an explicit signature backend.
    pub fn with_recovery(state: TokenState, verifier: V, clock: T, recovery: R) -> Self {
        Self {
            state,
            authorizer: MintAuthorizer::new(verifier, recovery),
            distributor: RewardDistributor,
            clock,
        }
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    /// The whole store.
    pub fn state(&self) -> &TokenState {
        &self.state
    }

    /// Gives the store back, e.g. for persisting.
    pub fn into_state(self) -> TokenState {
        self.state
    }

    /// The ledger.
    pub fn ledger(&self) -> &TokenLedger {
        &self.state.ledger
    }

    /// The event log.
    pub fn events(&self) -> &EventLog {
        &self.state.events
    }

    /// The identity verifier.
    pub fn verifier(&self) -> &V {
        self.authorizer.verifier()
    }

    /// The clock.
    pub fn clock(&self) -> &T {
        &self.clock
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    /// Toggles nullifier replay rejection (owner only).
    pub fn set_nullifier_enforcement(
        &mut self,
        caller: &Address,
        enforce: bool,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self
            .state
            .config
            .set_nullifier_enforcement(caller, enforce)
            .map(|e| vec![e]);
        self.settle("set_nullifier_enforcement", now, result)
    }

    /// Replaces the reward caller policy (owner only).
    pub fn set_reward_caller_policy(
        &mut self,
        caller: &Address,
        policy: RewardCallerPolicy,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self
            .state
            .config
            .set_reward_caller_policy(caller, policy)
            .map(|e| vec![e]);
        self.settle("set_reward_caller_policy", now, result)
    }

    /// Replaces the reward remainder policy (owner only).
    pub fn set_remainder_policy(
        &mut self,
        caller: &Address,
        policy: RemainderPolicy,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self
            .state
            .config
            .set_remainder_policy(caller, policy)
            .map(|e| vec![e]);
        self.settle("set_remainder_policy", now, result)
    }

    /// Hands ownership over in one step (owner only).
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self
            .state
            .config
            .transfer_ownership(caller, new_owner)
            .map(|e| vec![e]);
        self.settle("transfer_ownership", now, result)
    }

    /// Starts a two-step ownership transfer (owner only).
    pub fn propose_owner(
        &mut self,
        caller: &Address,
        candidate: Address,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self
            .state
            .config
            .propose_owner(caller, candidate)
            .map(|e| vec![e]);
        self.settle("propose_owner", now, result)
    }

    /// Completes a two-step ownership transfer (candidate only).
    pub fn accept_ownership(&mut self, caller: &Address) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self.state.config.accept_ownership(caller).map(|e| vec![e]);
        self.settle("accept_ownership", now, result)
    }

    // =========================================================================
    // LEDGER
    // =========================================================================

    /// Moves `amount` from `from` to `to`.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self
            .state
            .ledger
            .transfer(from, to, amount)
            .map(|e| vec![e])
            .map_err(IssuanceError::from);
        self.settle("transfer", now, result)
    }

    /// Sets `spender`'s allowance over `owner`.
    pub fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self
            .state
            .ledger
            .approve(owner, spender, value)
            .map(|e| vec![e])
            .map_err(IssuanceError::from);
        self.settle("approve", now, result)
    }

    /// Spends `spender`'s allowance to move `amount` from `from` to `to`.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self
            .state
            .ledger
            .transfer_from(spender, from, to, amount)
            .map(|e| vec![e])
            .map_err(IssuanceError::from);
        self.settle("transfer_from", now, result)
    }

    /// Redeems an offline-signed approval against the current clock.
    pub fn permit(
        &mut self,
        message: &PermitMessage,
        signature: &EcdsaSignature,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self
            .state
            .ledger
            .permit(self.authorizer.recovery(), message, signature, now)
            .map(|e| vec![e])
            .map_err(IssuanceError::from);
        self.settle("permit", now, result)
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    /// Logs the outcome and, on success, commits the events.
    fn settle(
        &mut self,
        op: &'static str,
        now: Timestamp,
        result: Result<Vec<TokenEvent>, IssuanceError>,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        match result {
            Ok(events) => {
                self.state.observed_time = self.state.observed_time.max(now);
                self.state.events.append(now, events.iter().cloned());
                info!(op, now, events = events.len(), "Operation committed");
                Ok(events)
            }
            Err(err) => {
                warn!(
                    op,
                    kind = %err.kind(),
                    reason = err.reason_code(),
                    error = %err,
                    "Operation rejected"
                );
                Err(err)
            }
        }
    }
}

impl<V: IdentityProofVerifier, T: TimeSource, R: SignatureRecovery> TokenIssuanceApi
    for WorldSocialToken<V, T, R>
{
    fn request_mint(&mut self, request: &MintRequest) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self.authorizer.request_mint(
            &self.state.config,
            &mut self.state.registry,
            &mut self.state.ledger,
            request,
            now,
        );
        self.settle("request_mint", now, result)
    }

    fn reward_creator(
        &mut self,
        caller: &Address,
        account: Address,
        amount: U256,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self.distributor.reward_creator(
            &self.state.config,
            &mut self.state.rewards,
            &mut self.state.ledger,
            caller,
            account,
            amount,
        );
        self.settle("reward_creator", now, result)
    }

    fn reward_viewer(
        &mut self,
        caller: &Address,
        account: Address,
        amount: U256,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self.distributor.reward_viewer(
            &self.state.config,
            &mut self.state.rewards,
            &mut self.state.ledger,
            caller,
            account,
            amount,
        );
        self.settle("reward_viewer", now, result)
    }

    fn register_creator(
        &mut self,
        caller: &Address,
        account: Address,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self
            .state
            .config
            .register_creator(caller, account)
            .map(|e| e.into_iter().collect());
        self.settle("register_creator", now, result)
    }

    fn set_attester(
        &mut self,
        caller: &Address,
        new: Address,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self.state.config.set_attester(caller, new).map(|e| vec![e]);
        self.settle("set_attester", now, result)
    }

    fn set_amount_per_mint(
        &mut self,
        caller: &Address,
        new: U256,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self
            .state
            .config
            .set_amount_per_mint(caller, new)
            .map(|e| vec![e]);
        self.settle("set_amount_per_mint", now, result)
    }

    fn set_wait_between_mints(
        &mut self,
        caller: &Address,
        new: u64,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        let now = self.clock.now();
        let result = self
            .state
            .config
            .set_wait_between_mints(caller, new)
            .map(|e| vec![e]);
        self.settle("set_wait_between_mints", now, result)
    }

    fn balance_of(&self, account: &Address) -> U256 {
        self.state.ledger.balance_of(account)
    }

    fn last_mint(&self, account: &Address) -> Option<Timestamp> {
        self.state.registry.last_mint(account)
    }

    fn creator_rewards(&self, account: &Address) -> U256 {
        self.state.rewards.creator_rewards(account)
    }

    fn viewer_rewards(&self, account: &Address) -> U256 {
        self.state.rewards.viewer_rewards(account)
    }
}
