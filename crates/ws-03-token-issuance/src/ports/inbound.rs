//! # Inbound Ports
//!
//! The issuance operations external callers drive.

use crate::domain::errors::IssuanceError;
use crate::domain::mint_authorizer::MintRequest;
use shared_types::{Address, Timestamp, TokenEvent, U256};

/// Minting, rewards and the owner-gated mint parameters.
///
/// Every mutating call is all-or-nothing and returns the events it
/// appended to the log.
pub trait TokenIssuanceApi {
    /// Proof-gated mint of the configured amount.
    fn request_mint(&mut self, request: &MintRequest) -> Result<Vec<TokenEvent>, IssuanceError>;

    /// Credits 70% of `amount` to a registered creator.
    fn reward_creator(
        &mut self,
        caller: &Address,
        account: Address,
        amount: U256,
    ) -> Result<Vec<TokenEvent>, IssuanceError>;

    /// Credits 30% of `amount` to a viewer.
    fn reward_viewer(
        &mut self,
        caller: &Address,
        account: Address,
        amount: U256,
    ) -> Result<Vec<TokenEvent>, IssuanceError>;

    /// Flags `account` as a creator (owner only, idempotent).
    fn register_creator(
        &mut self,
        caller: &Address,
        account: Address,
    ) -> Result<Vec<TokenEvent>, IssuanceError>;

    /// Rotates the attester (owner only).
    fn set_attester(
        &mut self,
        caller: &Address,
        new: Address,
    ) -> Result<Vec<TokenEvent>, IssuanceError>;

    /// Changes the per-mint amount (owner only).
    fn set_amount_per_mint(
        &mut self,
        caller: &Address,
        new: U256,
    ) -> Result<Vec<TokenEvent>, IssuanceError>;

    /// Changes the cooldown (owner only).
    fn set_wait_between_mints(
        &mut self,
        caller: &Address,
        new: u64,
    ) -> Result<Vec<TokenEvent>, IssuanceError>;

    /// Ledger balance of `account`.
    fn balance_of(&self, account: &Address) -> U256;

    /// Time of the last successful mint of `account`.
    fn last_mint(&self, account: &Address) -> Option<Timestamp>;

    /// Cumulative creator rewards of `account`.
    fn creator_rewards(&self, account: &Address) -> U256;

    /// Cumulative viewer rewards of `account`.
    fn viewer_rewards(&self, account: &Address) -> U256;
}
