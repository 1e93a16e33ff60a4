//! # Reward Distributor
//!
//! Splits a reward amount into a 70% creator share and a 30% viewer share.
//! Shares are computed from the literal input amount, never from a running
//! balance, and `creator_share(x) + viewer_share(x) <= x` always holds.

use super::admin_config::AdminConfig;
use super::errors::IssuanceError;
use serde::{Deserialize, Serialize};
use shared_types::units::proportion;
use shared_types::{Address, RemainderPolicy, TokenEvent, U256};
use std::collections::BTreeMap;
use tracing::{info, warn};
use ws_01_token_ledger::{LedgerError, MinterRole, PrivilegedMint};

/// Creator percentage of a reward.
pub const CREATOR_SHARE_PERCENT: u64 = 70;

/// Viewer percentage of a reward.
pub const VIEWER_SHARE_PERCENT: u64 = 30;

/// `floor(amount * 70 / 100)`
pub fn creator_share(amount: U256) -> U256 {
    proportion(amount, CREATOR_SHARE_PERCENT, 100)
}

/// `floor(amount * 30 / 100)`
pub fn viewer_share(amount: U256) -> U256 {
    proportion(amount, VIEWER_SHARE_PERCENT, 100)
}

/// Cumulative rewards per account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardPool {
    creator_rewards: BTreeMap<Address, U256>,
    viewer_rewards: BTreeMap<Address, U256>,
}

impl RewardPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total creator rewards credited to `account`.
    pub fn creator_rewards(&self, account: &Address) -> U256 {
        self.creator_rewards.get(account).copied().unwrap_or_default()
    }

    /// Total viewer rewards credited to `account`.
    pub fn viewer_rewards(&self, account: &Address) -> U256 {
        self.viewer_rewards.get(account).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Audience {
    Creator,
    Viewer,
}

/// Stateless distributor; state lives in the `RewardPool` and ledger it is
/// handed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RewardDistributor;

impl RewardDistributor {
    /// Credits the creator share of `amount` to a registered creator.
    pub fn reward_creator(
        &self,
        config: &AdminConfig,
        pool: &mut RewardPool,
        ledger: &mut dyn PrivilegedMint,
        caller: &Address,
        account: Address,
        amount: U256,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        self.distribute(config, pool, ledger, caller, account, amount, Audience::Creator)
    }

    /// Credits the viewer share of `amount`. No registration is required.
    pub fn reward_viewer(
        &self,
        config: &AdminConfig,
        pool: &mut RewardPool,
        ledger: &mut dyn PrivilegedMint,
        caller: &Address,
        account: Address,
        amount: U256,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        self.distribute(config, pool, ledger, caller, account, amount, Audience::Viewer)
    }

    #[allow(clippy::too_many_arguments)]
    fn distribute(
        &self,
        config: &AdminConfig,
        pool: &mut RewardPool,
        ledger: &mut dyn PrivilegedMint,
        caller: &Address,
        account: Address,
        amount: U256,
        audience: Audience,
    ) -> Result<Vec<TokenEvent>, IssuanceError> {
        config.ensure_reward_caller(caller)?;
        if account.is_zero() {
            return Err(IssuanceError::ZeroAddress { field: "account" });
        }
        if amount.is_zero() {
            return Err(IssuanceError::ZeroAmount { field: "amount" });
        }
        if audience == Audience::Creator && !config.is_creator(&account) {
            warn!(%account, "Creator reward for unregistered account");
            return Err(IssuanceError::NotRegisteredCreator { account });
        }

        let share = match audience {
            Audience::Creator => creator_share(amount),
            Audience::Viewer => viewer_share(amount),
        };
        let totals = match audience {
            Audience::Creator => &mut pool.creator_rewards,
            Audience::Viewer => &mut pool.viewer_rewards,
        };
        let current = totals.get(&account).copied().unwrap_or_default();
        let new_total = current
            .checked_add(share)
            .ok_or(LedgerError::SupplyOverflow)?;

        let mut credits = Vec::with_capacity(2);
        if !share.is_zero() {
            credits.push((account, share));
        }
        if let RemainderPolicy::Treasury(treasury) = config.remainder() {
            let remainder = amount - share;
            if !remainder.is_zero() {
                credits.push((treasury, remainder));
            }
        }

        let mut events = ledger.mint_batch(MinterRole::RewardDistributor, &credits)?;
        totals.insert(account, new_total);

        info!(%caller, %account, %amount, %share, ?audience, "Reward distributed");
        events.push(match audience {
            Audience::Creator => TokenEvent::CreatorRewarded { account, share },
            Audience::Viewer => TokenEvent::ViewerRewarded { account, share },
        });
        Ok(events)
    }
}
