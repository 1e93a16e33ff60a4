//! # Event Log
//!
//! Append-only record of everything the token system did. Events are only
//! appended once the operation that produced them has fully succeeded, so a
//! rejected operation never leaves a trace here.

use crate::entities::{Address, Timestamp, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// POLICIES (carried by config-change events)
// =============================================================================

/// Who may invoke `reward_creator` / `reward_viewer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", content = "callers", rename_all = "snake_case")]
pub enum RewardCallerPolicy {
    /// Any caller may distribute rewards.
    Unrestricted,
    /// Only the current owner.
    #[default]
    OwnerOnly,
    /// The owner plus the listed distributors.
    Allowlist(Vec<Address>),
}

impl RewardCallerPolicy {
    /// Whether `caller` passes this policy given the current `owner`.
    #[must_use]
    pub fn permits(&self, caller: &Address, owner: &Address) -> bool {
        match self {
            RewardCallerPolicy::Unrestricted => true,
            RewardCallerPolicy::OwnerOnly => caller == owner,
            RewardCallerPolicy::Allowlist(list) => caller == owner || list.contains(caller),
        }
    }
}

impl fmt::Display for RewardCallerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewardCallerPolicy::Unrestricted => f.write_str("unrestricted"),
            RewardCallerPolicy::OwnerOnly => f.write_str("owner_only"),
            RewardCallerPolicy::Allowlist(list) => write!(f, "allowlist({})", list.len()),
        }
    }
}

/// What happens to `amount - share` when a reward is distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", content = "address", rename_all = "snake_case")]
pub enum RemainderPolicy {
    /// Only the share is minted; the remainder never enters supply.
    #[default]
    NotIssued,
    /// The remainder is minted to a treasury account in the same step.
    Treasury(Address),
}

impl fmt::Display for RemainderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemainderPolicy::NotIssued => f.write_str("not_issued"),
            RemainderPolicy::Treasury(addr) => write!(f, "treasury({addr})"),
        }
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// Something observable the token system did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "PascalCase")]
pub enum TokenEvent {
    /// Balance moved. Mints use the zero address as `from`.
    Transfer {
        from: Address,
        to: Address,
        value: U256,
    },
    /// Allowance set, directly or through a permit.
    Approval {
        owner: Address,
        spender: Address,
        value: U256,
    },
    /// Proof-gated mint succeeded.
    Minted { account: Address, amount: U256 },
    /// Attestation signer rotated.
    AttesterUpdated { old: Address, new: Address },
    /// Per-mint amount changed.
    AmountPerMintUpdated { old: U256, new: U256 },
    /// Cooldown length changed.
    WaitBetweenMintsUpdated { old: u64, new: u64 },
    /// Nullifier replay enforcement toggled.
    NullifierEnforcementUpdated { old: bool, new: bool },
    /// Reward caller policy changed.
    RewardCallerPolicyUpdated {
        old: RewardCallerPolicy,
        new: RewardCallerPolicy,
    },
    /// Reward remainder policy changed.
    RemainderPolicyUpdated {
        old: RemainderPolicy,
        new: RemainderPolicy,
    },
    /// Two-step ownership hand-off started.
    OwnershipTransferStarted { owner: Address, candidate: Address },
    /// Owner replaced.
    OwnershipTransferred { previous: Address, new: Address },
    /// Account flagged as a content creator.
    CreatorRegistered { account: Address },
    /// Creator share credited.
    CreatorRewarded { account: Address, share: U256 },
    /// Viewer share credited.
    ViewerRewarded { account: Address, share: U256 },
}

/// An event plus its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Zero-based position in the log.
    pub sequence: u64,
    /// Clock reading of the operation that emitted it.
    pub timestamp: Timestamp,
    /// The event itself.
    pub event: TokenEvent,
}

/// Append-only event log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the events of one completed operation, in order.
    pub fn append(&mut self, timestamp: Timestamp, events: impl IntoIterator<Item = TokenEvent>) {
        for event in events {
            let sequence = self.records.len() as u64;
            self.records.push(EventRecord {
                sequence,
                timestamp,
                event,
            });
        }
    }

    /// All records, oldest first.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records with `sequence >= from`.
    #[must_use]
    pub fn since(&self, from: u64) -> &[EventRecord] {
        let start = usize::try_from(from).unwrap_or(usize::MAX).min(self.records.len());
        &self.records[start..]
    }

    /// The most recent event, if any.
    #[must_use]
    pub fn last(&self) -> Option<&TokenEvent> {
        self.records.last().map(|r| &r.event)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing has been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
