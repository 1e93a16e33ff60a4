//! # Token State
//!
//! The single store owned by the top-level system and handed explicitly to
//! each component operation: ledger, admin config, mint registry, reward
//! pool and event log. Serializes to JSON so a process can load, mutate and
//! save it between invocations.

use crate::domain::admin_config::AdminConfig;
use crate::domain::errors::IssuanceError;
use crate::domain::mint_authorizer::MintRegistry;
use crate::domain::reward_distributor::RewardPool;
use serde::{Deserialize, Serialize};
use shared_types::{Address, EventLog, RemainderPolicy, RewardCallerPolicy, Timestamp, U256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use ws_01_token_ledger::{MinterRole, TokenLedger, TokenMetadata};
use ws_02_identity_verifier::ProofContext;

/// World Chain mainnet.
pub const DEFAULT_CHAIN_ID: u64 = 480;

/// Construction-time parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenesisParams {
    /// Initial owner.
    pub owner: Address,
    /// Initial attestation signer.
    pub attester: Address,
    /// Base units per successful mint.
    pub amount_per_mint: U256,
    /// Cooldown in seconds.
    pub wait_between_mints: u64,
    /// App/action pair proofs are scoped to.
    pub proof_context: ProofContext,
    /// Permit domain chain id.
    pub chain_id: U256,
    /// Permit domain verifying contract.
    pub verifying_contract: Address,
    /// Supply credited to the owner at deployment.
    pub initial_supply: U256,
    /// Whether consumed nullifiers block later mints.
    pub enforce_unique_nullifiers: bool,
    /// Who may distribute rewards.
    pub reward_callers: RewardCallerPolicy,
    /// Where reward remainders go.
    pub remainder: RemainderPolicy,
}

impl GenesisParams {
    /// Parameters with default chain, no initial supply, nullifier
    /// enforcement on and owner-only rewards.
    pub fn new(
        owner: Address,
        attester: Address,
        amount_per_mint: U256,
        wait_between_mints: u64,
        proof_context: ProofContext,
    ) -> Self {
        Self {
            owner,
            attester,
            amount_per_mint,
            wait_between_mints,
            proof_context,
            chain_id: U256::from(DEFAULT_CHAIN_ID),
            verifying_contract: Address::ZERO,
            initial_supply: U256::zero(),
            enforce_unique_nullifiers: true,
            reward_callers: RewardCallerPolicy::default(),
            remainder: RemainderPolicy::default(),
        }
    }
}

/// Failure to read or write persisted state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem failure.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not a valid state snapshot.
    #[error("Invalid state document: {0}")]
    Format(#[from] serde_json::Error),
}

/// Everything the token system persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    pub(crate) ledger: TokenLedger,
    pub(crate) config: AdminConfig,
    pub(crate) registry: MintRegistry,
    pub(crate) rewards: RewardPool,
    pub(crate) events: EventLog,
    /// Latest clock reading of a committed operation.
    pub(crate) observed_time: Timestamp,
}

impl TokenState {
    /// Initializes a deployment at time `now`.
    pub fn genesis(params: GenesisParams, now: Timestamp) -> Result<Self, IssuanceError> {
        let owner = params.owner;
        let mut config = AdminConfig::new(
            owner,
            params.attester,
            params.amount_per_mint,
            params.wait_between_mints,
            params.proof_context,
        )?;
        // Initial values, not changes: the setter events are not logged.
        config.set_nullifier_enforcement(&owner, params.enforce_unique_nullifiers)?;
        config.set_reward_caller_policy(&owner, params.reward_callers)?;
        config.set_remainder_policy(&owner, params.remainder)?;

        let metadata = TokenMetadata::worldsocial(params.chain_id, params.verifying_contract);
        let (mut ledger, initial_transfer) =
            TokenLedger::with_initial_supply(metadata, owner, params.initial_supply)?;
        ledger.grant_minter(MinterRole::MintAuthorizer);
        ledger.grant_minter(MinterRole::RewardDistributor);

        let mut events = EventLog::new();
        events.append(now, initial_transfer);

        info!(%owner, initial_supply = %params.initial_supply, "Genesis state created");
        Ok(Self {
            ledger,
            config,
            registry: MintRegistry::new(),
            rewards: RewardPool::new(),
            events,
            observed_time: now,
        })
    }

    /// The ledger.
    pub fn ledger(&self) -> &TokenLedger {
        &self.ledger
    }

    /// Admin configuration.
    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    /// Cooldowns and consumed nullifiers.
    pub fn registry(&self) -> &MintRegistry {
        &self.registry
    }

    /// Cumulative rewards.
    pub fn rewards(&self) -> &RewardPool {
        &self.rewards
    }

    /// Event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Latest clock reading of a committed operation.
    pub fn observed_time(&self) -> Timestamp {
        self.observed_time
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Pretty-printed JSON snapshot.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Writes the snapshot to a sibling temp file, then renames it over
    /// `path`, so a crash never leaves a half-written state file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let tmp = temp_path(path);
        let json = self.to_json()?;
        fs::write(&tmp, json).map_err(|source| io_error(&tmp, source))?;
        fs::rename(&tmp, path).map_err(|source| io_error(path, source))?;
        debug!(path = %path.display(), events = self.events.len(), "State saved");
        Ok(())
    }

    /// Reads a snapshot written by `save`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
        let state = Self::from_json(&json)?;
        debug!(path = %path.display(), events = state.events.len(), "State loaded");
        Ok(state)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path, source: std::io::Error) -> PersistenceError {
    PersistenceError::Io {
        path: path.display().to_string(),
        source,
    }
}
