//! # WS-03 Token Issuance
//!
//! The two ways new WorldSocial tokens come into existence, and the owner
//! controls around them.
//!
//! ## Components
//!
//! | Component | Responsibility |
//! |-----------|----------------|
//! | `MintAuthorizer` | attestation signature, nullifier replay, identity proof, cooldown; then mint |
//! | `RewardDistributor` | 70% creator / 30% viewer shares, creator registration gate |
//! | `AdminConfig` | owner-gated parameters with change events |
//! | `TokenState` | the single store every operation mutates, JSON-persistable |
//! | `WorldSocialToken` | facade that reads the clock once per operation and commits events |
//!
//! ## Mint Check Order
//!
//! ```text
//! request_mint(account, root, nullifier, proof, signature)
//!     1. attester signature over (account, nullifier)   -> InvalidSignature
//!     2. nullifier not yet consumed                     -> ProofReplayed
//!     3. identity proof                                 -> InvalidProof
//!     4. now - last_mint >= wait_between_mints          -> CooldownNotElapsed
//!     => mint amount_per_mint, consume nullifier, last_mint = now, emit Minted
//! ```
//!
//! Every operation is all-or-nothing: any error leaves balances, cooldowns,
//! nullifiers, reward totals, config and the event log unchanged.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod domain;
pub mod ports;
pub mod service;
pub mod state;

// Re-export public API
pub use config::{ConfigError, DeploymentConfig, TokenAmount, VerifierConfig, VerifierKind};
pub use domain::admin_config::AdminConfig;
pub use domain::attestation::{attestation_digest, sign_attestation};
pub use domain::errors::IssuanceError;
pub use domain::mint_authorizer::{MintAuthorizer, MintRegistry, MintRequest};
pub use domain::reward_distributor::{
    creator_share, viewer_share, RewardDistributor, RewardPool, CREATOR_SHARE_PERCENT,
    VIEWER_SHARE_PERCENT,
};
pub use ports::inbound::TokenIssuanceApi;
pub use ports::outbound::{ManualTimeSource, SystemTimeSource, TimeSource};
pub use service::WorldSocialToken;
pub use state::{GenesisParams, PersistenceError, TokenState};
