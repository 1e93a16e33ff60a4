//! # Domain Entities
//!
//! Token metadata, minting roles and the permit message.

use serde::{Deserialize, Serialize};
use shared_crypto::{keccak256, AbiWriter, Eip712Domain};
use shared_types::units::DECIMALS;
use shared_types::{Address, Hash, U256};
use std::fmt;

/// EIP-2612 permit type string.
pub const PERMIT_TYPE: &str =
    "Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";

/// Descriptive token data plus the permit signing domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Fixed-point decimals.
    pub decimals: u8,
    /// Domain under which permits are signed.
    pub domain: Eip712Domain,
}

impl TokenMetadata {
    /// Name of the WorldSocial token.
    pub const NAME: &'static str = "WorldSocial Token";
    /// Symbol of the WorldSocial token.
    pub const SYMBOL: &'static str = "WST";
    /// Permit domain version.
    pub const VERSION: &'static str = "1";

    /// Metadata for a WorldSocial deployment on `chain_id` at
    /// `verifying_contract`.
    pub fn worldsocial(chain_id: U256, verifying_contract: Address) -> Self {
        Self {
            name: Self::NAME.to_string(),
            symbol: Self::SYMBOL.to_string(),
            decimals: DECIMALS,
            domain: Eip712Domain {
                name: Self::NAME.to_string(),
                version: Self::VERSION.to_string(),
                chain_id,
                verifying_contract,
            },
        }
    }
}

/// Components allowed to create new supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinterRole {
    /// Proof-gated human mint.
    MintAuthorizer,
    /// Creator/viewer reward payouts.
    RewardDistributor,
}

impl fmt::Display for MinterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinterRole::MintAuthorizer => f.write_str("mint_authorizer"),
            MinterRole::RewardDistributor => f.write_str("reward_distributor"),
        }
    }
}

/// Offline-signed approval: `owner` lets `spender` move up to `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitMessage {
    /// Account granting the allowance (must be the signer).
    pub owner: Address,
    /// Account receiving the allowance.
    pub spender: Address,
    /// Allowance to set.
    pub value: U256,
    /// Owner's replay counter at signing time.
    pub nonce: U256,
    /// Last second at which the permit may be redeemed.
    pub deadline: U256,
}

impl PermitMessage {
    /// `keccak256(abi.encode(PERMIT_TYPEHASH, owner, spender, value, nonce, deadline))`
    pub fn struct_hash(&self) -> Hash {
        AbiWriter::new()
            .word(&keccak256(PERMIT_TYPE.as_bytes()))
            .word_address(&self.owner)
            .word_address(&self.spender)
            .word_u256(self.value)
            .word_u256(self.nonce)
            .word_u256(self.deadline)
            .keccak()
    }

    /// Digest the owner signs under `domain`.
    pub fn digest(&self, domain: &Eip712Domain) -> Hash {
        domain.digest(&self.struct_hash())
    }
}
