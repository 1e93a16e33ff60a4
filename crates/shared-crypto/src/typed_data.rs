//! # EIP-712 Typed Data
//!
//! Domain separator and final digest for structured off-chain messages.
//! The struct hash itself is produced by the owner of the message type
//! (the ledger builds the permit struct hash).

use crate::hashing::{keccak256, AbiWriter};
use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, U256};

/// Canonical EIP-712 domain type string (name, version, chainId,
/// verifyingContract).
pub const EIP712_DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Signing domain that scopes a typed message to one token deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip712Domain {
    /// Human-readable name, e.g. "WorldSocial Token".
    pub name: String,
    /// Domain version, "1" for this token.
    pub version: String,
    /// Chain the deployment lives on.
    pub chain_id: U256,
    /// Address identifying this deployment.
    pub verifying_contract: Address,
}

impl Eip712Domain {
    /// `keccak256(abi.encode(TYPEHASH, keccak(name), keccak(version), chainId, verifyingContract))`
    pub fn separator(&self) -> Hash {
        AbiWriter::new()
            .word(&keccak256(EIP712_DOMAIN_TYPE.as_bytes()))
            .word(&keccak256(self.name.as_bytes()))
            .word(&keccak256(self.version.as_bytes()))
            .word_u256(self.chain_id)
            .word_address(&self.verifying_contract)
            .keccak()
    }

    /// `keccak256(0x19 0x01 || domainSeparator || structHash)`
    pub fn digest(&self, struct_hash: &Hash) -> Hash {
        AbiWriter::new()
            .packed_bytes(&[0x19, 0x01])
            .word(&self.separator())
            .word(struct_hash)
            .keccak()
    }
}
