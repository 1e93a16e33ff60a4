//! # Keccak Hashing and ABI Packing
//!
//! Reproduces the byte layouts produced by `abi.encode` (32-byte words) and
//! `abi.encodePacked` (tight concatenation) so that digests match what an
//! off-chain signer computes.

use sha3::{Digest, Keccak256};
use shared_types::{Address, Hash, U256};

/// Prefix of an EIP-191 "personal message" over a 32-byte hash.
const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// EIP-191 digest of a 32-byte message hash, as produced by `eth_sign` /
/// `signMessage(bytes32)` wallets.
pub fn eth_signed_message_hash(message_hash: &Hash) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX);
    hasher.update(message_hash);
    hasher.finalize().into()
}

/// Big-endian 32-byte word of a U256.
pub fn u256_word(value: U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

/// Address left-padded to a 32-byte word.
pub fn address_word(address: &Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// Incremental byte writer for ABI-style encodings.
///
/// `word_*` methods append 32-byte words (`abi.encode`); `packed_*` methods
/// append the tight form (`abi.encodePacked`).
#[derive(Debug, Default, Clone)]
pub struct AbiWriter {
    buf: Vec<u8>,
}

impl AbiWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a raw 32-byte word (e.g. a type hash).
    pub fn word(mut self, word: &[u8; 32]) -> Self {
        self.buf.extend_from_slice(word);
        self
    }

    /// Appends a uint256 word.
    pub fn word_u256(self, value: U256) -> Self {
        self.word(&u256_word(value))
    }

    /// Appends an address word.
    pub fn word_address(self, address: &Address) -> Self {
        self.word(&address_word(address))
    }

    /// Appends the 20 raw address bytes.
    pub fn packed_address(mut self, address: &Address) -> Self {
        self.buf.extend_from_slice(address.as_bytes());
        self
    }

    /// Appends arbitrary bytes unpadded.
    pub fn packed_bytes(mut self, bytes: &[u8]) -> Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// The encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Keccak256 of the encoded bytes.
    pub fn keccak(&self) -> Hash {
        keccak256(&self.buf)
    }
}
