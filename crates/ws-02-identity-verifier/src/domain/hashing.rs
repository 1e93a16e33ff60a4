//! # Field Hashing
//!
//! Maps arbitrary bytes into the BN254 scalar field the way Semaphore
//! contracts do: keccak256 shifted right by 8 bits, which always lands
//! below the field modulus.

use shared_crypto::keccak256;
use shared_types::{Address, U256};

/// `uint256(keccak256(bytes)) >> 8`
pub fn hash_to_field(bytes: &[u8]) -> U256 {
    U256::from_big_endian(&keccak256(bytes)) >> 8
}

/// Signal hash binding a proof to `account`.
pub fn signal_hash(account: &Address) -> U256 {
    hash_to_field(account.as_bytes())
}

/// External nullifier of an application/action pair.
pub fn external_nullifier(app_id: &str, action: &str) -> U256 {
    let mut app_word = [0u8; 32];
    hash_to_field(app_id.as_bytes()).to_big_endian(&mut app_word);

    let mut preimage = Vec::with_capacity(32 + action.len());
    preimage.extend_from_slice(&app_word);
    preimage.extend_from_slice(action.as_bytes());
    hash_to_field(&preimage)
}
