//! # Backend Attestation
//!
//! The attester vouches for a `(account, nullifier)` pair by signing it as
//! an EIP-191 personal message, the form a standard wallet signer produces
//! for `signMessage(keccak256(abi.encodePacked(account, nullifier)))`.

use shared_crypto::{
    eth_signed_message_hash, AbiWriter, EcdsaSignature, Secp256k1KeyPair, SignatureError,
};
use shared_types::{Address, Hash, U256};

/// Digest the attester signs for `(account, nullifier)`.
pub fn attestation_digest(account: &Address, nullifier: U256) -> Hash {
    let message = AbiWriter::new()
        .packed_address(account)
        .word_u256(nullifier)
        .keccak();
    eth_signed_message_hash(&message)
}

/// Signs an attestation with the attester key.
pub fn sign_attestation(
    attester: &Secp256k1KeyPair,
    account: &Address,
    nullifier: U256,
) -> Result<EcdsaSignature, SignatureError> {
    attester.sign_prehash(&attestation_digest(account, nullifier))
}
