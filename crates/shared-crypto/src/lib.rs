//! # Shared Crypto
//!
//! Ethereum-compatible primitives used by the ledger (permits) and the mint
//! authorizer (backend attestations).
//!
//! ## Components
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `hashing` | Keccak-256, ABI word packing, EIP-191 personal-message digest |
//! | `typed_data` | EIP-712 domain separator and typed-message digest |
//! | `ecdsa` | secp256k1 signing, signer recovery, `SignatureRecovery` port |
//!
//! ## Security Properties
//!
//! - **Malleability Prevention (EIP-2)**: high-S signatures are rejected
//! - **Scalar Range Validation**: zero or out-of-range `r`/`s` are rejected
//! - **Recovery ID**: `v` must be 0, 1, 27 or 28

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod hashing;
pub mod typed_data;

// Re-exports
pub use ecdsa::{
    address_from_pubkey, recover_address, EcdsaSignature, Secp256k1KeyPair, Secp256k1Recovery,
    SignatureRecovery,
};
pub use errors::SignatureError;
pub use hashing::{eth_signed_message_hash, keccak256, AbiWriter};
pub use typed_data::Eip712Domain;
