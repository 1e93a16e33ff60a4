//! # WS-02 Identity Proof Verifier
//!
//! Stateless oracle that decides whether a uniqueness proof is valid for a
//! published identity root, an application/action context, a signal (the
//! requesting account) and a nullifier.
//!
//! ## Public Signals
//!
//! Proofs follow the Semaphore / World ID layout: four public inputs
//! `[root, nullifier, signal_hash, external_nullifier]` where
//!
//! - `signal_hash = hash_to_field(account)`
//! - `external_nullifier = hash_to_field(hash_to_field(app_id) || action)`
//! - `hash_to_field(x) = keccak256(x) >> 8`
//!
//! Binding the account through `signal_hash` means a proof generated for
//! one account is rejected for every other account.
//!
//! ## Adapters
//!
//! | Adapter | Purpose |
//! |---------|---------|
//! | `Groth16ProofVerifier` | BN254 Groth16 verification with a snarkjs verifying key |
//! | `MockProofVerifier` | Deterministic test double (opt-in `mock` feature) |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;

// Re-export public API
pub use adapters::groth16::{Groth16ProofVerifier, RootPolicy};
#[cfg(any(test, feature = "mock"))]
pub use adapters::mock::{MockMode, MockProofVerifier};
pub use domain::entities::{ProofContext, SemaphoreProof};
pub use domain::errors::ProofError;
pub use domain::hashing::{external_nullifier, hash_to_field, signal_hash};
pub use ports::inbound::IdentityProofVerifier;
