//! # Adapters
//!
//! Concrete `IdentityProofVerifier` implementations.

pub mod groth16;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
