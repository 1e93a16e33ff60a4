//! # Domain Layer
//!
//! Issuance rules over an explicitly passed state; no clock, no I/O.

pub mod admin_config;
pub mod attestation;
pub mod errors;
pub mod mint_authorizer;
pub mod reward_distributor;
