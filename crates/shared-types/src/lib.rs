//! # Shared Types Crate
//!
//! Domain value objects shared by the ledger, the identity verifier and the
//! issuance subsystems.
//!
//! ## Contents
//!
//! - **Entities**: `Address`, `Hash`, `U256`, `Timestamp`
//! - **Units**: 18-decimal fixed-point helpers (`units::tokens`)
//! - **Events**: `TokenEvent` and the append-only `EventLog`
//! - **Errors**: the `ErrorKind` taxonomy every subsystem error maps onto

pub mod entities;
pub mod errors;
pub mod events;
pub mod units;

pub use entities::*;
pub use errors::*;
pub use events::*;
