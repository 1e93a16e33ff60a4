//! # WS-01 Token Ledger
//!
//! Balance and allowance bookkeeping for the WorldSocial token.
//!
//! ## Purpose
//!
//! The ledger is the only place balances live. It exposes the standard
//! fungible-token surface (transfer, approve, transferFrom), a privileged
//! mint reserved for the issuance components, and offline-signed approvals
//! (permits) with per-owner replay counters and deadlines.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | `total_supply == sum(balances)` | `domain/ledger.rs` - every credit/debit goes through `credit`/`debit` |
//! | Only granted roles mint | `domain/ledger.rs` - `TokenLedger::ensure_minter()` |
//! | A permit is redeemable once | `domain/ledger.rs` - nonce check + increment in `permit()` |
//! | Failed operations mutate nothing | every operation validates fully before its first write |
//!
//! ## Outbound Dependencies
//!
//! | Dependency | Trait | Purpose |
//! |------------|-------|---------|
//! | shared-crypto | `SignatureRecovery` | permit signer recovery |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod domain;
pub mod ports;

// Re-export public API
pub use domain::entities::{MinterRole, PermitMessage, TokenMetadata, PERMIT_TYPE};
pub use domain::errors::LedgerError;
pub use domain::ledger::TokenLedger;
pub use ports::inbound::{LedgerReader, PrivilegedMint};
