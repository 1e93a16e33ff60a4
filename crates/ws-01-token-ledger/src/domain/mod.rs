//! # Domain Layer
//!
//! Pure bookkeeping logic with no I/O dependencies.

pub mod entities;
pub mod errors;
pub mod ledger;
