//! # Ports Layer
//!
//! Interfaces the issuance subsystems program against.

pub mod inbound;
