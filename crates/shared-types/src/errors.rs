//! # Error Taxonomy
//!
//! Every subsystem error maps onto one of four kinds so that automated
//! clients can branch on *why* an operation was rejected ("wait longer" vs
//! "resubmit with a corrected signature") without matching on concrete
//! error types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad attestation signature, failed uniqueness proof, caller is not the
    /// owner, or account is not a registered creator.
    Authorization,
    /// Cooldown window not yet elapsed.
    RateLimit,
    /// Nullifier already consumed, or an offline approval that expired or was
    /// already redeemed.
    Replay,
    /// Zero amount or zero address where a non-zero value is required, or an
    /// arithmetic bound was exceeded.
    Validation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Authorization => "authorization",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Replay => "replay",
            ErrorKind::Validation => "validation",
        };
        f.write_str(name)
    }
}

/// Implemented by every subsystem error.
pub trait Classify {
    /// Taxonomy bucket of this error.
    fn kind(&self) -> ErrorKind;

    /// Stable machine-readable reason, e.g. `"COOLDOWN_NOT_ELAPSED"`.
    fn reason_code(&self) -> &'static str;
}
