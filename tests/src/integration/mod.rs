//! # Integration Flows
//!
//! End-to-end scenarios across the ledger, the identity verifier and the
//! issuance layer, driven through the `WorldSocialToken` facade.
//!
//! | Module | Covers |
//! |--------|--------|
//! | `mint_flows` | cooldown timeline, nullifier replay, atomicity |
//! | `reward_flows` | 70/30 split, registration gate, caller policies |
//! | `admin_flows` | owner-gated setters, attester rotation, ownership |
//! | `permit_flows` | offline-signed approvals and replay |
//! | `groth16_flows` | real BN254 proofs through a snarkjs key file |

pub mod admin_flows;
pub mod groth16_flows;
pub mod mint_flows;
pub mod permit_flows;
pub mod reward_flows;
