//! # WorldSocial Token Test Suite
//!
//! Cross-crate tests that drive the whole system through `WorldSocialToken`.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # criterion benchmarks (mint, rewards, verification)
//! └── src/
//!     ├── fixtures.rs   # deployment harness, signed requests
//!     ├── zk.rs         # toy Groth16 circuit + snarkjs key export
//!     └── integration/  # end-to-end flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ws-tests
//! cargo test -p ws-tests integration::mint_flows
//! cargo bench -p ws-tests
//! ```

pub mod fixtures;
pub mod integration;
