//! # WorldSocial Node Runtime
//!
//! Library half of the `worldsocial-node` binary: argument definitions and
//! the command runner, kept out of `main.rs` so they can be tested.
//!
//! ## Lifecycle of a Command
//!
//! 1. Load and validate the deployment TOML
//! 2. Load the JSON state file (or build genesis for `init`)
//! 3. Build the configured identity verifier and clock
//! 4. Run the operation through `WorldSocialToken`
//! 5. Save the state (write-temp-then-rename) if the command mutated it

pub mod cli;
pub mod runtime;

pub use cli::{Cli, Command};
pub use runtime::NodeRuntime;
