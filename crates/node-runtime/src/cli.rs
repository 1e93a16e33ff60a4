//! # Command-Line Interface
//!
//! Argument definitions for `worldsocial-node`. Every token operation is a
//! subcommand; callers are named with `--caller` since this is a local
//! operator tool, not an authenticated endpoint.

use clap::{Args, Parser, Subcommand};
use shared_types::units::tokens;
use shared_types::{Address, Timestamp, U256};
use std::path::PathBuf;

/// WorldSocial token node
#[derive(Parser, Debug)]
#[command(name = "worldsocial-node", version)]
#[command(about = "Proof-gated minting and creator/viewer rewards for the WorldSocial token")]
pub struct Cli {
    /// Deployment configuration (TOML)
    #[arg(short, long, default_value = "worldsocial.toml")]
    pub config: PathBuf,

    /// Persisted token state (JSON)
    #[arg(short, long, default_value = "worldsocial-state.json")]
    pub state: PathBuf,

    /// Pin the clock to this UNIX timestamp instead of reading system time.
    /// Values before the last committed time are raised to it.
    #[arg(long)]
    pub now: Option<Timestamp>,

    #[command(subcommand)]
    pub command: Command,
}

/// Caller identity for gated operations.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CallerArg {
    /// Address invoking the operation
    #[arg(long)]
    pub caller: Address,
}

/// Every operation the node exposes.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the genesis state file from the deployment configuration
    Init {
        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Sign an attestation and print a ready-to-submit mint request
    Attest {
        /// Attester secret key (hex)
        #[arg(long)]
        key: String,
        /// Account to mint to
        #[arg(long)]
        account: Address,
        /// Proof nullifier
        #[arg(long, value_parser = parse_u256)]
        nullifier: U256,
        /// Identity root the proof was made against
        #[arg(long, value_parser = parse_u256)]
        root: U256,
        /// JSON file holding the eight proof words
        #[arg(long, conflicts_with = "mock_proof", required_unless_present = "mock_proof")]
        proof: Option<PathBuf>,
        /// Fill in the proof the mock verifier expects
        #[arg(long)]
        mock_proof: bool,
    },

    /// Submit a mint request (JSON as printed by `attest`)
    Mint {
        /// Mint request file
        #[arg(long)]
        request: PathBuf,
    },

    /// Register an account as a content creator
    RegisterCreator {
        #[command(flatten)]
        caller: CallerArg,
        /// Account to register
        #[arg(long)]
        account: Address,
    },

    /// Mint the 70% creator share of an amount
    RewardCreator {
        #[command(flatten)]
        caller: CallerArg,
        /// Registered creator
        #[arg(long)]
        account: Address,
        /// Reward amount (base units, or e.g. `100wst`)
        #[arg(long, value_parser = parse_amount)]
        amount: U256,
    },

    /// Mint the 30% viewer share of an amount
    RewardViewer {
        #[command(flatten)]
        caller: CallerArg,
        /// Viewer account
        #[arg(long)]
        account: Address,
        /// Reward amount (base units, or e.g. `100wst`)
        #[arg(long, value_parser = parse_amount)]
        amount: U256,
    },

    /// Replace the attestation signer
    SetAttester {
        #[command(flatten)]
        caller: CallerArg,
        /// New attester address
        #[arg(long)]
        attester: Address,
    },

    /// Change the amount minted per successful request
    SetAmountPerMint {
        #[command(flatten)]
        caller: CallerArg,
        /// New amount (base units, or e.g. `10wst`)
        #[arg(long, value_parser = parse_amount)]
        amount: U256,
    },

    /// Change the per-account mint cooldown
    SetWaitBetweenMints {
        #[command(flatten)]
        caller: CallerArg,
        /// Cooldown in seconds
        #[arg(long)]
        seconds: u64,
    },

    /// Turn nullifier replay rejection on or off
    SetNullifierEnforcement {
        #[command(flatten)]
        caller: CallerArg,
        /// `true` to reject reused nullifiers
        #[arg(long, action = clap::ArgAction::Set)]
        enabled: bool,
    },

    /// Hand ownership to another account in one step
    TransferOwnership {
        #[command(flatten)]
        caller: CallerArg,
        /// New owner
        #[arg(long)]
        new_owner: Address,
    },

    /// Nominate a new owner (two-step transfer)
    ProposeOwner {
        #[command(flatten)]
        caller: CallerArg,
        /// Nominee
        #[arg(long)]
        candidate: Address,
    },

    /// Accept a pending ownership nomination
    AcceptOwnership {
        #[command(flatten)]
        caller: CallerArg,
    },

    /// Move tokens between accounts
    Transfer {
        /// Sender
        #[arg(long)]
        from: Address,
        /// Recipient
        #[arg(long)]
        to: Address,
        /// Amount (base units, or e.g. `5wst`)
        #[arg(long, value_parser = parse_amount)]
        amount: U256,
    },

    /// Set a spender's allowance
    Approve {
        /// Token holder
        #[arg(long)]
        owner: Address,
        /// Spender
        #[arg(long)]
        spender: Address,
        /// Allowance (base units, or e.g. `5wst`)
        #[arg(long, value_parser = parse_amount)]
        amount: U256,
    },

    /// Spend an allowance
    TransferFrom {
        /// Spender using the allowance
        #[arg(long)]
        spender: Address,
        /// Token holder
        #[arg(long)]
        from: Address,
        /// Recipient
        #[arg(long)]
        to: Address,
        /// Amount (base units, or e.g. `5wst`)
        #[arg(long, value_parser = parse_amount)]
        amount: U256,
    },

    /// Sign an offline approval and print it as JSON
    SignPermit {
        /// Holder secret key (hex)
        #[arg(long)]
        key: String,
        /// Spender
        #[arg(long)]
        spender: Address,
        /// Allowance (base units, or e.g. `5wst`)
        #[arg(long, value_parser = parse_amount)]
        value: U256,
        /// Last valid UNIX timestamp
        #[arg(long, value_parser = parse_u256)]
        deadline: U256,
        /// Nonce to sign; defaults to the holder's current nonce
        #[arg(long, value_parser = parse_u256)]
        nonce: Option<U256>,
    },

    /// Redeem a signed approval (JSON as printed by `sign-permit`)
    Permit {
        /// Signed permit file
        #[arg(long)]
        request: PathBuf,
    },

    /// Show an account's balance, cooldown, rewards and nonce
    Balance {
        /// Account to inspect
        #[arg(long)]
        account: Address,
    },

    /// Show token metadata and deployment parameters
    Info,

    /// Print the event log
    Events {
        /// First sequence number to print
        #[arg(long, default_value_t = 0)]
        since: u64,
    },
}

impl Command {
    /// Whether a successful run changes the persisted state.
    pub fn mutates(&self) -> bool {
        !matches!(
            self,
            Command::Attest { .. }
                | Command::SignPermit { .. }
                | Command::Balance { .. }
                | Command::Info
                | Command::Events { .. }
        )
    }
}

/// Parses a 256-bit integer given in decimal or `0x`-prefixed hex.
pub fn parse_u256(raw: &str) -> Result<U256, String> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| e.to_string()),
        None => U256::from_dec_str(raw).map_err(|e| format!("{e:?}")),
    };
    parsed.map_err(|e| format!("invalid integer {raw:?}: {e}"))
}

/// Parses an amount in base units, or whole tokens with a `wst` suffix.
pub fn parse_amount(raw: &str) -> Result<U256, String> {
    let raw = raw.trim();
    match raw.strip_suffix("wst").or_else(|| raw.strip_suffix("WST")) {
        Some(whole) => whole
            .trim()
            .parse::<u64>()
            .map(tokens)
            .map_err(|e| format!("invalid token amount {raw:?}: {e}")),
        None => parse_u256(raw),
    }
}
