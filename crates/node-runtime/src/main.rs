//! # WorldSocial Node
//!
//! Command-line entry point. Logging goes to stderr and is filtered with
//! `RUST_LOG` (default `info`); command results are printed to stdout as
//! JSON.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use node_runtime::{Cli, NodeRuntime};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let runtime = NodeRuntime::from_cli(&cli)?;
    let output = runtime.execute(&cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
