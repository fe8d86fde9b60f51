//! fencepack - Pack a source tree into one fenced text artifact
//!
//! fencepack provides:
//! - Directory pruning by root-relative path
//! - Ordered file rules (exact name, extension, regex, shebang)
//! - Force-included files from pruned directories
//! - Rule tables as editable TOML

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod backends;
mod cli;
mod core;
mod engine;
mod flows;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);
    cli::run(cli)
}
