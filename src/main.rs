//! # autoeda command-line entry point
//!
//! ```text
//! main()
//!   ├─> Initialize logging (files + stderr, console only as fallback)
//!   ├─> Parse CLI arguments (clap)
//!   └─> Run the subcommand
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // CLI output goes to stdout

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    // RUST_LOG=debug shows per-step detail
    if let Err(e) = autoeda::logging::init() {
        autoeda::logging::init_console()?;
        tracing::warn!("File logging unavailable: {e:#}");
    }

    let cli = cli::Cli::parse();
    if let Err(e) = cli::run_command(cli.command) {
        tracing::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}
