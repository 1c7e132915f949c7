//! Folio CLI - Command-line interface for portfolio analytics.
//!
//! # Usage
//!
//! ```bash
//! # Full metrics snapshot for an exported portfolio
//! folio metrics --input portfolio.json --as-of 2024-12-31
//!
//! # Same, as JSON
//! folio metrics --input portfolio.json --format json
//!
//! # XIRR of a plain date,amount CSV
//! folio xirr --input flows.csv
//!
//! # Write a default config file
//! folio config init
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use cli::{Cli, Commands, Context};

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.quiet);

    let ctx = Context {
        format: cli.format,
        quiet: cli.quiet,
        config_path: cli.config,
    };

    match cli.command {
        Commands::Metrics(args) => commands::metrics::execute(args, &ctx)?,
        Commands::Xirr(args) => commands::xirr::execute(args, &ctx)?,
        Commands::Config(args) => commands::config::execute(args, &ctx)?,
    }

    Ok(())
}
