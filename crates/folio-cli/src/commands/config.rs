//! Config command implementation.
//!
//! Analytics settings live in a TOML file. Lookup order: `--config`
//! (or `FOLIO_CONFIG`), then `<config dir>/folio/config.toml`, then the
//! built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use folio_analytics::AnalyticsConfig;

use crate::cli::{Context, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output::{print_header, print_info, print_json, print_success};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default values
    Init(InitArgs),
}

/// Arguments for init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the file (defaults to the global --config or the user config dir)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Executes the config command.
pub fn execute(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Init(init_args) => init(init_args, ctx),
    }
}

/// Returns the per-user configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
        .join("config.toml")
}

/// Loads the analytics configuration.
///
/// An explicit path must exist; the default location is optional.
pub fn load(explicit: Option<&Path>) -> CliResult<AnalyticsConfig> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => (default_config_path(), false),
    };

    if !path.exists() {
        if required {
            return Err(CliError::config(&path, "file not found"));
        }
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(AnalyticsConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    let config: AnalyticsConfig =
        toml::from_str(&content).map_err(|e| CliError::config(&path, e.to_string()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn show(ctx: &Context) -> Result<()> {
    let config = load(ctx.config_path.as_deref())?;

    match ctx.format {
        OutputFormat::Json => print_json(&config)?,
        OutputFormat::Table => {
            let source = ctx
                .config_path
                .clone()
                .unwrap_or_else(default_config_path);
            if !ctx.quiet {
                print_header("Configuration");
                print_info(&format!("File: {}", source.display()));
                println!();
            }
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn init(args: InitArgs, ctx: &Context) -> Result<()> {
    let path = args
        .path
        .or_else(|| ctx.config_path.clone())
        .unwrap_or_else(default_config_path);

    if path.exists() && !args.force {
        return Err(CliError::config(&path, "file already exists (use --force to overwrite)").into());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let content = toml::to_string_pretty(&AnalyticsConfig::default())?;
    std::fs::write(&path, content)?;

    if !ctx.quiet {
        print_success(&format!("Wrote {}", path.display()));
    }
    Ok(())
}
