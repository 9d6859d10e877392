//! `cwatch`: batch driver for CAOM / storage-inventory metadata audits.

mod audit;
mod dup;
mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use caomwatch_config::{AuditConfig, ConfigError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            hint: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "cwatch", version, about = "CAOM / storage-inventory metadata audits")]
struct Cli {
    /// Path to the audit configuration file
    #[arg(
        long,
        global = true,
        env = "CAOMWATCH_CONFIG",
        default_value = "caomwatch.toml"
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare CAOM artifact metadata against storage inventory
    #[command(after_help = "\
Examples:
  cwatch diff
  cwatch diff CFHT DAO
  cwatch diff CFHT --json --output-dir /tmp/reports")]
    Diff {
        /// Collections to audit; defaults to every in-SI collection
        collections: Vec<String>,

        /// Also write the engine result as JSON next to the text report
        #[arg(long)]
        json: bool,

        /// Override the configured report directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Profile cross-type duplicate artifact URIs per collection
    #[command(after_help = "\
Examples:
  cwatch dup
  cwatch dup CFHT")]
    Dup {
        /// Collections to profile; defaults to every in-SI collection
        collections: Vec<String>,

        /// Override the configured report directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Parse and validate the audit configuration without running
    ValidateConfig,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(ref hint) = e.hint {
                eprintln!("hint:  {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Diff {
            collections,
            json,
            output_dir,
        } => audit::cmd_diff(&cli.config, &collections, json, output_dir),
        Commands::Dup {
            collections,
            output_dir,
        } => dup::cmd_dup(&cli.config, &collections, output_dir),
        Commands::ValidateConfig => cmd_validate_config(&cli.config),
    }
}

fn cmd_validate_config(path: &Path) -> Result<(), CliError> {
    let config = load_config(path)?;
    eprintln!(
        "valid: {} site(s), {} collection(s), {} mapping(s), {} in SI",
        config.sites.len(),
        config.collections.len(),
        config.mappings.len(),
        config.collections_in_si().len(),
    );
    Ok(())
}

pub(crate) fn load_config(path: &Path) -> Result<AuditConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::new(
            exit_codes::EXIT_USAGE,
            format!("cannot read {}: {e}", path.display()),
        )
    })?;
    AuditConfig::from_toml(&text)
        .map_err(|e| CliError::new(exit_codes::EXIT_CONFIG_INVALID, e.to_string()))
}

pub(crate) fn config_usage_err(e: ConfigError) -> CliError {
    CliError::new(exit_codes::EXIT_USAGE, e.to_string())
}
