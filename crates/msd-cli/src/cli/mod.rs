//! CLI for the MSD part assembler.

mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use msd_core::config::{self, MsdConfig};
use std::path::{Path, PathBuf};

use commands::{
    run_assemble, run_checksum, run_cleanup, run_combined_hash, run_completions, run_locate,
    run_man, run_validate_path, AssembleArgs, PartsArgs,
};

/// Top-level CLI for the MSD part assembler.
#[derive(Debug, Parser)]
#[command(name = "msd")]
#[command(about = "MSD: reassemble downloaded file parts by content hash", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Assemble the output file from its parts, then clean up the parts.
    Assemble {
        /// Manifest JSON written by the download phase.
        #[arg(long, short = 'm')]
        manifest: PathBuf,
        /// Destination file.
        #[arg(long, short = 'o')]
        output: PathBuf,
        /// Directory holding the parts (default: manifest, then config).
        #[arg(long)]
        parts_dir: Option<String>,
        /// Filename prefix of part files (default: manifest, then config).
        #[arg(long)]
        prefix: Option<String>,
        /// Keep part files after a successful assembly.
        #[arg(long)]
        keep_parts: bool,
        /// Size in bytes of every part except the last (default: manifest).
        #[arg(long, value_name = "BYTES")]
        range_size: Option<u64>,
        /// Size in bytes of the assembled file (default: manifest).
        #[arg(long, value_name = "BYTES")]
        total_size: Option<u64>,
    },

    /// Print part files in assembly order without writing anything.
    Locate {
        /// Manifest JSON written by the download phase.
        #[arg(long, short = 'm')]
        manifest: PathBuf,
        /// Directory holding the parts.
        #[arg(long)]
        parts_dir: Option<String>,
        /// Filename prefix of part files.
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Check a path string the way assemble and cleanup do.
    ValidatePath {
        path: String,
    },

    /// Remove part files (prefixed files only when the parts dir is the working dir).
    Cleanup {
        #[arg(long)]
        parts_dir: Option<String>,
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Compute SHA-256 of a file.
    Checksum {
        /// Path to the file.
        path: String,
    },

    /// One digest over every part file, independent of names and order.
    CombinedHash {
        #[arg(long)]
        parts_dir: Option<String>,
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Print shell completions.
    Completions {
        shell: Shell,
    },

    /// Print the man page.
    Man,
}

/// Global config, loaded only by commands that work on parts.
fn load_config() -> Result<MsdConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Assemble {
                manifest,
                output,
                parts_dir,
                prefix,
                keep_parts,
                range_size,
                total_size,
            } => run_assemble(
                &load_config()?,
                &AssembleArgs {
                    manifest,
                    output,
                    parts: PartsArgs { parts_dir, prefix },
                    keep_parts,
                    range_size,
                    total_size,
                },
            )?,
            CliCommand::Locate {
                manifest,
                parts_dir,
                prefix,
            } => run_locate(&load_config()?, &manifest, &PartsArgs { parts_dir, prefix })?,
            CliCommand::ValidatePath { path } => run_validate_path(&path)?,
            CliCommand::Cleanup { parts_dir, prefix } => {
                run_cleanup(&load_config()?, &PartsArgs { parts_dir, prefix })?
            }
            CliCommand::Checksum { path } => run_checksum(Path::new(&path))?,
            CliCommand::CombinedHash { parts_dir, prefix } => {
                run_combined_hash(&load_config()?, &PartsArgs { parts_dir, prefix })?
            }
            CliCommand::Completions { shell } => run_completions(shell, Cli::command())?,
            CliCommand::Man => run_man(Cli::command())?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
