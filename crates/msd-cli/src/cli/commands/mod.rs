//! CLI command handlers, one per file.

mod assemble;
mod checksum;
mod cleanup;
mod combined_hash;
mod completions;
mod locate;
mod validate_path;

use anyhow::{Context, Result};
use msd_core::config::MsdConfig;
use msd_core::manifest::DownloadManifest;
use msd_core::path_safety::{validate_path, PathRoots};
use std::path::PathBuf;

pub use assemble::{run_assemble, AssembleArgs};
pub use checksum::run_checksum;
pub use cleanup::run_cleanup;
pub use combined_hash::run_combined_hash;
pub use completions::{run_completions, run_man};
pub use locate::run_locate;
pub use validate_path::run_validate_path;

/// `--parts-dir` / `--prefix` as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct PartsArgs {
    pub parts_dir: Option<String>,
    pub prefix: Option<String>,
}

impl PartsArgs {
    /// Flag, then manifest, then config.
    pub fn resolve(
        &self,
        manifest: Option<&DownloadManifest>,
        cfg: &MsdConfig,
    ) -> (String, String) {
        let parts_dir = self
            .parts_dir
            .clone()
            .or_else(|| manifest.and_then(|m| m.parts_dir.clone()))
            .unwrap_or_else(|| cfg.parts_dir.clone());
        let prefix = self
            .prefix
            .clone()
            .or_else(|| manifest.and_then(|m| m.prefix_parts.clone()))
            .unwrap_or_else(|| cfg.prefix_parts.clone());
        (parts_dir, prefix)
    }
}

/// Validated parts dir: empty means the working directory, `~` is expanded.
fn parts_dir_path(parts_dir: &str, roots: &PathRoots) -> Result<PathBuf> {
    if parts_dir.is_empty() {
        return Ok(roots.current_dir.clone());
    }
    validate_path(parts_dir, roots).context("invalid parts directory")?;
    Ok(roots.expand_home(parts_dir)?)
}
