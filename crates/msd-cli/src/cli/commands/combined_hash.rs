//! `msd combined-hash` – one digest for a whole set of parts.

use anyhow::{Context, Result};
use msd_core::checksum::{combined_digest_for_prefixed_files, Sha256Hasher};
use msd_core::config::MsdConfig;
use msd_core::path_safety::PathRoots;

use super::{parts_dir_path, PartsArgs};

pub fn run_combined_hash(cfg: &MsdConfig, parts: &PartsArgs) -> Result<()> {
    let (parts_dir, prefix) = parts.resolve(None, cfg);
    let roots = PathRoots::from_env().context("read working and home directories")?;
    let dir = parts_dir_path(&parts_dir, &roots)?;
    let digest = combined_digest_for_prefixed_files(&dir, &prefix, &Sha256Hasher)?;
    println!("{}  {}", digest, dir.join(format!("{prefix}*")).display());
    Ok(())
}
