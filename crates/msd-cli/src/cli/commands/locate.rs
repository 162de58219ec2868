//! `msd locate` – show the order parts would be assembled in.

use anyhow::{Context, Result};
use msd_core::checksum::Sha256Hasher;
use msd_core::config::MsdConfig;
use msd_core::locator::locate;
use msd_core::manifest::DownloadManifest;
use msd_core::path_safety::PathRoots;
use std::path::Path;

use super::{parts_dir_path, PartsArgs};

pub fn run_locate(cfg: &MsdConfig, manifest_path: &Path, parts: &PartsArgs) -> Result<()> {
    let manifest = DownloadManifest::load(manifest_path)?;
    let (parts_dir, prefix) = parts.resolve(Some(&manifest), cfg);
    let roots = PathRoots::from_env().context("read working and home directories")?;
    let dir = parts_dir_path(&parts_dir, &roots)?;

    let ordered = locate(&dir, &prefix, &manifest, &Sha256Hasher)?;
    for (i, path) in ordered.iter().enumerate() {
        println!("{:>4}  {}", i + 1, path.display());
    }
    Ok(())
}
