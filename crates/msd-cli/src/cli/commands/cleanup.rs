//! `msd cleanup` – remove parts without assembling.

use anyhow::{bail, Context, Result};
use msd_core::cleanup::{cleanup, CleanupOutcome};
use msd_core::config::MsdConfig;
use msd_core::path_safety::{ensure_app_root, PathRoots};

use super::{parts_dir_path, PartsArgs};

pub fn run_cleanup(cfg: &MsdConfig, parts: &PartsArgs) -> Result<()> {
    let (parts_dir, prefix) = parts.resolve(None, cfg);
    let app_root = ensure_app_root().context("read working directory")?;
    let roots = PathRoots::from_env().context("read working and home directories")?;
    let dir = parts_dir_path(&parts_dir, &roots)?;
    if roots.is_protected(&dir) {
        bail!(
            "refusing to clean up {}: home directory or parent of the working directory",
            dir.display()
        );
    }
    let parts_dir = dir.to_string_lossy().into_owned();

    match cleanup(false, &parts_dir, &app_root.to_string_lossy(), &prefix)? {
        CleanupOutcome::PrefixedFiles { removed, failed } => {
            println!("Removed {removed} part files from {parts_dir} ({failed} failed)");
        }
        CleanupOutcome::RemovedDirectory => println!("Removed {parts_dir}"),
        CleanupOutcome::Skipped => println!("Nothing to remove for {parts_dir:?}"),
        CleanupOutcome::Kept => {}
    }
    Ok(())
}
