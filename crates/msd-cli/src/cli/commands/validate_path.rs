//! `msd validate-path <path>`.

use anyhow::{Context, Result};
use msd_core::path_safety::{validate_path, PathRoots};

pub fn run_validate_path(path: &str) -> Result<()> {
    let roots = PathRoots::from_env().context("read working and home directories")?;
    let description = validate_path(path, &roots)?;
    println!("{description}");
    Ok(())
}
