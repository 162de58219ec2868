//! `msd assemble` – locate, assemble and clean up in one run.

use anyhow::{Context, Result};
use msd_core::checksum::Sha256Hasher;
use msd_core::config::MsdConfig;
use msd_core::manifest::DownloadManifest;
use msd_core::path_safety::PathRoots;
use msd_core::pipeline::{reassemble, ReassembleRequest};
use msd_core::units::format_file_size;
use std::path::PathBuf;

use super::PartsArgs;

#[derive(Debug, Clone)]
pub struct AssembleArgs {
    pub manifest: PathBuf,
    pub output: PathBuf,
    pub parts: PartsArgs,
    pub keep_parts: bool,
    pub range_size: Option<u64>,
    pub total_size: Option<u64>,
}

pub fn run_assemble(cfg: &MsdConfig, args: &AssembleArgs) -> Result<()> {
    let manifest = DownloadManifest::load(&args.manifest)?;
    let (parts_dir, prefix) = args.parts.resolve(Some(&manifest), cfg);
    let roots = PathRoots::from_env().context("read working and home directories")?;

    let mut request = ReassembleRequest::new(parts_dir, prefix, args.output.clone());
    request.keep_parts = args.keep_parts || cfg.keep_parts;
    request.range_size = args.range_size;
    request.total_size = args.total_size;
    request.buffer_size = cfg.buffer_size();

    let report = reassemble(&request, &manifest, &Sha256Hasher, &roots)?;
    println!(
        "Assembled {} parts into {} ({})",
        report.parts,
        report.destination.display(),
        format_file_size(report.bytes_written)
    );
    tracing::debug!(cleanup = ?report.cleanup, "cleanup finished");
    Ok(())
}
