//! End-to-end reassembly: validate, locate, assemble, clean up.
//!
//! Every stage returns a classified error and the first one aborts the run.
//! Locating (and therefore hashing every part) finishes before the
//! destination is created, and cleanup only runs after a full assembly.
//! A destination that cleanup would delete, or that is itself a part, is
//! rejected before anything is written.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::assembly::{self, AssembleOptions, AssemblyError, PartLayout, DEFAULT_BUFFER_SIZE};
use crate::checksum::Hasher;
use crate::cleanup::{self, CleanupError, CleanupOutcome};
use crate::control::CancelToken;
use crate::locator::{self, LocateError};
use crate::manifest::DownloadManifest;
use crate::path_safety::{validate_path, PathError, PathRoots};

/// Inputs for one reassembly run.
#[derive(Debug, Clone)]
pub struct ReassembleRequest {
    /// Directory holding the parts; empty means the working directory.
    pub parts_dir: String,
    pub prefix: String,
    pub destination: PathBuf,
    pub keep_parts: bool,
    /// Overrides the manifest's `rangeSize`.
    pub range_size: Option<u64>,
    /// Overrides the manifest's `size`.
    pub total_size: Option<u64>,
    pub buffer_size: usize,
    pub cancel: Option<CancelToken>,
}

impl ReassembleRequest {
    pub fn new(
        parts_dir: impl Into<String>,
        prefix: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            parts_dir: parts_dir.into(),
            prefix: prefix.into(),
            destination: destination.into(),
            keep_parts: false,
            range_size: None,
            total_size: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            cancel: None,
        }
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassembleReport {
    pub destination: PathBuf,
    pub parts: usize,
    pub bytes_written: u64,
    pub cleanup: CleanupOutcome,
}

#[derive(Debug, Error)]
pub enum ReassembleError {
    #[error("invalid parts directory")]
    PartsDir(#[source] PathError),

    #[error("invalid destination")]
    Destination(#[source] PathError),

    #[error("refusing to clean up {}: home directory or parent of a root", .dir.display())]
    ProtectedPartsDir { dir: PathBuf },

    #[error("destination {} would be overwritten or removed with the parts", .path.display())]
    DestinationInParts { path: PathBuf },

    #[error("manifest does not record the {field}; pass it explicitly")]
    MissingLayout { field: &'static str },

    #[error("failed to locate parts")]
    Locate(#[from] LocateError),

    #[error("failed to create output file {}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to assemble {}", .path.display())]
    Assembly {
        path: PathBuf,
        #[source]
        source: AssemblyError,
    },

    #[error("failed to clean up parts")]
    Cleanup(#[from] CleanupError),
}

/// Layout from the request, falling back to what the manifest recorded.
fn resolve_layout(
    request: &ReassembleRequest,
    manifest: &DownloadManifest,
) -> Result<PartLayout, ReassembleError> {
    let range_size = request
        .range_size
        .or(manifest.range_size)
        .ok_or(ReassembleError::MissingLayout { field: "range size" })?;
    let total_size = request
        .total_size
        .or(manifest.size)
        .ok_or(ReassembleError::MissingLayout { field: "total size" })?;
    Ok(PartLayout {
        part_count: manifest.num_parts.unwrap_or_else(|| manifest.part_count()),
        range_size,
        total_size,
    })
}

/// Rebuild `request.destination` from the parts described by `manifest`.
///
/// A leading `~` in the parts dir or destination is expanded against
/// `roots.home_dir` after validation.
///
/// On assembly failure the partial destination is left on disk and no part is
/// deleted. Callers must not run two reassemblies over one parts directory at once.
pub fn reassemble<H: Hasher + ?Sized>(
    request: &ReassembleRequest,
    manifest: &DownloadManifest,
    hasher: &H,
    roots: &PathRoots,
) -> Result<ReassembleReport, ReassembleError> {
    let parts_dir = if request.parts_dir.is_empty() {
        roots.current_dir.clone()
    } else {
        validate_path(&request.parts_dir, roots).map_err(ReassembleError::PartsDir)?;
        roots
            .expand_home(&request.parts_dir)
            .map_err(ReassembleError::PartsDir)?
    };
    let destination_str = request.destination.to_string_lossy();
    validate_path(&destination_str, roots).map_err(ReassembleError::Destination)?;
    let destination = roots
        .expand_home(&destination_str)
        .map_err(ReassembleError::Destination)?;

    let parts_dir_str = parts_dir.to_string_lossy();
    let app_root = roots.current_dir.to_string_lossy();
    if !request.keep_parts {
        if roots.is_protected(&parts_dir) {
            return Err(ReassembleError::ProtectedPartsDir {
                dir: parts_dir.clone(),
            });
        }
        if cleanup::would_remove(&parts_dir_str, &app_root, &request.prefix, &destination) {
            return Err(ReassembleError::DestinationInParts { path: destination });
        }
    }
    let layout = resolve_layout(request, manifest)?;

    let ordered = locator::locate(&parts_dir, &request.prefix, manifest, hasher)?;
    tracing::info!(
        parts = ordered.len(),
        dir = %parts_dir.display(),
        "located all parts"
    );
    let absolute_destination = roots.absolute(&destination);
    if ordered
        .iter()
        .any(|part| roots.absolute(part) == absolute_destination)
    {
        return Err(ReassembleError::DestinationInParts { path: destination });
    }

    let bytes_written = write_destination(&ordered, &destination, layout, request)?;
    tracing::info!(
        destination = %destination.display(),
        bytes = bytes_written,
        "file assembled"
    );

    let cleanup = cleanup::cleanup(
        request.keep_parts,
        &parts_dir_str,
        &app_root,
        &request.prefix,
    )?;

    Ok(ReassembleReport {
        destination,
        parts: ordered.len(),
        bytes_written,
        cleanup,
    })
}

fn write_destination(
    ordered: &[PathBuf],
    destination: &Path,
    layout: PartLayout,
    request: &ReassembleRequest,
) -> Result<u64, ReassembleError> {
    let mut out = assembly::create_output(destination).map_err(|source| {
        ReassembleError::CreateOutput {
            path: destination.to_path_buf(),
            source,
        }
    })?;
    let options = AssembleOptions {
        buffer_size: request.buffer_size,
        cancel: request.cancel.clone(),
    };
    let assembly_error = |source: AssemblyError| ReassembleError::Assembly {
        path: destination.to_path_buf(),
        source,
    };
    let written =
        assembly::assemble(ordered, &mut out, layout, &options).map_err(assembly_error)?;
    out.sync_all()
        .map_err(|e| assembly_error(AssemblyError::Write(e)))?;
    Ok(written)
}
