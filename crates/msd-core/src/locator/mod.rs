//! Part discovery and hash-driven ordering.
//!
//! Filenames and enumeration order say nothing about where a part belongs.
//! Each candidate is hashed and looked up in the manifest; the matched part
//! number is the only sort key. Nothing here writes to disk.

mod enumerate;
mod order;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::checksum::Hasher;
use crate::manifest::{DownloadManifest, ManifestError};

pub use enumerate::list_prefixed_files;
pub use order::order_parts;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("failed to list part files in {}", .dir.display())]
    Enumerate {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest")]
    Manifest(#[from] ManifestError),

    #[error("failed to hash part file {}", .path.display())]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file on disk whose digest is not in the manifest (stale or foreign).
    #[error("part file {} (digest {digest}) matches no manifest entry", .path.display())]
    UnknownPart { path: PathBuf, digest: String },

    /// The manifest declares a part no file on disk hashes to.
    #[error("no part file found for manifest part {part_number}")]
    MissingPart { part_number: u32 },

    /// Two files on disk carry the same content for one manifest part.
    #[error(
        "part {part_number} found twice: {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicatePart {
        part_number: u32,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Lists `prefix*` files in `parts_dir` and returns them in part-number order.
pub fn locate<H: Hasher + ?Sized>(
    parts_dir: &Path,
    prefix: &str,
    manifest: &DownloadManifest,
    hasher: &H,
) -> Result<Vec<PathBuf>, LocateError> {
    let candidates =
        list_prefixed_files(parts_dir, prefix).map_err(|source| LocateError::Enumerate {
            dir: parts_dir.to_path_buf(),
            source,
        })?;
    tracing::debug!(
        dir = %parts_dir.display(),
        prefix,
        candidates = candidates.len(),
        "discovered part files"
    );
    order_parts(&candidates, manifest, hasher)
}
