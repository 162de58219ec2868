//! Content digests used as part identity.
//!
//! Part files are matched to manifest records by digest alone, so the
//! digest must be deterministic and collision-resistant. SHA-256 is the
//! default; the `Hasher` trait is the seam for other algorithms.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::locator::list_prefixed_files;

const BUF_SIZE: usize = 64 * 1024;

/// Computes a content digest for a file on disk, as lowercase hex.
pub trait Hasher {
    fn compute_digest(&self, path: &Path) -> io::Result<String>;
}

/// SHA-256 over the whole file, read in bounded chunks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn compute_digest(&self, path: &Path) -> io::Result<String> {
        let mut f = File::open(path)?;
        let mut hasher = Sha256::new();
        let mut buf = [0u8; BUF_SIZE];
        loop {
            let n = match f.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buf[..n]);
        }
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> Result<String> {
    Sha256Hasher
        .compute_digest(path)
        .with_context(|| format!("hash {}", path.display()))
}

/// Single digest summarizing every `prefix*` file in `dir`.
///
/// Per-file digests are sorted before combining, so the result does not
/// depend on enumeration order or filenames.
pub fn combined_digest_for_prefixed_files<H: Hasher + ?Sized>(
    dir: &Path,
    prefix: &str,
    hasher: &H,
) -> Result<String> {
    let files = list_prefixed_files(dir, prefix)
        .with_context(|| format!("list {}* files in {}", prefix, dir.display()))?;

    let mut digests = files
        .iter()
        .map(|p| {
            hasher
                .compute_digest(p)
                .with_context(|| format!("hash {}", p.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    digests.sort();

    let combined = Sha256::digest(digests.concat().as_bytes());
    Ok(hex::encode(combined))
}
