//! Download manifest: which digest belongs to which part number.
//!
//! Written by the download phase as JSON and treated as read-only input here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// One downloaded byte range of the target file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadedPart {
    /// Hex digest of the part's content; the part's identity.
    pub file_hash: String,
    /// 1-based ordinal position in the assembled file.
    pub part_number: u32,
    /// When the part finished downloading (producer-defined units).
    #[serde(default)]
    pub timestamp: i64,
    /// Path the download phase wrote the part to. A hint only: never used for ordering.
    #[serde(default)]
    pub part_file: String,
}

/// The set of parts expected on disk, plus what the download phase recorded about the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_parts: Option<String>,
    /// Total size of the assembled file in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_parts: Option<usize>,
    /// Byte length of every part except the last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_size: Option<u64>,
    #[serde(default)]
    pub downloaded_parts: Vec<DownloadedPart>,
}

/// Manifest contents that break the part-numbering or digest invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("manifest lists no parts")]
    Empty,
    #[error("part number {part_number} outside 1..={part_count}")]
    PartNumberOutOfRange { part_number: u32, part_count: usize },
    #[error("part number {part_number} listed more than once")]
    DuplicatePartNumber { part_number: u32 },
    #[error("digest {file_hash} listed for more than one part")]
    DuplicateHash { file_hash: String },
}

impl DownloadManifest {
    /// Read a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("read manifest {}", path.display()))?;
        let manifest: DownloadManifest = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse manifest {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            parts = manifest.downloaded_parts.len(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    /// Write the manifest as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize manifest")?;
        fs::write(path, json).with_context(|| format!("write manifest {}", path.display()))?;
        Ok(())
    }

    pub fn part_count(&self) -> usize {
        self.downloaded_parts.len()
    }

    /// Part numbers must be exactly `1..=N` and digests unique (compared case-insensitively).
    pub fn check_invariants(&self) -> Result<(), ManifestError> {
        let part_count = self.part_count();
        if part_count == 0 {
            return Err(ManifestError::Empty);
        }

        let mut numbers = HashSet::with_capacity(part_count);
        let mut hashes = HashSet::with_capacity(part_count);
        for part in &self.downloaded_parts {
            if part.part_number == 0 || part.part_number as usize > part_count {
                return Err(ManifestError::PartNumberOutOfRange {
                    part_number: part.part_number,
                    part_count,
                });
            }
            if !numbers.insert(part.part_number) {
                return Err(ManifestError::DuplicatePartNumber {
                    part_number: part.part_number,
                });
            }
            if !hashes.insert(part.file_hash.to_ascii_lowercase()) {
                return Err(ManifestError::DuplicateHash {
                    file_hash: part.file_hash.clone(),
                });
            }
        }
        Ok(())
    }

    /// Lowercased digest -> part record. Built once per locate.
    pub fn digest_index(&self) -> HashMap<String, &DownloadedPart> {
        self.downloaded_parts
            .iter()
            .map(|p| (p.file_hash.to_ascii_lowercase(), p))
            .collect()
    }
}
