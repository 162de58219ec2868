//! Part-file fixtures: write parts under arbitrary names and a matching manifest.

use msd_core::checksum::sha256_path;
use msd_core::manifest::{DownloadManifest, DownloadedPart};
use std::path::{Path, PathBuf};

/// Writes `contents[i]` (part number `i + 1`) to `dir/names[i]` and returns
/// the manifest describing them plus the written paths.
pub fn write_parts(
    dir: &Path,
    names: &[&str],
    contents: &[&[u8]],
) -> (DownloadManifest, Vec<PathBuf>) {
    assert_eq!(names.len(), contents.len());
    let mut parts = Vec::new();
    let mut paths = Vec::new();
    for (i, (name, content)) in names.iter().zip(contents).enumerate() {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        parts.push(DownloadedPart {
            file_hash: sha256_path(&path).unwrap(),
            part_number: i as u32 + 1,
            timestamp: 0,
            part_file: path.to_string_lossy().into_owned(),
        });
        paths.push(path);
    }
    // Manifest order is irrelevant; store it reversed to prove it.
    parts.reverse();
    let manifest = DownloadManifest {
        downloaded_parts: parts,
        ..Default::default()
    };
    (manifest, paths)
}
