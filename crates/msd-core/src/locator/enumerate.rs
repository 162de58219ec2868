//! Candidate part files by name prefix.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Regular files in `dir` (non-recursive) whose name starts with `prefix`.
///
/// Returned in whatever order the OS yields them; callers must not rely on it.
/// Non-UTF-8 names never match.
pub fn list_prefixed_files(dir: &Path, prefix: &str) -> io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_str().is_some_and(|n| n.starts_with(prefix)) {
            out.push(entry.path());
        }
    }
    Ok(out)
}
