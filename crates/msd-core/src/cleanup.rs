//! Post-assembly removal of part files.
//!
//! Three cases, decided on sanitized paths:
//! - parts dir == app root: the directory is shared with files we do not
//!   own, so only `prefix*` entries are removed, best effort
//! - any other dir except `""`, `.` and `./`: a dedicated scratch dir,
//!   removed recursively; failure is returned
//! - `""`, `.` or `./`: skipped, never delete the current directory
//!
//! Do not fold these into a single recursive delete. A dedicated dir that
//! contains the app root is refused rather than removed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::path_safety::sanitize_path;

/// What `cleanup` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// `keep_parts` was set.
    Kept,
    /// Shared directory: prefixed files deleted one by one.
    PrefixedFiles { removed: usize, failed: usize },
    /// Dedicated directory removed with its contents.
    RemovedDirectory,
    /// Parts dir was the current directory in relative form.
    Skipped,
}

#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("failed to read directory {}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove parts directory {}", .dir.display())]
    RemoveDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to remove {}: it contains the app root", .dir.display())]
    ContainsAppRoot { dir: PathBuf },
}

enum Scope {
    Shared(String),
    Dedicated(String),
    CurrentDir,
}

fn scope(parts_dir: &str, app_root: &str) -> Scope {
    let sanitized_parts_dir = sanitize_path(parts_dir);
    let sanitized_app_root = sanitize_path(app_root);
    if sanitized_parts_dir == sanitized_app_root {
        Scope::Shared(sanitized_parts_dir)
    } else if !matches!(sanitized_parts_dir.as_str(), "" | "." | "./") {
        Scope::Dedicated(sanitized_parts_dir)
    } else {
        Scope::CurrentDir
    }
}

/// Lexical absolute form; relative paths are taken from `app_root`.
fn absolute(path: &str, app_root: &str) -> PathBuf {
    let clean = sanitize_path(path);
    if clean.starts_with('/') {
        PathBuf::from(clean)
    } else {
        PathBuf::from(sanitize_path(&format!("{app_root}/{clean}")))
    }
}

/// Remove part files after a successful assembly.
pub fn cleanup(
    keep_parts: bool,
    parts_dir: &str,
    app_root: &str,
    prefix: &str,
) -> Result<CleanupOutcome, CleanupError> {
    if keep_parts {
        return Ok(CleanupOutcome::Kept);
    }

    tracing::debug!(parts_dir, app_root, prefix, "cleaning up parts");
    match scope(parts_dir, app_root) {
        Scope::Shared(dir) => remove_prefixed_files(Path::new(&dir), prefix),
        Scope::Dedicated(dir) => {
            if Path::new(&sanitize_path(app_root)).starts_with(absolute(&dir, app_root)) {
                return Err(CleanupError::ContainsAppRoot {
                    dir: PathBuf::from(dir),
                });
            }
            let dir = PathBuf::from(dir);
            match fs::remove_dir_all(&dir) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(dir = %dir.display(), "parts directory already gone");
                }
                Err(source) => return Err(CleanupError::RemoveDir { dir, source }),
            }
            tracing::info!(dir = %dir.display(), "removed parts directory");
            Ok(CleanupOutcome::RemovedDirectory)
        }
        Scope::CurrentDir => {
            tracing::debug!("parts directory is the current directory; skipping cleanup");
            Ok(CleanupOutcome::Skipped)
        }
    }
}

/// Whether `cleanup(false, parts_dir, app_root, prefix)` would delete `path`.
///
/// Decided lexically, with the same case split as `cleanup`. Relative paths
/// are resolved against `app_root`.
pub fn would_remove(parts_dir: &str, app_root: &str, prefix: &str, path: &Path) -> bool {
    let target = absolute(&path.to_string_lossy(), app_root);
    match scope(parts_dir, app_root) {
        Scope::Shared(dir) => {
            !prefix.is_empty()
                && target.parent() == Some(absolute(&dir, app_root).as_path())
                && target
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(prefix))
        }
        Scope::Dedicated(dir) => target.starts_with(absolute(&dir, app_root)),
        Scope::CurrentDir => false,
    }
}

fn remove_prefixed_files(dir: &Path, prefix: &str) -> Result<CleanupOutcome, CleanupError> {
    if prefix.is_empty() {
        tracing::warn!(
            dir = %dir.display(),
            "empty part prefix; not deleting anything in shared directory"
        );
        return Ok(CleanupOutcome::PrefixedFiles {
            removed: 0,
            failed: 0,
        });
    }

    let entries = fs::read_dir(dir).map_err(|source| CleanupError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    })?;

    let (mut removed, mut failed) = (0, 0);
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "could not read directory entry: {}", e);
                failed += 1;
                continue;
            }
        };
        let name = entry.file_name();
        if !name.to_str().is_some_and(|n| n.starts_with(prefix)) {
            continue;
        }
        let path = dir.join(&name);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed part file");
                removed += 1;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to remove file: {}", e);
                failed += 1;
            }
        }
    }
    Ok(CleanupOutcome::PrefixedFiles { removed, failed })
}
