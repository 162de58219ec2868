//! Path validation against directory escape, foreign roots and odd characters.

use std::path::{Path, PathBuf};

use super::error::PathError;
use super::split_dir_and_filename;

/// Directories an absolute path is allowed to live under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRoots {
    /// Process working directory (the app root).
    pub current_dir: PathBuf,
    /// User home directory, if known.
    pub home_dir: Option<PathBuf>,
}

impl PathRoots {
    /// Reads the working directory and `$HOME` from the environment.
    pub fn from_env() -> std::io::Result<Self> {
        let current_dir = std::env::current_dir()?;
        let home_dir = std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from);
        Ok(Self {
            current_dir,
            home_dir,
        })
    }

    /// Resolves a leading `~` or `~/` against `home_dir`. Any other path is
    /// returned unchanged.
    pub fn expand_home(&self, path: &str) -> Result<PathBuf, PathError> {
        let rest = match path.strip_prefix('~') {
            Some("") => "",
            Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
            _ => return Ok(PathBuf::from(path)),
        };
        let home = self.home_dir.as_deref().ok_or_else(|| PathError::NoHome {
            path: path.to_string(),
        })?;
        if rest.is_empty() {
            Ok(home.to_path_buf())
        } else {
            Ok(home.join(rest))
        }
    }

    /// `path` made absolute against `current_dir`.
    pub fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir.join(path)
        }
    }

    /// True for directories that must never be removed as a whole: the home
    /// directory and any ancestor of a root. The working directory itself is
    /// not protected; cleanup treats it as shared and deletes only part files.
    pub fn is_protected(&self, dir: &Path) -> bool {
        let dir = self.absolute(dir);
        if dir == self.current_dir {
            return false;
        }
        self.current_dir.starts_with(&dir)
            || self.home_dir.as_deref().is_some_and(|home| home.starts_with(&dir))
    }

    fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.current_dir)
            || self.home_dir.as_deref().is_some_and(|home| path.starts_with(home))
    }
}

/// Checks `path` before it is used for any filesystem mutation.
///
/// Rejected, in this order:
/// 1. `../` anywhere, or a `..` segment ([`PathError::Escape`])
/// 2. absolute paths not under `roots` ([`PathError::OutsideRoot`])
/// 3. segments with characters outside `[A-Za-z0-9_.-]`
///    ([`PathError::InvalidCharacter`]); `.`, `~` and empty segments are skipped
///
/// On success returns a short human-readable description of the path.
pub fn validate_path(path: &str, roots: &PathRoots) -> Result<String, PathError> {
    if path.contains("../") || path.split('/').any(|s| s == "..") {
        return Err(PathError::Escape {
            path: path.to_string(),
        });
    }

    if path.starts_with('/') && !roots.contains(Path::new(path)) {
        return Err(PathError::OutsideRoot {
            path: path.to_string(),
        });
    }

    for segment in path.split('/') {
        if matches!(segment, "" | "." | "~") {
            continue;
        }
        if !segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        {
            return Err(PathError::InvalidCharacter {
                segment: segment.to_string(),
            });
        }
    }

    if path.starts_with("./") || path.starts_with("~/") {
        let (directory, filename) = split_dir_and_filename(path);
        return Ok(format!(
            "Valid path. Directory: {directory}. Filename: {filename}"
        ));
    }

    Ok(format!("Valid path. Directory: {path}"))
}
