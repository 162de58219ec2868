//! Path safety checks for user-supplied directory and file strings.
//!
//! Everything that later creates, writes or deletes on disk goes through
//! `validate_path` first; `sanitize_path` gives the canonical form used when
//! two paths must be compared (e.g. "is the parts directory the app root?").
//! Both are pure: the roots an absolute path may live under are passed in.

mod error;
mod sanitize;
mod validate;

use std::path::PathBuf;

pub use error::PathError;
pub use sanitize::sanitize_path;
pub use validate::{validate_path, PathRoots};

/// Splits `path` on `/` into a directory part and a filename part.
///
/// A trailing `/` marks the whole path as a directory (empty filename); a path
/// without any `/` is a bare filename.
pub fn split_dir_and_filename(path: &str) -> (String, String) {
    let parts: Vec<&str> = path.split('/').collect();
    let (dir, file) = if path.ends_with('/') {
        (parts[..parts.len() - 1].join("/"), String::new())
    } else if parts.len() > 1 {
        (
            parts[..parts.len() - 1].join("/"),
            parts[parts.len() - 1].to_string(),
        )
    } else {
        (String::new(), parts[0].to_string())
    };
    tracing::trace!(path, directory = %dir, filename = %file, "split path");
    (dir, file)
}

/// The process working directory, used as the app root when scoping cleanup.
pub fn ensure_app_root() -> std::io::Result<PathBuf> {
    std::env::current_dir()
}
