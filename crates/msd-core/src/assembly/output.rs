//! Destination file creation.

use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Create (or truncate) the destination file, creating missing parent directories.
pub fn create_output(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
