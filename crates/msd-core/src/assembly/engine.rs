//! The copy loop.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use super::{AssembleOptions, AssemblyError, PartLayout};

/// Appends each part in `ordered` to `destination`, checking every part's size.
///
/// `ordered` must already be in part-number order (see
/// [`crate::locator::locate`]). Returns the total bytes written, which equals
/// `layout.total_size` on success. Stops at the first error; bytes already
/// written stay in `destination`.
pub fn assemble<W: Write + ?Sized>(
    ordered: &[PathBuf],
    destination: &mut W,
    layout: PartLayout,
    options: &AssembleOptions,
) -> Result<u64, AssemblyError> {
    layout.check(ordered.len())?;

    let mut buf = vec![0u8; options.buffer_size.max(1)];
    let mut written = 0u64;

    for (index, path) in ordered.iter().enumerate() {
        if options.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
            tracing::info!(part = index + 1, "assembly cancelled");
            return Err(AssemblyError::Cancelled { index });
        }

        let copied = copy_part(path, destination, &mut buf)?;
        let expected = layout.expected_len(index);
        if copied != expected {
            return Err(AssemblyError::IncompletePart {
                index,
                path: path.clone(),
                expected,
                copied,
            });
        }
        written += copied;
        tracing::debug!(
            part = index + 1,
            file = %path.display(),
            bytes = copied,
            "assembled part"
        );
    }

    destination.flush().map_err(AssemblyError::Write)?;
    Ok(written)
}

/// Streams one part into `destination`. The part file is closed on return,
/// including on error.
fn copy_part<W: Write + ?Sized>(
    path: &Path,
    destination: &mut W,
    buf: &mut [u8],
) -> Result<u64, AssemblyError> {
    let mut part = File::open(path).map_err(|source| AssemblyError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut copied = 0u64;
    loop {
        let n = match part.read(buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(AssemblyError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        destination
            .write_all(&buf[..n])
            .map_err(AssemblyError::Write)?;
        copied += n as u64;
    }
    Ok(copied)
}
