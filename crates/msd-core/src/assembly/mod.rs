//! Sequential reassembly of ordered parts into one destination.
//!
//! Parts are streamed through a bounded reusable buffer and appended at the
//! destination's current offset; no seeking. After each part the copied byte
//! count is checked against the layout, and a mismatch stops the run: any
//! later part would land at the wrong offset. A failed run leaves whatever
//! was written in place for the caller to inspect or discard.

mod engine;
mod output;

use std::path::PathBuf;

use thiserror::Error;

use crate::control::CancelToken;

pub use engine::assemble;
pub use output::create_output;

/// Default copy buffer size.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Sizes every part must have: `range_size` for all but the last, the
/// remainder of `total_size` for the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartLayout {
    pub part_count: usize,
    pub range_size: u64,
    pub total_size: u64,
}

impl PartLayout {
    /// Expected byte length of the part at 0-based `index`.
    pub fn expected_len(&self, index: usize) -> u64 {
        if index + 1 == self.part_count {
            self.total_size
                .saturating_sub(self.range_size.saturating_mul(self.part_count as u64 - 1))
        } else {
            self.range_size
        }
    }

    fn check(&self, found: usize) -> Result<(), AssemblyError> {
        if self.part_count == 0 {
            return Err(AssemblyError::NoParts);
        }
        if found != self.part_count {
            return Err(AssemblyError::PartCountMismatch {
                expected: self.part_count,
                found,
            });
        }
        let fixed = self.range_size.checked_mul(self.part_count as u64 - 1);
        if fixed.map_or(true, |f| f > self.total_size) {
            return Err(AssemblyError::LayoutOverflow {
                part_count: self.part_count,
                range_size: self.range_size,
                total_size: self.total_size,
            });
        }
        Ok(())
    }
}

/// Tuning for a single `assemble` call.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    pub buffer_size: usize,
    pub cancel: Option<CancelToken>,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            cancel: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("no parts to assemble")]
    NoParts,

    #[error("expected {expected} parts, got {found}")]
    PartCountMismatch { expected: usize, found: usize },

    #[error("{part_count} parts of {range_size} bytes do not fit in {total_size} bytes")]
    LayoutOverflow {
        part_count: usize,
        range_size: u64,
        total_size: u64,
    },

    /// Copied size differs from the layout; the output is unusable past this part.
    #[error(
        "part {} ({}) not completely copied: expected {expected} bytes, copied {copied}",
        .index + 1,
        .path.display()
    )]
    IncompletePart {
        index: usize,
        path: PathBuf,
        expected: u64,
        copied: u64,
    },

    #[error("failed to open part {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read part {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write destination")]
    Write(#[source] std::io::Error),

    #[error("assembly cancelled before part {}", .index + 1)]
    Cancelled { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(part_count: usize, range_size: u64, total_size: u64) -> PartLayout {
        PartLayout {
            part_count,
            range_size,
            total_size,
        }
    }

    #[test]
    fn expected_len_last_part_gets_remainder() {
        let l = layout(3, 10, 25);
        assert_eq!(l.expected_len(0), 10);
        assert_eq!(l.expected_len(1), 10);
        assert_eq!(l.expected_len(2), 5);
    }

    #[test]
    fn expected_len_single_part() {
        assert_eq!(layout(1, 0, 42).expected_len(0), 42);
    }

    #[test]
    fn check_rejects_bad_layouts() {
        assert!(matches!(layout(0, 8, 8).check(0), Err(AssemblyError::NoParts)));
        assert!(matches!(
            layout(3, 8, 24).check(2),
            Err(AssemblyError::PartCountMismatch {
                expected: 3,
                found: 2
            })
        ));
        assert!(matches!(
            layout(3, 10, 15).check(3),
            Err(AssemblyError::LayoutOverflow { .. })
        ));
        assert!(matches!(
            layout(3, u64::MAX, u64::MAX).check(3),
            Err(AssemblyError::LayoutOverflow { .. })
        ));
        assert!(layout(3, 8, 24).check(3).is_ok());
        assert!(layout(3, 8, 16).check(3).is_ok());
    }
}
