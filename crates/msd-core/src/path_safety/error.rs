//! Error type for path validation.

use thiserror::Error;

/// Why a path string was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path climbs out of its starting directory (`../`).
    #[error("invalid path {path:?}: escaping directory not allowed")]
    Escape { path: String },

    /// Absolute path that is neither under the working directory nor the home directory.
    #[error("invalid path {path:?}: outside home or app directory not allowed")]
    OutsideRoot { path: String },

    /// A segment holds something other than `[A-Za-z0-9_.-]`.
    #[error("invalid character in path segment {segment:?}")]
    InvalidCharacter { segment: String },

    /// `~` was used but no home directory is known.
    #[error("cannot expand {path:?}: home directory unknown")]
    NoHome { path: String },
}
